use std::collections::BTreeMap;

use alliance_types::{
    asset::AllianceAsset,
    delegation::Delegation,
    keepers::{Keepers, ALLIANCE_MODULE, REWARDS_POOL},
    msg::ClaimRewardsResponse,
    validator::ValidatorInfo,
    RewardIndices,
};
use alliance_utils::math::{
    divide_uint128_by_decimal256, truncate_with_epsilon, uint128_to_decimal256,
};
use cosmwasm_std::{
    to_json_binary, Addr, Coin, Decimal, Decimal256, DepsMut, Env, MessageInfo, Order, Response,
    StdResult, Storage,
};
use cw_storage_plus::Bound;

use crate::{
    error::{ContractError, ContractResult},
    events::build_claim_event,
    state::{load_assets, ASSETS, DELEGATIONS, VALIDATORS, WEIGHT_SNAPSHOTS},
};

/// Sum of `reward_weight * tokens` over the validator's assets that accrue rewards at `block_time`.
pub fn total_weighted_value(
    assets: &[AllianceAsset],
    validator: &ValidatorInfo,
    block_time: u64,
) -> StdResult<Decimal256> {
    assets.iter().filter(|asset| asset.rewards_started(block_time)).try_fold(
        Decimal256::zero(),
        |total, asset| {
            let weighted = validator
                .total_tokens_with_asset(asset)?
                .checked_mul(Decimal256::from(asset.reward_weight))?;
            Ok(total.checked_add(weighted)?)
        },
    )
}

/// Raises the validator's global indices by `amount / total weighted value` for every coin and
/// moves the coins from `from_module` into the rewards pool.
///
/// A validator without weighted value can not distribute anything: its indices are left as they
/// are and the coins stay with `from_module`. Returns whether the coins were distributed.
pub fn add_assets_to_reward_pool(
    store: &dyn Storage,
    keepers: &mut dyn Keepers,
    block_time: u64,
    from_module: &str,
    validator: &mut ValidatorInfo,
    coins: &[Coin],
) -> ContractResult<bool> {
    let coins: Vec<Coin> = coins.iter().filter(|coin| !coin.amount.is_zero()).cloned().collect();
    if coins.is_empty() {
        return Ok(false);
    }

    let assets = load_assets(store)?;
    let total_weighted_value = total_weighted_value(&assets, validator, block_time)?;
    if total_weighted_value.is_zero() {
        return Ok(false);
    }

    for coin in &coins {
        let index = validator.global_reward_indices.entry(coin.denom.clone()).or_default();
        *index =
            index.checked_add(divide_uint128_by_decimal256(coin.amount, total_weighted_value)?)?;
    }

    keepers.send_from_module_to_module(from_module, REWARDS_POOL, &coins)?;

    Ok(true)
}

/// Withdraws the rewards earned by the engine's native stake on `validator` and distributes
/// them to the validator's asset holders. Must run before anything changes the weighted value
/// or the native stake of the validator.
pub fn claim_validator_rewards(
    store: &mut dyn Storage,
    env: &Env,
    keepers: &mut dyn Keepers,
    validator: &str,
) -> ContractResult<Vec<Coin>> {
    let coins = keepers.withdraw_delegation_rewards(validator)?;
    if coins.iter().all(|coin| coin.amount.is_zero()) {
        return Ok(vec![]);
    }

    let mut info = VALIDATORS.may_load(store, validator)?.unwrap_or_default();
    if add_assets_to_reward_pool(
        store,
        keepers,
        env.block.time.seconds(),
        ALLIANCE_MODULE,
        &mut info,
        &coins,
    )? {
        VALIDATORS.save(store, validator, &info)?;
    }

    Ok(coins)
}

/// Adds `(to - from) * tokens * weight` to `rewards` for every denom of `to`. Denoms whose index
/// did not grow past `from` earn nothing. Amounts stay fractional until the claim is paid.
fn accumulate(
    rewards: &mut BTreeMap<String, Decimal256>,
    from: &RewardIndices,
    to: &RewardIndices,
    reward_weight: Decimal,
    delegation_tokens: Decimal256,
) -> StdResult<()> {
    for (denom, to_index) in to {
        let from_index = from.get(denom).copied().unwrap_or_default();
        if *to_index <= from_index {
            continue;
        }
        let earned = (*to_index - from_index)
            .checked_mul(delegation_tokens)?
            .checked_mul(Decimal256::from(reward_weight))?;
        let total = rewards.entry(denom.clone()).or_default();
        *total = total.checked_add(earned)?;
    }
    Ok(())
}

/// Rewards owed to a delegation at the validator's current indices, plus the indices the
/// delegation holds once they are paid.
///
/// Every weight change since the last settlement split the accrual into segments. Each
/// segment is paid at the weight that was in effect during it, the last one at the current
/// weight.
pub fn calculate_rewards(
    store: &dyn Storage,
    delegation: &Delegation,
    validator_addr: &str,
    validator: &ValidatorInfo,
    asset: &AllianceAsset,
) -> ContractResult<(Vec<Coin>, RewardIndices)> {
    let delegation_tokens =
        uint128_to_decimal256(validator.delegation_tokens(asset, delegation.shares)?)?;

    let mut rewards = BTreeMap::new();
    let mut indices = delegation.reward_indices.clone();

    let snapshots = WEIGHT_SNAPSHOTS.prefix((asset.denom.as_str(), validator_addr)).range(
        store,
        Some(Bound::inclusive(delegation.last_reward_claim_height)),
        None,
        Order::Ascending,
    );
    for item in snapshots {
        let (_, snapshots_at_height) = item?;
        for snapshot in snapshots_at_height {
            accumulate(
                &mut rewards,
                &indices,
                &snapshot.reward_indices,
                snapshot.prev_reward_weight,
                delegation_tokens,
            )?;
            // never move an index backwards, a snapshot older than the last claim would
            // otherwise pay the same segment twice
            for (denom, index) in snapshot.reward_indices {
                let current = indices.entry(denom).or_default();
                *current = (*current).max(index);
            }
        }
    }

    accumulate(
        &mut rewards,
        &indices,
        &validator.global_reward_indices,
        asset.reward_weight,
        delegation_tokens,
    )?;

    // segments are summed before truncating so their fractions add up
    let mut coins = vec![];
    for (denom, amount) in rewards {
        let amount = truncate_with_epsilon(amount)?;
        if !amount.is_zero() {
            coins.push(Coin {
                denom,
                amount,
            });
        }
    }

    Ok((coins, validator.global_reward_indices.clone()))
}

/// Settles a delegation: flushes the validator's rewards, pays what the delegation earned from
/// the rewards pool and moves its indices to the validator's current ones.
pub fn settle_delegation_rewards(
    store: &mut dyn Storage,
    env: &Env,
    keepers: &mut dyn Keepers,
    delegator: &Addr,
    validator: &str,
    asset: &AllianceAsset,
) -> ContractResult<Vec<Coin>> {
    let key = (delegator, validator, asset.denom.as_str());
    if !DELEGATIONS.has(store, key) {
        return Err(ContractError::DelegationNotFound {
            delegator: delegator.to_string(),
            validator: validator.to_string(),
            denom: asset.denom.clone(),
        });
    }

    claim_validator_rewards(store, env, keepers, validator)?;

    let mut delegation = DELEGATIONS.load(store, key)?;
    let info = VALIDATORS.may_load(store, validator)?.unwrap_or_default();
    let (rewards, indices) = calculate_rewards(store, &delegation, validator, &info, asset)?;

    delegation.reward_indices = indices;
    delegation.last_reward_claim_height = env.block.height;
    DELEGATIONS.save(store, key, &delegation)?;

    if !rewards.is_empty() {
        keepers.send_from_module_to_account(REWARDS_POOL, delegator.as_str(), &rewards)?;
    }

    Ok(rewards)
}

pub fn claim_delegation_rewards(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    keepers: &mut dyn Keepers,
    validator: String,
    denom: String,
) -> ContractResult<Response> {
    let asset = ASSETS.may_load(deps.storage, &denom)?.ok_or_else(|| ContractError::UnknownAsset {
        denom: denom.clone(),
    })?;

    let rewards =
        settle_delegation_rewards(deps.storage, &env, keepers, &info.sender, &validator, &asset)?;

    Ok(Response::new()
        .add_event(build_claim_event(info.sender.as_str(), &validator, &denom, &rewards))
        .set_data(to_json_binary(&ClaimRewardsResponse {
            rewards,
        })?))
}

use std::collections::BTreeMap;

use alliance_types::keepers::{Keepers, ValidatorStatus, ALLIANCE_MODULE, BONDED_POOL};
use alliance_utils::math::{decimal256_to_uint128_floor, divide_decimal256, uint128_to_decimal256};
use cosmwasm_std::{Coin, Decimal256, Env, Event, Storage};

use crate::{
    error::ContractResult,
    events::build_rebalance_event,
    reward::claim_validator_rewards,
    state::{load_assets, queue_rebalance, validator_addresses, VALIDATORS},
};

/// Native stake the engine should hold on a bonded validator: for every started asset, the
/// validator's part of the bonded asset shares times `reward_weight * native_bonded`.
fn expected_bond(
    store: &mut dyn Storage,
    validator: &str,
    native_bonded: Decimal256,
    unbonded_shares: &BTreeMap<String, Decimal256>,
    block_time: u64,
) -> ContractResult<Decimal256> {
    let info = VALIDATORS.load(store, validator)?;
    let mut expected = Decimal256::zero();

    for asset in load_assets(store)? {
        if !asset.rewards_started(block_time) {
            queue_rebalance(store)?;
            continue;
        }
        let validator_shares = info.validator_shares(&asset.denom);
        let bonded_shares = asset
            .total_validator_shares
            .saturating_sub(unbonded_shares.get(&asset.denom).copied().unwrap_or_default());
        if validator_shares.is_zero() || bonded_shares.is_zero() {
            continue;
        }
        let weighted_bonded = Decimal256::from(asset.reward_weight).checked_mul(native_bonded)?;
        let bond =
            divide_decimal256(validator_shares, bonded_shares)?.checked_mul(weighted_bonded)?;
        expected = expected.checked_add(bond)?;
    }

    Ok(expected)
}

/// Mints and delegates, or unbonds and burns, native stake on every bonded validator until the
/// engine's stake matches the weighted asset holdings. Shares held by validators outside the
/// bonded set stay in storage but are left out of the denominators.
pub fn rebalance_bond_token_weights(
    store: &mut dyn Storage,
    env: &Env,
    keepers: &mut dyn Keepers,
) -> ContractResult<Vec<Event>> {
    let block_time = env.block.time.seconds();
    let bond_denom = keepers.bond_denom()?;

    let mut bonded = vec![];
    let mut unbonded_shares: BTreeMap<String, Decimal256> = BTreeMap::new();
    let mut alliance_bonded = Decimal256::zero();
    for validator in validator_addresses(store)? {
        if keepers.validator_status(&validator)? == Some(ValidatorStatus::Bonded) {
            if let Some(tokens) = keepers.delegated_tokens(&validator)? {
                alliance_bonded = alliance_bonded.checked_add(Decimal256::from(tokens))?;
            }
            bonded.push(validator);
        } else {
            let info = VALIDATORS.load(store, &validator)?;
            for (denom, shares) in info.validator_shares {
                let total = unbonded_shares.entry(denom).or_default();
                *total = total.checked_add(shares)?;
            }
        }
    }

    let native_bonded = uint128_to_decimal256(
        keepers
            .total_bonded_tokens()?
            .saturating_sub(decimal256_to_uint128_floor(alliance_bonded)?),
    )?;

    let mut events = vec![];
    for validator in bonded {
        let current = Decimal256::from(keepers.delegated_tokens(&validator)?.unwrap_or_default());
        let expected =
            expected_bond(store, &validator, native_bonded, &unbonded_shares, block_time)?;

        if expected > current {
            let amount = decimal256_to_uint128_floor(expected - current)?;
            if amount.is_zero() {
                continue;
            }
            keepers.mint_coins(ALLIANCE_MODULE, &[Coin::new(amount.u128(), &bond_denom)])?;
            claim_validator_rewards(store, env, keepers, &validator)?;
            keepers.delegate(&validator, amount)?;
            events.push(build_rebalance_event(&validator, "delegate", amount));
        } else if expected < current {
            let amount = decimal256_to_uint128_floor(current - expected)?;
            if amount.is_zero() {
                continue;
            }
            let shares = keepers.validate_unbond_amount(&validator, amount)?;
            claim_validator_rewards(store, env, keepers, &validator)?;
            let tokens = keepers.unbond(&validator, shares)?;
            if !tokens.is_zero() {
                keepers.burn_coins(BONDED_POOL, &[Coin::new(tokens.u128(), &bond_denom)])?;
            }
            events.push(build_rebalance_event(&validator, "undelegate", tokens));
        }
    }

    Ok(events)
}

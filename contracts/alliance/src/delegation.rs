use alliance_types::{
    asset::AllianceAsset,
    delegation::{Delegation, Redelegation, Undelegation},
    keepers::{Keepers, ALLIANCE_MODULE},
    msg::{DelegateResponse, UnbondingResponse},
    validator::ValidatorInfo,
};
use cosmwasm_std::{
    to_json_binary, Addr, Coin, Decimal256, DepsMut, Env, Event, MessageInfo, Order, Response,
    Storage,
};
use cw_storage_plus::PrefixBound;

use crate::{
    error::{ContractError, ContractResult},
    events::build_delegation_event,
    reward::{claim_validator_rewards, settle_delegation_rewards},
    state::{
        queue_rebalance, ASSETS, DELEGATIONS, REDELEGATIONS_IN, REDELEGATION_QUEUE,
        UNDELEGATION_QUEUE, VALIDATORS,
    },
};

fn load_asset(store: &dyn Storage, denom: &str) -> ContractResult<AllianceAsset> {
    ASSETS.may_load(store, denom)?.ok_or_else(|| ContractError::UnknownAsset {
        denom: denom.to_string(),
    })
}

fn assert_known_validator(keepers: &dyn Keepers, validator: &str) -> ContractResult<()> {
    if keepers.validator_status(validator)?.is_none() {
        return Err(ContractError::UnknownValidator {
            validator: validator.to_string(),
        });
    }
    Ok(())
}

/// Settles the delegation if there is one. Otherwise only the validator's rewards are flushed,
/// so that a new delegation does not share in rewards earned before it existed.
fn settle_before_change(
    store: &mut dyn Storage,
    env: &Env,
    keepers: &mut dyn Keepers,
    delegator: &Addr,
    validator: &str,
    asset: &AllianceAsset,
) -> ContractResult<()> {
    if DELEGATIONS.has(store, (delegator, validator, asset.denom.as_str())) {
        settle_delegation_rewards(store, env, keepers, delegator, validator, asset)?;
    } else {
        claim_validator_rewards(store, env, keepers, validator)?;
    }
    Ok(())
}

/// Issues shares of `validator`'s pool for `amount` new tokens. Custody is up to the caller.
fn add_to_delegation(
    store: &mut dyn Storage,
    env: &Env,
    delegator: &Addr,
    validator: &str,
    asset: &mut AllianceAsset,
    amount: &Coin,
) -> ContractResult<Decimal256> {
    let mut info = VALIDATORS.may_load(store, validator)?.unwrap_or_default();
    // the key must not borrow `asset`, its totals change below
    let denom = asset.denom.clone();
    let key = (delegator, validator, denom.as_str());
    let mut delegation = DELEGATIONS.may_load(store, key)?.unwrap_or_else(|| Delegation {
        shares: Decimal256::zero(),
        reward_indices: info.global_reward_indices.clone(),
        last_reward_claim_height: env.block.height,
    });

    let delegator_shares = info.delegation_shares_from_tokens(asset, amount.amount)?;
    let validator_shares = ValidatorInfo::validator_shares_from_tokens(asset, amount.amount)?;

    info.add_shares(&asset.denom, delegator_shares, validator_shares)?;
    asset.increase_tokens(amount.amount, validator_shares)?;
    delegation.shares = delegation.shares.checked_add(delegator_shares)?;

    VALIDATORS.save(store, validator, &info)?;
    DELEGATIONS.save(store, key, &delegation)?;

    Ok(delegator_shares)
}

/// Burns the shares backing `amount` tokens of a settled delegation and returns the delegator
/// shares burnt.
fn remove_from_delegation(
    store: &mut dyn Storage,
    delegator: &Addr,
    validator: &str,
    asset: &mut AllianceAsset,
    amount: &Coin,
) -> ContractResult<Decimal256> {
    let denom = asset.denom.clone();
    let key = (delegator, validator, denom.as_str());
    let mut delegation = DELEGATIONS.load(store, key)?;
    let mut info = VALIDATORS.load(store, validator)?;

    let available = info.delegation_tokens(asset, delegation.shares)?;
    if available < amount.amount {
        return Err(ContractError::InsufficientTokens {
            available: available.to_string(),
            requested: amount.amount.to_string(),
        });
    }

    let delegator_shares = if available == amount.amount {
        delegation.shares
    } else {
        info.delegation_shares_from_tokens(asset, amount.amount)?.min(delegation.shares)
    };
    let validator_shares = ValidatorInfo::validator_shares_from_tokens(asset, amount.amount)?;

    let removed_validator_shares =
        info.reduce_shares(&asset.denom, delegator_shares, validator_shares);
    asset.decrease_tokens(amount.amount, removed_validator_shares)?;
    delegation.shares = delegation.shares.checked_sub(delegator_shares)?;

    VALIDATORS.save(store, validator, &info)?;
    if delegation.shares.is_zero() {
        DELEGATIONS.remove(store, key);
    } else {
        DELEGATIONS.save(store, key, &delegation)?;
    }

    Ok(delegator_shares)
}

pub fn delegate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    keepers: &mut dyn Keepers,
    validator: String,
    amount: Coin,
) -> ContractResult<Response> {
    let mut asset = load_asset(deps.storage, &amount.denom)?;
    if amount.amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }
    assert_known_validator(keepers, &validator)?;

    keepers.send_from_account_to_module(
        info.sender.as_str(),
        ALLIANCE_MODULE,
        &[amount.clone()],
    )?;

    settle_before_change(deps.storage, &env, keepers, &info.sender, &validator, &asset)?;
    let shares =
        add_to_delegation(deps.storage, &env, &info.sender, &validator, &mut asset, &amount)?;
    ASSETS.save(deps.storage, &asset.denom, &asset)?;
    queue_rebalance(deps.storage)?;

    Ok(Response::new()
        .add_event(build_delegation_event(
            "delegate",
            info.sender.as_str(),
            &validator,
            &amount,
            shares,
        ))
        .set_data(to_json_binary(&DelegateResponse {
            shares,
        })?))
}

pub fn undelegate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    keepers: &mut dyn Keepers,
    validator: String,
    amount: Coin,
) -> ContractResult<Response> {
    let mut asset = load_asset(deps.storage, &amount.denom)?;
    if amount.amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }

    settle_delegation_rewards(deps.storage, &env, keepers, &info.sender, &validator, &asset)?;
    let shares =
        remove_from_delegation(deps.storage, &info.sender, &validator, &mut asset, &amount)?;
    ASSETS.save(deps.storage, &asset.denom, &asset)?;

    let completion_time = env.block.time.seconds().saturating_add(keepers.unbonding_time()?);
    UNDELEGATION_QUEUE.update(
        deps.storage,
        (completion_time, &info.sender),
        |queued| -> ContractResult<_> {
            let mut queued = queued.unwrap_or_default();
            queued.push(Undelegation {
                validator: validator.clone(),
                balance: amount.clone(),
            });
            Ok(queued)
        },
    )?;
    queue_rebalance(deps.storage)?;

    Ok(Response::new()
        .add_event(
            build_delegation_event("undelegate", info.sender.as_str(), &validator, &amount, shares)
                .add_attribute("completion_time", completion_time.to_string()),
        )
        .set_data(to_json_binary(&UnbondingResponse {
            completion_time,
        })?))
}

pub fn redelegate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    keepers: &mut dyn Keepers,
    src_validator: String,
    dst_validator: String,
    amount: Coin,
) -> ContractResult<Response> {
    if src_validator == dst_validator {
        return Err(ContractError::SelfRedelegation {});
    }
    let mut asset = load_asset(deps.storage, &amount.denom)?;
    if amount.amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }
    assert_known_validator(keepers, &dst_validator)?;

    let block_time = env.block.time.seconds();
    let incoming = REDELEGATIONS_IN.may_load(
        deps.storage,
        (&info.sender, src_validator.as_str(), amount.denom.as_str()),
    )?;
    if let Some(completion_time) = incoming.filter(|time| *time > block_time) {
        return Err(ContractError::RedelegationInProgress {
            validator: src_validator,
            completion_time,
        });
    }

    settle_delegation_rewards(deps.storage, &env, keepers, &info.sender, &src_validator, &asset)?;
    settle_before_change(deps.storage, &env, keepers, &info.sender, &dst_validator, &asset)?;

    remove_from_delegation(deps.storage, &info.sender, &src_validator, &mut asset, &amount)?;
    let shares =
        add_to_delegation(deps.storage, &env, &info.sender, &dst_validator, &mut asset, &amount)?;
    ASSETS.save(deps.storage, &asset.denom, &asset)?;

    let completion_time = block_time.saturating_add(keepers.unbonding_time()?);
    REDELEGATION_QUEUE.update(
        deps.storage,
        (completion_time, &info.sender),
        |queued| -> ContractResult<_> {
            let mut queued = queued.unwrap_or_default();
            queued.push(Redelegation {
                src_validator: src_validator.clone(),
                dst_validator: dst_validator.clone(),
                balance: amount.clone(),
            });
            Ok(queued)
        },
    )?;
    REDELEGATIONS_IN.save(
        deps.storage,
        (&info.sender, dst_validator.as_str(), amount.denom.as_str()),
        &completion_time,
    )?;
    queue_rebalance(deps.storage)?;

    Ok(Response::new()
        .add_event(
            build_delegation_event(
                "redelegate",
                info.sender.as_str(),
                &dst_validator,
                &amount,
                shares,
            )
            .add_attribute("src_validator", src_validator)
            .add_attribute("completion_time", completion_time.to_string()),
        )
        .set_data(to_json_binary(&UnbondingResponse {
            completion_time,
        })?))
}

/// Pays out every undelegation whose unbonding period is over.
pub fn complete_undelegations(
    store: &mut dyn Storage,
    env: &Env,
    keepers: &mut dyn Keepers,
) -> ContractResult<Vec<Event>> {
    let matured = UNDELEGATION_QUEUE
        .prefix_range(
            store,
            None,
            Some(PrefixBound::inclusive(env.block.time.seconds())),
            Order::Ascending,
        )
        .collect::<Result<Vec<_>, _>>()?;

    let mut events = vec![];
    for ((completion_time, delegator), undelegations) in matured {
        for undelegation in undelegations {
            keepers.send_from_module_to_account(
                ALLIANCE_MODULE,
                delegator.as_str(),
                &[undelegation.balance.clone()],
            )?;
            events.push(
                Event::new("alliance/complete_undelegation")
                    .add_attribute("delegator", delegator.as_str())
                    .add_attribute("validator", undelegation.validator)
                    .add_attribute("amount", undelegation.balance.to_string()),
            );
        }
        UNDELEGATION_QUEUE.remove(store, (completion_time, &delegator));
    }

    Ok(events)
}

/// Drops redelegations whose unbonding period is over, unlocking their destinations.
pub fn complete_redelegations(store: &mut dyn Storage, env: &Env) -> ContractResult<()> {
    let block_time = env.block.time.seconds();
    let matured = REDELEGATION_QUEUE
        .prefix_range(store, None, Some(PrefixBound::inclusive(block_time)), Order::Ascending)
        .collect::<Result<Vec<_>, _>>()?;

    for ((completion_time, delegator), redelegations) in matured {
        for redelegation in redelegations {
            let key = (
                &delegator,
                redelegation.dst_validator.as_str(),
                redelegation.balance.denom.as_str(),
            );
            if REDELEGATIONS_IN.may_load(store, key)?.map_or(false, |time| time <= block_time) {
                REDELEGATIONS_IN.remove(store, key);
            }
        }
        REDELEGATION_QUEUE.remove(store, (completion_time, &delegator));
    }

    Ok(())
}

/// Starts the validator over with an empty account.
pub fn validator_created(deps: DepsMut, validator: String) -> ContractResult<Response> {
    VALIDATORS.save(deps.storage, &validator, &ValidatorInfo::default())?;
    Ok(Response::new()
        .add_event(Event::new("alliance/validator_created").add_attribute("validator", validator)))
}

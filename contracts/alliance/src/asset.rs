use alliance_types::{
    asset::{AllianceAsset, RewardWeightRange},
    keepers::Keepers,
    validator::RewardWeightChangeSnapshot,
};
use alliance_utils::helpers::{decimal_param_gt_zero, decimal_param_lt_one};
use cosmwasm_std::{Decimal, DepsMut, Env, Event, MessageInfo, Response, Storage};

use crate::{
    error::{ContractError, ContractResult},
    events::{build_asset_event, build_initialize_event},
    reward::claim_validator_rewards,
    state::{
        append_weight_snapshot, load_assets, queue_rebalance, validator_addresses, ASSETS, OWNER,
        PARAMS, VALIDATORS,
    },
};

#[allow(clippy::too_many_arguments)]
pub fn create_alliance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    denom: String,
    reward_weight: Decimal,
    reward_weight_range: RewardWeightRange,
    take_rate: Decimal,
    reward_change_rate: Option<Decimal>,
    reward_change_interval: Option<u64>,
) -> ContractResult<Response> {
    OWNER.assert_owner(deps.storage, &info.sender)?;

    if ASSETS.has(deps.storage, &denom) {
        return Err(ContractError::AssetAlreadyExists {
            denom,
        });
    }

    let params = PARAMS.load(deps.storage)?;
    let reward_start_time = env.block.time.seconds().saturating_add(params.reward_delay_time);

    let mut asset =
        AllianceAsset::new(denom, reward_weight, reward_weight_range, take_rate, reward_start_time);
    if let Some(rate) = reward_change_rate {
        asset.reward_change_rate = rate;
    }
    if let Some(interval) = reward_change_interval {
        asset.reward_change_interval = interval;
    }
    asset.validate()?;

    ASSETS.save(deps.storage, &asset.denom, &asset)?;

    Ok(Response::new().add_event(build_asset_event("create_alliance", &asset)))
}

#[allow(clippy::too_many_arguments)]
pub fn update_alliance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    keepers: &mut dyn Keepers,
    denom: String,
    reward_weight: Option<Decimal>,
    take_rate: Option<Decimal>,
    reward_change_rate: Option<Decimal>,
    reward_change_interval: Option<u64>,
) -> ContractResult<Response> {
    OWNER.assert_owner(deps.storage, &info.sender)?;

    let mut asset = ASSETS.may_load(deps.storage, &denom)?.ok_or_else(|| {
        ContractError::UnknownAsset {
            denom: denom.clone(),
        }
    })?;

    if let Some(weight) = reward_weight {
        asset.reward_weight = weight;
    }
    if let Some(rate) = take_rate {
        decimal_param_lt_one(rate, "take_rate")?;
        asset.take_rate = rate;
    }
    if let Some(rate) = reward_change_rate {
        decimal_param_gt_zero(rate, "reward_change_rate")?;
        asset.reward_change_rate = rate;
    }
    if let Some(interval) = reward_change_interval {
        asset.reward_change_interval = interval;
    }

    let asset = update_alliance_asset(deps.storage, &env, keepers, asset)?;

    Ok(Response::new().add_event(build_asset_event("update_alliance", &asset)))
}

/// Applies the mutable fields of `new_asset` to the stored asset of the same denom and returns
/// the stored result.
///
/// When the weight changes every validator's rewards are first flushed at the old weight, then
/// a snapshot of the old weight and the flushed indices is appended and a rebalance queued.
/// Giving an asset without decay a schedule restarts its decay clock at the current time.
pub fn update_alliance_asset(
    store: &mut dyn Storage,
    env: &Env,
    keepers: &mut dyn Keepers,
    mut new_asset: AllianceAsset,
) -> ContractResult<AllianceAsset> {
    let mut asset = ASSETS.may_load(store, &new_asset.denom)?.ok_or_else(|| {
        ContractError::UnknownAsset {
            denom: new_asset.denom.clone(),
        }
    })?;

    if !asset.reward_weight_range.contains(new_asset.reward_weight) {
        return Err(ContractError::RewardWeightOutOfBound {
            weight: new_asset.reward_weight.to_string(),
            min: asset.reward_weight_range.min.to_string(),
            max: asset.reward_weight_range.max.to_string(),
        });
    }

    if new_asset.reward_weight != asset.reward_weight {
        for validator in validator_addresses(store)? {
            claim_validator_rewards(store, env, keepers, &validator)?;
            let info = VALIDATORS.load(store, &validator)?;
            append_weight_snapshot(
                store,
                &asset.denom,
                &validator,
                env.block.height,
                RewardWeightChangeSnapshot {
                    prev_reward_weight: asset.reward_weight,
                    reward_indices: info.global_reward_indices,
                },
            )?;
        }
        queue_rebalance(store)?;
    }

    let schedule_changed = new_asset.reward_change_rate != asset.reward_change_rate
        || new_asset.reward_change_interval != asset.reward_change_interval;
    if schedule_changed && !asset.has_decay_schedule() {
        new_asset.last_reward_change_time = env.block.time.seconds();
    }

    asset.take_rate = new_asset.take_rate;
    asset.reward_weight = new_asset.reward_weight;
    asset.reward_change_rate = new_asset.reward_change_rate;
    asset.reward_change_interval = new_asset.reward_change_interval;
    asset.last_reward_change_time = new_asset.last_reward_change_time;
    ASSETS.save(store, &asset.denom, &asset)?;

    Ok(asset)
}

pub fn delete_alliance(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
) -> ContractResult<Response> {
    OWNER.assert_owner(deps.storage, &info.sender)?;

    let asset = ASSETS.may_load(deps.storage, &denom)?.ok_or_else(|| {
        ContractError::UnknownAsset {
            denom: denom.clone(),
        }
    })?;
    if !asset.total_tokens.is_zero() {
        return Err(ContractError::AssetNotEmpty {
            denom,
            total_tokens: asset.total_tokens.to_string(),
        });
    }

    ASSETS.remove(deps.storage, &denom);

    Ok(Response::new().add_event(build_asset_event("delete_alliance", &asset)))
}

/// Marks assets whose rewards just started as initialized. A zero weight snapshot per validator
/// closes the warm-up period, during which the asset earned nothing.
pub fn initialize_assets(store: &mut dyn Storage, env: &Env) -> ContractResult<Vec<Event>> {
    let block_time = env.block.time.seconds();
    let mut events = vec![];

    for mut asset in load_assets(store)? {
        if asset.is_initialized || !asset.rewards_started(block_time) {
            continue;
        }
        asset.is_initialized = true;

        let validators = validator_addresses(store)?;
        for validator in &validators {
            let info = VALIDATORS.load(store, validator)?;
            append_weight_snapshot(
                store,
                &asset.denom,
                validator,
                env.block.height,
                RewardWeightChangeSnapshot {
                    prev_reward_weight: Decimal::zero(),
                    reward_indices: info.global_reward_indices,
                },
            )?;
        }
        ASSETS.save(store, &asset.denom, &asset)?;

        events.push(build_initialize_event(&asset.denom, validators.len()));
    }

    Ok(events)
}

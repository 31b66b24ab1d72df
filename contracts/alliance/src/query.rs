use alliance_types::{
    asset::AllianceAsset,
    delegation::Delegation,
    msg::{DelegationResponse, RewardWeightSnapshotResponse, ValidatorResponse},
    validator::ValidatorInfo,
};
use cosmwasm_std::{Addr, Coin, Deps, Order, StdResult};
use cw_storage_plus::Bound;

use crate::{
    error::{ContractError, ContractResult},
    reward::calculate_rewards,
    state::{ASSETS, DELEGATIONS, REBALANCE_QUEUED, VALIDATORS, WEIGHT_SNAPSHOTS},
};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 30;

fn load_asset(deps: Deps, denom: &str) -> ContractResult<AllianceAsset> {
    ASSETS.may_load(deps.storage, denom)?.ok_or_else(|| ContractError::UnknownAsset {
        denom: denom.to_string(),
    })
}

fn load_validator(deps: Deps, validator: &str) -> ContractResult<ValidatorInfo> {
    VALIDATORS.may_load(deps.storage, validator)?.ok_or_else(|| ContractError::UnknownValidator {
        validator: validator.to_string(),
    })
}

fn load_delegation(
    deps: Deps,
    delegator: &Addr,
    validator: &str,
    denom: &str,
) -> ContractResult<Delegation> {
    DELEGATIONS.may_load(deps.storage, (delegator, validator, denom))?.ok_or_else(|| {
        ContractError::DelegationNotFound {
            delegator: delegator.to_string(),
            validator: validator.to_string(),
            denom: denom.to_string(),
        }
    })
}

pub fn query_alliance(deps: Deps, denom: String) -> ContractResult<AllianceAsset> {
    load_asset(deps, &denom)
}

pub fn query_alliances(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Vec<AllianceAsset>> {
    let start = start_after.as_ref().map(|denom| Bound::exclusive(denom.as_str()));
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    ASSETS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|res| Ok(res?.1))
        .collect()
}

pub fn query_validator(deps: Deps, validator: String) -> ContractResult<ValidatorResponse> {
    let info = load_validator(deps, &validator)?;
    Ok(ValidatorResponse {
        validator,
        global_reward_indices: info.global_reward_indices,
        total_delegator_shares: info.total_delegator_shares.into_iter().collect(),
        validator_shares: info.validator_shares.into_iter().collect(),
    })
}

fn delegation_response(
    deps: Deps,
    delegator: Addr,
    validator: String,
    denom: String,
) -> ContractResult<DelegationResponse> {
    let delegation = load_delegation(deps, &delegator, &validator, &denom)?;
    let asset = load_asset(deps, &denom)?;
    let info = load_validator(deps, &validator)?;
    let balance = info.delegation_tokens(&asset, delegation.shares)?;

    Ok(DelegationResponse {
        delegator,
        validator,
        denom,
        shares: delegation.shares,
        balance,
        reward_indices: delegation.reward_indices,
        last_reward_claim_height: delegation.last_reward_claim_height,
    })
}

pub fn query_delegation(
    deps: Deps,
    delegator: String,
    validator: String,
    denom: String,
) -> ContractResult<DelegationResponse> {
    let delegator = deps.api.addr_validate(&delegator)?;
    delegation_response(deps, delegator, validator, denom)
}

pub fn query_delegator_delegations(
    deps: Deps,
    delegator: String,
    start_after: Option<(String, String)>,
    limit: Option<u32>,
) -> ContractResult<Vec<DelegationResponse>> {
    let delegator = deps.api.addr_validate(&delegator)?;
    let start = start_after
        .as_ref()
        .map(|(validator, denom)| Bound::exclusive((validator.as_str(), denom.as_str())));
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;

    let keys = DELEGATIONS
        .sub_prefix(&delegator)
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .collect::<StdResult<Vec<_>>>()?;

    keys.into_iter()
        .map(|(validator, denom)| delegation_response(deps, delegator.clone(), validator, denom))
        .collect()
}

/// Rewards a claim would pay at the stored indices. Rewards still held by the bonding ledger
/// are not included.
pub fn query_pending_rewards(
    deps: Deps,
    delegator: String,
    validator: String,
    denom: String,
) -> ContractResult<Vec<Coin>> {
    let delegator = deps.api.addr_validate(&delegator)?;
    let delegation = load_delegation(deps, &delegator, &validator, &denom)?;
    let asset = load_asset(deps, &denom)?;
    let info = VALIDATORS.may_load(deps.storage, &validator)?.unwrap_or_default();

    let (rewards, _) = calculate_rewards(deps.storage, &delegation, &validator, &info, &asset)?;
    Ok(rewards)
}

/// Snapshots are returned a whole height at a time, so a page can hold more than `limit` of
/// them. The next page starts at the last returned height + 1.
pub fn query_reward_weight_snapshots(
    deps: Deps,
    denom: String,
    validator: String,
    start_height: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<RewardWeightSnapshotResponse>> {
    let start = start_height.map(Bound::inclusive);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;

    let mut snapshots = vec![];
    for item in WEIGHT_SNAPSHOTS.prefix((denom.as_str(), validator.as_str())).range(
        deps.storage,
        start,
        None,
        Order::Ascending,
    ) {
        let (height, at_height) = item?;
        snapshots.extend(at_height.into_iter().map(|snapshot| RewardWeightSnapshotResponse {
            height,
            snapshot,
        }));
        if snapshots.len() >= limit {
            break;
        }
    }

    Ok(snapshots)
}

pub fn query_rebalance_queued(deps: Deps) -> StdResult<bool> {
    Ok(REBALANCE_QUEUED.may_load(deps.storage)?.unwrap_or(false))
}

use alliance_types::{
    asset::AllianceAsset,
    delegation::{Delegation, Redelegation, Undelegation},
    params::Params,
    validator::{RewardWeightChangeSnapshot, ValidatorInfo},
};
use cosmwasm_std::{Addr, Order, StdResult, Storage};
use cw_storage_plus::{Item, Map};
use mars_owner::Owner;

pub const OWNER: Owner = Owner::new("owner");
pub const PARAMS: Item<Params> = Item::new("params");

/// Alliance assets, keyed by denom
pub const ASSETS: Map<&str, AllianceAsset> = Map::new("assets");
/// Share pools and reward indices, keyed by validator operator address
pub const VALIDATORS: Map<&str, ValidatorInfo> = Map::new("validators");
/// (delegator, validator, denom) => delegation
pub const DELEGATIONS: Map<(&Addr, &str, &str), Delegation> = Map::new("delegations");
/// (denom, validator, height) => every snapshot written at that height, in write order
pub const WEIGHT_SNAPSHOTS: Map<(&str, &str, u64), Vec<RewardWeightChangeSnapshot>> =
    Map::new("weight_snapshots");
/// (completion time, delegator) => tokens to release
pub const UNDELEGATION_QUEUE: Map<(u64, &Addr), Vec<Undelegation>> =
    Map::new("undelegation_queue");
/// (completion time, delegator) => maturing redelegations
pub const REDELEGATION_QUEUE: Map<(u64, &Addr), Vec<Redelegation>> =
    Map::new("redelegation_queue");
/// (delegator, dst validator, denom) => completion time of the latest redelegation into it
pub const REDELEGATIONS_IN: Map<(&Addr, &str, &str), u64> = Map::new("redelegations_in");
/// Present while a rebalance is pending
pub const REBALANCE_QUEUED: Item<bool> = Item::new("rebalance_queued");

pub fn load_assets(store: &dyn Storage) -> StdResult<Vec<AllianceAsset>> {
    ASSETS.range(store, None, None, Order::Ascending).map(|item| Ok(item?.1)).collect()
}

pub fn validator_addresses(store: &dyn Storage) -> StdResult<Vec<String>> {
    VALIDATORS.keys(store, None, None, Order::Ascending).collect()
}

pub fn queue_rebalance(store: &mut dyn Storage) -> StdResult<()> {
    REBALANCE_QUEUED.save(store, &true)
}

/// Clears the pending rebalance and returns whether there was one.
pub fn consume_rebalance(store: &mut dyn Storage) -> StdResult<bool> {
    let queued = REBALANCE_QUEUED.may_load(store)?.unwrap_or(false);
    REBALANCE_QUEUED.remove(store);
    Ok(queued)
}

pub fn append_weight_snapshot(
    store: &mut dyn Storage,
    denom: &str,
    validator: &str,
    height: u64,
    snapshot: RewardWeightChangeSnapshot,
) -> StdResult<()> {
    WEIGHT_SNAPSHOTS.update(store, (denom, validator, height), |snapshots| -> StdResult<_> {
        let mut snapshots = snapshots.unwrap_or_default();
        snapshots.push(snapshot);
        Ok(snapshots)
    })?;
    Ok(())
}

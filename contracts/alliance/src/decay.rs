use alliance_types::keepers::Keepers;
use cosmwasm_std::{Env, Event, Storage};

use crate::{
    asset::update_alliance_asset,
    error::ContractResult,
    events::build_decay_event,
    state::{load_assets, queue_rebalance},
};

/// Compounds the reward weight of every asset whose decay interval elapsed. The clock moves by
/// whole intervals only, and the new weight goes through the regular update path so that
/// rewards earned at the old weight are snapshotted.
pub fn reward_weight_decay(
    store: &mut dyn Storage,
    env: &Env,
    keepers: &mut dyn Keepers,
) -> ContractResult<Vec<Event>> {
    let block_time = env.block.time.seconds();
    let mut events = vec![];

    for mut asset in load_assets(store)? {
        if !asset.has_decay_schedule() {
            continue;
        }
        let last_change = asset.last_reward_change_time;
        if last_change.saturating_add(asset.reward_change_interval) > block_time {
            continue;
        }

        let intervals = (block_time - last_change) / asset.reward_change_interval;
        let old_weight = asset.reward_weight;

        asset.reward_weight = asset.decayed_weight(intervals);
        asset.last_reward_change_time = last_change + intervals * asset.reward_change_interval;

        queue_rebalance(store)?;
        let asset = update_alliance_asset(store, env, keepers, asset)?;

        events.push(build_decay_event(&asset.denom, old_weight, asset.reward_weight));
    }

    Ok(events)
}

use alliance_types::keepers::Keepers;
use cosmwasm_std::{DepsMut, Env, Response};

use crate::{
    asset::initialize_assets,
    decay::reward_weight_decay,
    delegation::{complete_redelegations, complete_undelegations},
    error::ContractResult,
    rebalance::rebalance_bond_token_weights,
    state::consume_rebalance,
    take_rate::deduct_asset_take_rate,
};

/// Block hook. Any error aborts the whole block.
///
/// Order matters: matured queue entries are released first, newly started assets are activated
/// before they can be taxed, and the rebalance sees the weights produced by decay.
pub fn end_block(deps: DepsMut, env: Env, keepers: &mut dyn Keepers) -> ContractResult<Response> {
    complete_redelegations(deps.storage, &env)?;
    let mut events = complete_undelegations(deps.storage, &env, keepers)?;

    events.extend(initialize_assets(deps.storage, &env)?);
    events.extend(deduct_asset_take_rate(deps.storage, &env, keepers)?);
    events.extend(reward_weight_decay(deps.storage, &env, keepers)?);

    if consume_rebalance(deps.storage)? {
        events.extend(rebalance_bond_token_weights(deps.storage, &env, keepers)?);
    }

    Ok(Response::new().add_attribute("action", "end_block").add_events(events))
}

use alliance_types::keepers::{Keepers, ALLIANCE_MODULE, FEE_COLLECTOR};
use alliance_utils::math::{decimal256_to_uint128_floor, decimal_pow, uint128_to_decimal256};
use cosmwasm_std::{Coin, Decimal, Decimal256, Env, Event, Storage};

use crate::{
    error::ContractResult,
    events::build_deduct_event,
    state::{load_assets, ASSETS, PARAMS},
};

/// Taxes every started asset for the take rate intervals elapsed on the shared clock and sends
/// the deducted tokens from custody to the fee collector.
///
/// An asset whose rewards started after the last claim is only taxed for the intervals that
/// elapsed since its start. A remaining total of 1 or less is never taxed.
pub fn deduct_asset_take_rate(
    store: &mut dyn Storage,
    env: &Env,
    keepers: &mut dyn Keepers,
) -> ContractResult<Vec<Event>> {
    let block_time = env.block.time.seconds();
    let mut params = PARAMS.load(store)?;

    // the clock starts at the first invocation
    if params.last_take_rate_claim_time == 0 {
        params.last_take_rate_claim_time = block_time;
        PARAMS.save(store, &params)?;
        return Ok(vec![]);
    }

    let interval = params.take_rate_claim_interval;
    let last_claim_time = params.last_take_rate_claim_time;
    if block_time <= last_claim_time.saturating_add(interval) {
        return Ok(vec![]);
    }
    let intervals = (block_time - last_claim_time) / interval;

    let mut taxed_assets = 0;
    let mut deducted = vec![];
    for mut asset in load_assets(store)? {
        if asset.total_tokens.is_zero()
            || asset.take_rate.is_zero()
            || !asset.rewards_started(block_time)
        {
            continue;
        }
        taxed_assets += 1;

        let taxed_since = last_claim_time.max(asset.reward_start_time);
        let asset_intervals = (block_time - taxed_since) / interval;
        if asset_intervals == 0 {
            continue;
        }

        // (1 - rate)^n only fails once n leaves u32, by then nothing is left
        let multiplier =
            decimal_pow(Decimal::one() - asset.take_rate, asset_intervals).unwrap_or_default();
        let remaining =
            uint128_to_decimal256(asset.total_tokens)?.checked_mul(Decimal256::from(multiplier))?;
        if remaining <= Decimal256::one() {
            continue;
        }

        let remaining = decimal256_to_uint128_floor(remaining)?;
        let amount = asset.total_tokens.checked_sub(remaining)?;
        if amount.is_zero() {
            continue;
        }
        asset.total_tokens = remaining;
        ASSETS.save(store, &asset.denom, &asset)?;

        deducted.push(Coin {
            denom: asset.denom,
            amount,
        });
    }

    if taxed_assets == 0 {
        params.last_take_rate_claim_time = block_time;
        PARAMS.save(store, &params)?;
        return Ok(vec![]);
    }
    if deducted.is_empty() {
        return Ok(vec![]);
    }

    keepers.send_from_module_to_module(ALLIANCE_MODULE, FEE_COLLECTOR, &deducted)?;

    params.last_take_rate_claim_time = last_claim_time + intervals * interval;
    PARAMS.save(store, &params)?;

    Ok(vec![build_deduct_event(&deducted, params.last_take_rate_claim_time)])
}

use alliance_types::asset::AllianceAsset;
use cosmwasm_std::{Coin, Decimal, Decimal256, Event, Uint128};

fn coins_to_string(coins: &[Coin]) -> String {
    coins.iter().map(|coin| coin.to_string()).collect::<Vec<_>>().join(",")
}

pub fn build_asset_event(action: &str, asset: &AllianceAsset) -> Event {
    Event::new(format!("alliance/{action}"))
        .add_attribute("denom", &asset.denom)
        .add_attribute("reward_weight", asset.reward_weight.to_string())
        .add_attribute("take_rate", asset.take_rate.to_string())
        .add_attribute("reward_change_rate", asset.reward_change_rate.to_string())
        .add_attribute("reward_change_interval", asset.reward_change_interval.to_string())
        .add_attribute("reward_start_time", asset.reward_start_time.to_string())
}

pub fn build_initialize_event(denom: &str, validators: usize) -> Event {
    Event::new("alliance/initialize_asset")
        .add_attribute("denom", denom)
        .add_attribute("snapshots", validators.to_string())
}

pub fn build_decay_event(denom: &str, old_weight: Decimal, new_weight: Decimal) -> Event {
    Event::new("alliance/reward_weight_decay")
        .add_attribute("denom", denom)
        .add_attribute("old_reward_weight", old_weight.to_string())
        .add_attribute("new_reward_weight", new_weight.to_string())
}

pub fn build_deduct_event(coins: &[Coin], last_claim_time: u64) -> Event {
    Event::new("alliance/deduct_assets")
        .add_attribute("coins", coins_to_string(coins))
        .add_attribute("last_take_rate_claim_time", last_claim_time.to_string())
}

pub fn build_delegation_event(
    action: &str,
    delegator: &str,
    validator: &str,
    amount: &Coin,
    shares: Decimal256,
) -> Event {
    Event::new(format!("alliance/{action}"))
        .add_attribute("delegator", delegator)
        .add_attribute("validator", validator)
        .add_attribute("amount", amount.to_string())
        .add_attribute("shares", shares.to_string())
}

pub fn build_claim_event(delegator: &str, validator: &str, denom: &str, rewards: &[Coin]) -> Event {
    Event::new("alliance/claim_delegation_rewards")
        .add_attribute("delegator", delegator)
        .add_attribute("validator", validator)
        .add_attribute("denom", denom)
        .add_attribute("rewards", coins_to_string(rewards))
}

pub fn build_rebalance_event(validator: &str, action: &str, amount: Uint128) -> Event {
    Event::new("alliance/rebalance")
        .add_attribute("validator", validator)
        .add_attribute("action", action)
        .add_attribute("amount", amount.to_string())
}

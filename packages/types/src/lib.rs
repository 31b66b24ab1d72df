pub mod asset;
pub mod delegation;
pub mod keepers;
pub mod msg;
pub mod params;
pub mod validator;

use std::collections::BTreeMap;

use cosmwasm_std::Decimal256;

/// Cumulative reward per unit of weighted value, keyed by reward coin denom.
pub type RewardIndices = BTreeMap<String, Decimal256>;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Coin, Decimal256};

use crate::RewardIndices;

/// Shares a delegator holds of one validator's pool for one asset.
#[cw_serde]
pub struct Delegation {
    pub shares: Decimal256,
    /// Copy of the validator's global indices as of the last settlement
    pub reward_indices: RewardIndices,
    /// Block height of the last settlement. Weight snapshots from this height on apply to the
    /// next claim
    pub last_reward_claim_height: u64,
}

/// Tokens on their way back to a delegator, released once the unbonding period is over.
#[cw_serde]
pub struct Undelegation {
    pub validator: String,
    pub balance: Coin,
}

/// Shares moved between validators. Until it matures, the destination delegation can not be
/// redelegated again.
#[cw_serde]
pub struct Redelegation {
    pub src_validator: String,
    pub dst_validator: String,
    pub balance: Coin,
}

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, Decimal, Decimal256, Uint128};
use mars_owner::OwnerUpdate;

use crate::{
    asset::{AllianceAsset, RewardWeightRange},
    params::Params,
    validator::RewardWeightChangeSnapshot,
    RewardIndices,
};

#[cw_serde]
pub struct InstantiateMsg {
    /// Contract owner, allowed to manage alliance assets and params
    pub owner: String,
    /// Delay (in seconds) between the creation of an asset and the start of its rewards
    pub reward_delay_time: u64,
    /// Length (in seconds) of a take rate interval
    pub take_rate_claim_interval: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Register a new alliance asset (only callable by owner).
    ///
    /// Rewards of the asset start `reward_delay_time` seconds after creation.
    CreateAlliance {
        denom: String,
        reward_weight: Decimal,
        reward_weight_range: RewardWeightRange,
        take_rate: Decimal,
        /// Defaults to 1 (no decay)
        reward_change_rate: Option<Decimal>,
        /// Defaults to 0 (no decay)
        reward_change_interval: Option<u64>,
    },

    /// Update an alliance asset (only callable by owner).
    ///
    /// A weight change settles every validator's rewards at the old weight first.
    UpdateAlliance {
        denom: String,
        reward_weight: Option<Decimal>,
        take_rate: Option<Decimal>,
        reward_change_rate: Option<Decimal>,
        reward_change_interval: Option<u64>,
    },

    /// Remove an alliance asset that has no tokens delegated (only callable by owner)
    DeleteAlliance {
        denom: String,
    },

    /// Update params (only callable by owner)
    UpdateParams {
        reward_delay_time: Option<u64>,
        take_rate_claim_interval: Option<u64>,
    },

    /// Manages admin role state
    UpdateOwner(OwnerUpdate),

    /// Delegate an alliance asset held by the sender to a validator
    Delegate {
        validator: String,
        amount: Coin,
    },

    /// Start unbonding an alliance asset. Tokens are returned once the unbonding period is over
    Undelegate {
        validator: String,
        amount: Coin,
    },

    /// Move a delegation to another validator
    Redelegate {
        src_validator: String,
        dst_validator: String,
        amount: Coin,
    },

    /// Claim the rewards of a delegation
    ClaimDelegationRewards {
        validator: String,
        denom: String,
    },
}

/// Messages only the chain can send.
#[cw_serde]
pub enum SudoMsg {
    /// Runs once at the end of every block
    EndBlock {},

    /// A validator joined the bonding ledger
    ValidatorCreated {
        validator: String,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(mars_owner::OwnerResponse)]
    Owner {},

    #[returns(Params)]
    Params {},

    #[returns(AllianceAsset)]
    Alliance {
        denom: String,
    },

    #[returns(Vec<AllianceAsset>)]
    Alliances {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    #[returns(ValidatorResponse)]
    Validator {
        validator: String,
    },

    #[returns(DelegationResponse)]
    Delegation {
        delegator: String,
        validator: String,
        denom: String,
    },

    /// Delegations of a delegator, ordered by (validator, denom)
    #[returns(Vec<DelegationResponse>)]
    DelegatorDelegations {
        delegator: String,
        start_after: Option<(String, String)>,
        limit: Option<u32>,
    },

    /// Rewards a claim would pay right now, not counting validator rewards that were not
    /// withdrawn from the bonding ledger yet
    #[returns(Vec<Coin>)]
    PendingRewards {
        delegator: String,
        validator: String,
        denom: String,
    },

    /// Weight change snapshots of a (denom, validator) pair from `start_height` on.
    ///
    /// Pages end on a height boundary: every snapshot of the last returned height is included,
    /// even past `limit`. Continue from the last returned height + 1.
    #[returns(Vec<RewardWeightSnapshotResponse>)]
    RewardWeightSnapshots {
        denom: String,
        validator: String,
        start_height: Option<u64>,
        limit: Option<u32>,
    },

    #[returns(bool)]
    RebalanceQueued {},
}

#[cw_serde]
pub struct ValidatorResponse {
    pub validator: String,
    pub global_reward_indices: RewardIndices,
    pub total_delegator_shares: Vec<(String, Decimal256)>,
    pub validator_shares: Vec<(String, Decimal256)>,
}

#[cw_serde]
pub struct DelegationResponse {
    pub delegator: Addr,
    pub validator: String,
    pub denom: String,
    pub shares: Decimal256,
    /// Token balance of the shares, rounded with the truncation epsilon
    pub balance: Uint128,
    pub reward_indices: RewardIndices,
    pub last_reward_claim_height: u64,
}

#[cw_serde]
pub struct RewardWeightSnapshotResponse {
    pub height: u64,
    pub snapshot: RewardWeightChangeSnapshot,
}

/// Data returned by `Delegate`.
#[cw_serde]
pub struct DelegateResponse {
    pub shares: Decimal256,
}

/// Data returned by `Undelegate` and `Redelegate`.
#[cw_serde]
pub struct UnbondingResponse {
    pub completion_time: u64,
}

/// Data returned by `ClaimDelegationRewards`.
#[cw_serde]
pub struct ClaimRewardsResponse {
    pub rewards: Vec<Coin>,
}

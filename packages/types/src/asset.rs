use alliance_utils::{
    error::ValidationError,
    helpers::{
        decimal_param_gt_zero, decimal_param_lt_one, decimal_param_within_range,
        validate_native_denom,
    },
    math::decimal_pow,
};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, Decimal256, StdResult, Uint128};

#[cw_serde]
pub struct RewardWeightRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl RewardWeightRange {
    pub fn contains(&self, weight: Decimal) -> bool {
        self.min <= weight && weight <= self.max
    }

    pub fn clamp(&self, weight: Decimal) -> Decimal {
        weight.clamp(self.min, self.max)
    }
}

/// An externally issued token that can be delegated to validators and earn staking rewards
/// proportional to its reward weight.
#[cw_serde]
pub struct AllianceAsset {
    /// Denom of the asset
    pub denom: String,
    /// Native voting power granted per token of the asset
    pub reward_weight: Decimal,
    /// Bounds the reward weight can never leave, including through decay
    pub reward_weight_range: RewardWeightRange,
    /// Portion of the total tokens taxed on every take rate claim interval
    pub take_rate: Decimal,
    /// Tokens currently delegated through the engine
    pub total_tokens: Uint128,
    /// Sum of every validator's shares of `total_tokens`
    pub total_validator_shares: Decimal256,
    /// Time (in seconds) from which the asset accrues rewards and gets taxed
    pub reward_start_time: u64,
    /// Multiplier applied to the reward weight on each decay interval. 1 means no decay
    pub reward_change_rate: Decimal,
    /// Length of a decay interval in seconds. 0 means no decay
    pub reward_change_interval: u64,
    /// Decay clock, always advanced by whole intervals
    pub last_reward_change_time: u64,
    /// Set once the reward start time has passed and the activation snapshot was written
    pub is_initialized: bool,
}

impl AllianceAsset {
    pub fn new(
        denom: String,
        reward_weight: Decimal,
        reward_weight_range: RewardWeightRange,
        take_rate: Decimal,
        reward_start_time: u64,
    ) -> Self {
        Self {
            denom,
            reward_weight,
            reward_weight_range,
            take_rate,
            total_tokens: Uint128::zero(),
            total_validator_shares: Decimal256::zero(),
            reward_start_time,
            reward_change_rate: Decimal::one(),
            reward_change_interval: 0,
            last_reward_change_time: reward_start_time,
            is_initialized: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_native_denom(&self.denom)?;

        if self.reward_weight_range.min > self.reward_weight_range.max {
            return Err(ValidationError::InvalidParam {
                param_name: "reward_weight_range".to_string(),
                invalid_value: format!(
                    "[{}, {}]",
                    self.reward_weight_range.min, self.reward_weight_range.max
                ),
                predicate: "min <= max".to_string(),
            });
        }
        decimal_param_within_range(
            self.reward_weight,
            self.reward_weight_range.min,
            self.reward_weight_range.max,
            "reward_weight",
        )?;
        decimal_param_lt_one(self.take_rate, "take_rate")?;
        decimal_param_gt_zero(self.reward_change_rate, "reward_change_rate")?;

        Ok(())
    }

    pub fn rewards_started(&self, block_time: u64) -> bool {
        self.reward_start_time <= block_time
    }

    /// A rate of 1 or an interval of 0 leaves the weight untouched.
    pub fn has_decay_schedule(&self) -> bool {
        self.reward_change_interval > 0 && self.reward_change_rate != Decimal::one()
    }

    /// Weight after `intervals` decay steps, kept inside the weight range. A result too large to
    /// represent is pinned to the range max.
    pub fn decayed_weight(&self, intervals: u64) -> Decimal {
        let decayed = decimal_pow(self.reward_change_rate, intervals)
            .and_then(|multiplier| Ok(self.reward_weight.checked_mul(multiplier)?));
        match decayed {
            Ok(weight) => self.reward_weight_range.clamp(weight),
            Err(_) if self.reward_change_rate > Decimal::one() => self.reward_weight_range.max,
            // rate < 1 can only underflow towards zero
            Err(_) => self.reward_weight_range.min,
        }
    }

    pub fn increase_tokens(
        &mut self,
        tokens: Uint128,
        validator_shares: Decimal256,
    ) -> StdResult<()> {
        self.total_tokens = self.total_tokens.checked_add(tokens)?;
        self.total_validator_shares = self.total_validator_shares.checked_add(validator_shares)?;
        Ok(())
    }

    pub fn decrease_tokens(
        &mut self,
        tokens: Uint128,
        validator_shares: Decimal256,
    ) -> StdResult<()> {
        self.total_tokens = self.total_tokens.checked_sub(tokens)?;
        self.total_validator_shares = if self.total_tokens.is_zero() {
            Decimal256::zero()
        } else {
            self.total_validator_shares.saturating_sub(validator_shares)
        };
        Ok(())
    }
}

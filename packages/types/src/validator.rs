use std::collections::BTreeMap;

use alliance_utils::math::{
    convert_new_tokens_to_shares, convert_shares_to_tokens, truncate_with_epsilon,
    uint128_to_decimal256,
};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, Decimal256, StdResult, Uint128};

use crate::{asset::AllianceAsset, RewardIndices};

/// Per-validator share pools (one per asset denom) and the validator's global reward indices.
#[cw_serde]
#[derive(Default)]
pub struct ValidatorInfo {
    /// Cumulative reward per unit of weighted value, per reward coin
    pub global_reward_indices: RewardIndices,
    /// Shares issued to delegators, per asset denom
    pub total_delegator_shares: BTreeMap<String, Decimal256>,
    /// This validator's shares of each asset's total tokens
    pub validator_shares: BTreeMap<String, Decimal256>,
}

impl ValidatorInfo {
    pub fn delegator_shares(&self, denom: &str) -> Decimal256 {
        self.total_delegator_shares.get(denom).copied().unwrap_or_default()
    }

    pub fn validator_shares(&self, denom: &str) -> Decimal256 {
        self.validator_shares.get(denom).copied().unwrap_or_default()
    }

    /// Tokens of `asset` backed by this validator's shares.
    pub fn total_tokens_with_asset(&self, asset: &AllianceAsset) -> StdResult<Decimal256> {
        convert_shares_to_tokens(
            uint128_to_decimal256(asset.total_tokens)?,
            asset.total_validator_shares,
            self.validator_shares(&asset.denom),
        )
    }

    /// Delegator shares minted for `tokens`. A pool whose shares truncate to zero mints 1:1.
    pub fn delegation_shares_from_tokens(
        &self,
        asset: &AllianceAsset,
        tokens: Uint128,
    ) -> StdResult<Decimal256> {
        let total_delegator_shares = self.delegator_shares(&asset.denom);
        if total_delegator_shares.to_uint_floor().is_zero() {
            return uint128_to_decimal256(tokens);
        }
        convert_new_tokens_to_shares(
            self.total_tokens_with_asset(asset)?,
            total_delegator_shares,
            tokens,
        )
    }

    /// Validator shares of the asset pool minted for `tokens`.
    pub fn validator_shares_from_tokens(
        asset: &AllianceAsset,
        tokens: Uint128,
    ) -> StdResult<Decimal256> {
        convert_new_tokens_to_shares(
            uint128_to_decimal256(asset.total_tokens)?,
            asset.total_validator_shares,
            tokens,
        )
    }

    /// Whole tokens owned by `delegator_shares`, rounded with the truncation epsilon.
    pub fn delegation_tokens(
        &self,
        asset: &AllianceAsset,
        delegator_shares: Decimal256,
    ) -> StdResult<Uint128> {
        let tokens = convert_shares_to_tokens(
            self.total_tokens_with_asset(asset)?,
            self.delegator_shares(&asset.denom),
            delegator_shares,
        )?;
        truncate_with_epsilon(tokens)
    }

    pub fn add_shares(
        &mut self,
        denom: &str,
        delegator_shares: Decimal256,
        validator_shares: Decimal256,
    ) -> StdResult<()> {
        let total = self.delegator_shares(denom).checked_add(delegator_shares)?;
        self.total_delegator_shares.insert(denom.to_string(), total);
        let total = self.validator_shares(denom).checked_add(validator_shares)?;
        self.validator_shares.insert(denom.to_string(), total);
        Ok(())
    }

    /// Removes shares from both pools and returns the validator shares actually removed. Once no
    /// delegator shares are left, the validator's remaining shares of the asset go with them.
    pub fn reduce_shares(
        &mut self,
        denom: &str,
        delegator_shares: Decimal256,
        validator_shares: Decimal256,
    ) -> Decimal256 {
        let remaining_delegator_shares =
            self.delegator_shares(denom).saturating_sub(delegator_shares);
        let current_validator_shares = self.validator_shares(denom);

        if remaining_delegator_shares.is_zero() {
            self.total_delegator_shares.remove(denom);
            self.validator_shares.remove(denom);
            current_validator_shares
        } else {
            let removed = validator_shares.min(current_validator_shares);
            self.total_delegator_shares.insert(denom.to_string(), remaining_delegator_shares);
            self.validator_shares.insert(denom.to_string(), current_validator_shares - removed);
            removed
        }
    }
}

/// Weight and global indices in effect for a validator right before an asset's weight changed.
#[cw_serde]
pub struct RewardWeightChangeSnapshot {
    pub prev_reward_weight: Decimal,
    pub reward_indices: RewardIndices,
}

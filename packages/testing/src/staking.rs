use std::collections::BTreeMap;

use alliance_types::keepers::ValidatorStatus;
use cosmwasm_std::{Coin, Decimal, StdError, StdResult, Uint128};

pub struct MockValidator {
    pub status: ValidatorStatus,
    pub tokens: Uint128,
    pub delegator_shares: Decimal,
}

fn to_decimal(amount: Uint128) -> StdResult<Decimal> {
    Decimal::from_atomics(amount, 0).map_err(|e| StdError::generic_err(e.to_string()))
}

fn div(a: Decimal, b: Decimal) -> StdResult<Decimal> {
    a.checked_div(b).map_err(|e| StdError::generic_err(e.to_string()))
}

impl MockValidator {
    pub(crate) fn shares_from_tokens(&self, amount: Uint128) -> StdResult<Decimal> {
        if self.tokens.is_zero() {
            return to_decimal(amount);
        }
        div(to_decimal(amount)?.checked_mul(self.delegator_shares)?, to_decimal(self.tokens)?)
    }

    fn tokens_from_shares(&self, shares: Decimal) -> StdResult<Decimal> {
        if self.delegator_shares.is_zero() {
            return Ok(Decimal::zero());
        }
        div(shares.checked_mul(to_decimal(self.tokens)?)?, self.delegator_shares)
    }
}

/// Bonding ledger with one delegator of interest: the alliance module.
pub struct MockStaking {
    pub bond_denom: String,
    pub unbonding_time: u64,
    pub validators: BTreeMap<String, MockValidator>,
    /// Shares of the alliance module's delegation per validator
    pub module_shares: BTreeMap<String, Decimal>,
    /// Rewards accrued by the alliance module's delegation, paid out on withdraw
    pub pending_rewards: BTreeMap<String, Vec<Coin>>,
}

impl Default for MockStaking {
    fn default() -> Self {
        Self {
            bond_denom: "stake".to_string(),
            unbonding_time: 1_814_400,
            validators: BTreeMap::new(),
            module_shares: BTreeMap::new(),
            pending_rewards: BTreeMap::new(),
        }
    }
}

impl MockStaking {
    pub fn validator(&self, validator: &str) -> StdResult<&MockValidator> {
        self.validators
            .get(validator)
            .ok_or_else(|| StdError::not_found(format!("[mock]: validator {validator}")))
    }

    fn validator_mut(&mut self, validator: &str) -> StdResult<&mut MockValidator> {
        self.validators
            .get_mut(validator)
            .ok_or_else(|| StdError::not_found(format!("[mock]: validator {validator}")))
    }

    /// Bonds `amount` to `validator` and returns the shares issued.
    pub fn bond(&mut self, validator: &str, amount: Uint128) -> StdResult<Decimal> {
        let val = self.validator_mut(validator)?;
        let shares = val.shares_from_tokens(amount)?;
        val.tokens = val.tokens.checked_add(amount)?;
        val.delegator_shares = val.delegator_shares.checked_add(shares)?;
        Ok(shares)
    }

    /// Tokens backing `shares` of the alliance module's delegation.
    pub fn module_tokens(&self, validator: &str, shares: Decimal) -> StdResult<Decimal> {
        self.validator(validator)?.tokens_from_shares(shares)
    }

    pub fn unbond_module_shares(&mut self, validator: &str, shares: Decimal) -> StdResult<Uint128> {
        let delegated = self.module_shares.get(validator).copied().unwrap_or_default();
        let remaining = delegated
            .checked_sub(shares)
            .map_err(|_| StdError::generic_err("[mock]: not enough delegation shares"))?;

        let val = self.validator_mut(validator)?;
        let tokens = if shares == val.delegator_shares {
            val.tokens
        } else {
            val.tokens_from_shares(shares)?.to_uint_floor()
        };
        val.tokens = val.tokens.checked_sub(tokens)?;
        val.delegator_shares = val.delegator_shares.checked_sub(shares)?;

        if remaining.is_zero() {
            self.module_shares.remove(validator);
        } else {
            self.module_shares.insert(validator.to_string(), remaining);
        }
        Ok(tokens)
    }

    pub fn total_bonded(&self) -> StdResult<Uint128> {
        self.validators
            .values()
            .filter(|val| val.status == ValidatorStatus::Bonded)
            .try_fold(Uint128::zero(), |total, val| total.checked_add(val.tokens))
            .map_err(Into::into)
    }
}

use alliance_types::keepers::{
    BankKeeper, StakingKeeper, ValidatorStatus, ALLIANCE_MODULE, BONDED_POOL,
};
use cosmwasm_std::{Coin, Decimal, StdError, StdResult, Uint128};

use crate::{bank::MockBank, staking::MockStaking, MockValidator};

/// Deterministic in-memory bonding ledger and bank, driven synchronously by the contract.
#[derive(Default)]
pub struct MockChain {
    pub staking: MockStaking,
    pub bank: MockBank,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a validator holding `self_bond` native tokens from delegators outside the engine.
    pub fn add_validator(&mut self, validator: &str, status: ValidatorStatus, self_bond: u128) {
        self.staking.validators.insert(
            validator.to_string(),
            MockValidator {
                status,
                tokens: Uint128::new(self_bond),
                delegator_shares: Decimal::from_ratio(self_bond, 1u128),
            },
        );
    }

    pub fn set_validator_status(&mut self, validator: &str, status: ValidatorStatus) {
        if let Some(val) = self.staking.validators.get_mut(validator) {
            val.status = status;
        }
    }

    /// Rewards paid to the alliance module on the next withdraw from `validator`.
    pub fn accrue_rewards(&mut self, validator: &str, coins: &[Coin]) {
        let pending = self.staking.pending_rewards.entry(validator.to_string()).or_default();
        for coin in coins {
            match pending.iter_mut().find(|c| c.denom == coin.denom) {
                Some(existing) => existing.amount += coin.amount,
                None => pending.push(coin.clone()),
            }
        }
    }

    pub fn fund(&mut self, account: &str, coins: &[Coin]) {
        for coin in coins {
            let balance = self.bank.balance(account, &coin.denom) + coin.amount;
            self.bank.set_balance(account, Coin::new(balance.u128(), &coin.denom));
        }
    }

    pub fn balance(&self, account: &str, denom: &str) -> Uint128 {
        self.bank.balance(account, denom)
    }

    /// Native tokens delegated by the alliance module to `validator`, rounded down.
    pub fn module_delegation(&self, validator: &str) -> Uint128 {
        self.delegated_tokens(validator)
            .ok()
            .flatten()
            .map(|tokens| tokens.to_uint_floor())
            .unwrap_or_default()
    }
}

impl StakingKeeper for MockChain {
    fn bond_denom(&self) -> StdResult<String> {
        Ok(self.staking.bond_denom.clone())
    }

    fn unbonding_time(&self) -> StdResult<u64> {
        Ok(self.staking.unbonding_time)
    }

    fn total_bonded_tokens(&self) -> StdResult<Uint128> {
        self.staking.total_bonded()
    }

    fn validator_status(&self, validator: &str) -> StdResult<Option<ValidatorStatus>> {
        Ok(self.staking.validators.get(validator).map(|val| val.status.clone()))
    }

    fn delegated_tokens(&self, validator: &str) -> StdResult<Option<Decimal>> {
        match self.staking.module_shares.get(validator) {
            Some(shares) => Ok(Some(self.staking.module_tokens(validator, *shares)?)),
            None => Ok(None),
        }
    }

    fn validate_unbond_amount(&self, validator: &str, amount: Uint128) -> StdResult<Decimal> {
        let val = self.staking.validator(validator)?;
        let delegated = self
            .staking
            .module_shares
            .get(validator)
            .copied()
            .ok_or_else(|| StdError::not_found("[mock]: delegation"))?;
        let shares = val.shares_from_tokens(amount)?;
        if shares.to_uint_floor() > delegated.to_uint_floor() {
            return Err(StdError::generic_err("[mock]: invalid shares amount"));
        }
        Ok(shares.min(delegated))
    }

    fn delegate(&mut self, validator: &str, amount: Uint128) -> StdResult<Decimal> {
        let bond_denom = self.staking.bond_denom.clone();
        self.bank.transfer(ALLIANCE_MODULE, BONDED_POOL, &[Coin::new(amount.u128(), bond_denom)])?;

        let shares = self.staking.bond(validator, amount)?;
        let total = self.staking.module_shares.get(validator).copied().unwrap_or_default();
        self.staking.module_shares.insert(validator.to_string(), total.checked_add(shares)?);
        Ok(shares)
    }

    fn unbond(&mut self, validator: &str, shares: Decimal) -> StdResult<Uint128> {
        self.staking.unbond_module_shares(validator, shares)
    }

    fn withdraw_delegation_rewards(&mut self, validator: &str) -> StdResult<Vec<Coin>> {
        if !self.staking.module_shares.contains_key(validator) {
            return Ok(vec![]);
        }
        let rewards = self.staking.pending_rewards.remove(validator).unwrap_or_default();
        self.bank.add(ALLIANCE_MODULE, &rewards)?;
        Ok(rewards)
    }
}

impl BankKeeper for MockChain {
    fn send_from_account_to_module(
        &mut self,
        sender: &str,
        module: &str,
        coins: &[Coin],
    ) -> StdResult<()> {
        self.bank.transfer(sender, module, coins)
    }

    fn send_from_module_to_account(
        &mut self,
        module: &str,
        recipient: &str,
        coins: &[Coin],
    ) -> StdResult<()> {
        self.bank.transfer(module, recipient, coins)
    }

    fn send_from_module_to_module(
        &mut self,
        sender: &str,
        recipient: &str,
        coins: &[Coin],
    ) -> StdResult<()> {
        self.bank.transfer(sender, recipient, coins)
    }

    fn mint_coins(&mut self, module: &str, coins: &[Coin]) -> StdResult<()> {
        self.bank.add(module, coins)
    }

    fn burn_coins(&mut self, module: &str, coins: &[Coin]) -> StdResult<()> {
        self.bank.sub(module, coins)
    }
}

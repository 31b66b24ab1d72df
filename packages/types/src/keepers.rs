//! Interfaces of the chain modules the engine drives: the bonding ledger and token custody.
//! Every call is synchronous and any error aborts the calling operation.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Coin, Decimal, StdResult, Uint128};

/// Custody account of delegated alliance assets. Also the delegator of the native stake minted
/// by the rebalancer.
pub const ALLIANCE_MODULE: &str = "alliance";
/// Pool that reward claims are paid from.
pub const REWARDS_POOL: &str = "alliance_rewards";
/// Destination of take rate deductions.
pub const FEE_COLLECTOR: &str = "fee_collector";
/// Holds bonded native stake; tokens released by an unbond are burnt from here.
pub const BONDED_POOL: &str = "bonded_tokens_pool";

#[cw_serde]
pub enum ValidatorStatus {
    Bonded,
    Unbonding,
    Unbonded,
}

pub trait StakingKeeper {
    /// Denom of the native bonding token.
    fn bond_denom(&self) -> StdResult<String>;

    /// Unbonding period in seconds.
    fn unbonding_time(&self) -> StdResult<u64>;

    /// Native tokens bonded on chain, including the engine's own delegations.
    fn total_bonded_tokens(&self) -> StdResult<Uint128>;

    /// `None` for an operator address the bonding ledger does not know.
    fn validator_status(&self, validator: &str) -> StdResult<Option<ValidatorStatus>>;

    /// Tokens backing the alliance module's delegation to `validator`, if it has one.
    fn delegated_tokens(&self, validator: &str) -> StdResult<Option<Decimal>>;

    /// Shares of the alliance module's delegation to unbond in order to receive `amount`.
    fn validate_unbond_amount(&self, validator: &str, amount: Uint128) -> StdResult<Decimal>;

    /// Delegates `amount` native tokens held by the alliance module and returns the new shares.
    fn delegate(&mut self, validator: &str, amount: Uint128) -> StdResult<Decimal>;

    /// Unbonds shares of the alliance module's delegation and returns the tokens released into
    /// the bonded pool.
    fn unbond(&mut self, validator: &str, shares: Decimal) -> StdResult<Uint128>;

    /// Pays the rewards accrued by the alliance module's delegation to the alliance module.
    fn withdraw_delegation_rewards(&mut self, validator: &str) -> StdResult<Vec<Coin>>;
}

pub trait BankKeeper {
    fn send_from_account_to_module(
        &mut self,
        sender: &str,
        module: &str,
        coins: &[Coin],
    ) -> StdResult<()>;

    fn send_from_module_to_account(
        &mut self,
        module: &str,
        recipient: &str,
        coins: &[Coin],
    ) -> StdResult<()>;

    fn send_from_module_to_module(
        &mut self,
        sender: &str,
        recipient: &str,
        coins: &[Coin],
    ) -> StdResult<()>;

    fn mint_coins(&mut self, module: &str, coins: &[Coin]) -> StdResult<()>;

    fn burn_coins(&mut self, module: &str, coins: &[Coin]) -> StdResult<()>;
}

/// Everything the engine needs from the chain.
pub trait Keepers: StakingKeeper + BankKeeper {}

impl<T: StakingKeeper + BankKeeper> Keepers for T {}

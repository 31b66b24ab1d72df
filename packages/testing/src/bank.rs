use std::collections::HashMap;

use cosmwasm_std::{Coin, StdError, StdResult, Uint128};

/// Balances of plain accounts and module accounts alike, keyed by account then denom.
#[derive(Default)]
pub struct MockBank {
    pub balances: HashMap<String, HashMap<String, Uint128>>,
}

impl MockBank {
    pub fn balance(&self, account: &str, denom: &str) -> Uint128 {
        self.balances
            .get(account)
            .and_then(|balances| balances.get(denom))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_balance(&mut self, account: &str, coin: Coin) {
        self.balances.entry(account.to_string()).or_default().insert(coin.denom, coin.amount);
    }

    pub fn add(&mut self, account: &str, coins: &[Coin]) -> StdResult<()> {
        for coin in coins {
            let balance = self
                .balances
                .entry(account.to_string())
                .or_default()
                .entry(coin.denom.clone())
                .or_default();
            *balance = balance.checked_add(coin.amount)?;
        }
        Ok(())
    }

    pub fn sub(&mut self, account: &str, coins: &[Coin]) -> StdResult<()> {
        for coin in coins {
            let current = self.balance(account, &coin.denom);
            let remaining = current.checked_sub(coin.amount).map_err(|_| {
                StdError::generic_err(format!(
                    "[mock]: {account} has {current}{} but needs {coin}",
                    coin.denom
                ))
            })?;
            self.set_balance(account, Coin::new(remaining.u128(), &coin.denom));
        }
        Ok(())
    }

    pub fn transfer(&mut self, from: &str, to: &str, coins: &[Coin]) -> StdResult<()> {
        self.sub(from, coins)?;
        self.add(to, coins)
    }
}

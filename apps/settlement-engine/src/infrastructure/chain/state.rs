//! Shared chain state and balance bookkeeping.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::application::ports::LedgerError;
use crate::domain::option_series::OptionSeries;
use crate::domain::shared::Address;

/// One constant-product pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct PoolRecord {
    pub token0: Address,
    pub token1: Address,
    pub reserve0: u128,
    pub reserve1: u128,
}

/// One registered option series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct OptionRecord {
    pub series: OptionSeries,
    /// Underlying held by the option as of the last mint or close.
    pub cached_underlying: u128,
}

/// Everything a checkpoint captures.
#[derive(Debug, Clone)]
pub(super) struct ChainState {
    pub balances: HashMap<(Address, Address), u128>,
    pub allowances: HashMap<(Address, Address, Address), u128>,
    pub pools: HashMap<Address, PoolRecord>,
    pub options: HashMap<Address, OptionRecord>,
    pub now: DateTime<Utc>,
}

impl ChainState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            balances: HashMap::new(),
            allowances: HashMap::new(),
            pools: HashMap::new(),
            options: HashMap::new(),
            now,
        }
    }

    pub fn balance(&self, token: Address, account: Address) -> u128 {
        self.balances.get(&(token, account)).copied().unwrap_or(0)
    }

    pub fn credit(&mut self, token: Address, account: Address, amount: u128) -> Result<(), LedgerError> {
        let entry = self.balances.entry((token, account)).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(LedgerError::Overflow { token, account })?;
        Ok(())
    }

    pub fn debit(&mut self, token: Address, account: Address, amount: u128) -> Result<(), LedgerError> {
        let available = self.balance(token, account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                token,
                account,
                requested: amount,
                available,
            });
        }
        self.balances.insert((token, account), available - amount);
        Ok(())
    }

    pub fn move_balance(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.debit(token, from, amount)?;
        self.credit(token, to, amount)
    }

    pub fn spend_allowance(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let key = (token, owner, spender);
        let allowed = self.allowances.get(&key).copied().unwrap_or(0);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                token,
                owner,
                spender,
                requested: amount,
                allowed,
            });
        }
        if allowed != u128::MAX {
            self.allowances.insert(key, allowed - amount);
        }
        Ok(())
    }
}

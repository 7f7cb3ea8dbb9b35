//! In-memory chain.
//!
//! One shared state backs the token ledger, the option service, the pools
//! and the atomic unit, so the engine can be exercised end to end. Locks are
//! never held across a flash-swap callback.

mod atomic;
mod ledger;
mod options;
mod pools;
mod state;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use crate::application::ports::{AtomicUnitError, LedgerError};
use crate::config::SettlementConfig;
use crate::domain::amm::{PairFactory, PairReserves, SwapFee, sort_tokens};
use crate::domain::option_series::OptionSeries;
use crate::domain::shared::{Address, DomainError};

use state::{ChainState, OptionRecord, PoolRecord};

#[derive(Debug, Default)]
struct Checkpoints {
    next_id: u64,
    stack: Vec<(u64, ChainState)>,
}

impl Checkpoints {
    fn pop_innermost(
        &mut self,
        checkpoint: crate::application::ports::Checkpoint,
    ) -> Result<ChainState, AtomicUnitError> {
        match self.stack.last() {
            Some((id, _)) if *id == checkpoint.0 => {}
            _ if self.stack.iter().any(|(id, _)| *id == checkpoint.0) => {
                return Err(AtomicUnitError::OutOfOrder(checkpoint.0));
            }
            _ => return Err(AtomicUnitError::UnknownCheckpoint(checkpoint.0)),
        }
        self.stack
            .pop()
            .map(|(_, snapshot)| snapshot)
            .ok_or(AtomicUnitError::UnknownCheckpoint(checkpoint.0))
    }
}

/// In-memory implementation of every external service port.
///
/// Suitable for testing and development. Not for production use.
///
/// The atomic unit keeps one checkpoint stack for the whole chain, so a
/// chain must not be shared by operations running concurrently: an
/// interleaved checkpoint from one operation makes the other's commit or
/// revert fail with [`AtomicUnitError::OutOfOrder`], and a revert restores
/// the snapshot over both operations' writes. Drive one engine operation at
/// a time per chain.
#[derive(Debug)]
pub struct InMemoryChain {
    state: RwLock<ChainState>,
    checkpoints: Mutex<Checkpoints>,
    locked_pairs: Mutex<HashSet<Address>>,
    fee: SwapFee,
    pairs: PairFactory,
}

impl InMemoryChain {
    /// Create an empty chain whose pools charge `fee` and live at canonical
    /// addresses derived from `pairs`.
    #[must_use]
    pub fn new(fee: SwapFee, pairs: PairFactory) -> Self {
        Self {
            state: RwLock::new(ChainState::new(Utc::now())),
            checkpoints: Mutex::new(Checkpoints::default()),
            locked_pairs: Mutex::new(HashSet::new()),
            fee,
            pairs,
        }
    }

    /// Create an empty chain with the configured pool fee and factory.
    pub fn from_config(config: &SettlementConfig) -> Result<Self, DomainError> {
        Ok(Self::new(config.swap_fee()?, config.pair_factory()))
    }

    /// Mint `amount` of `token` to `account`.
    pub fn credit(&self, token: Address, account: Address, amount: u128) -> Result<(), LedgerError> {
        self.state.write().credit(token, account, amount)
    }

    /// Set the allowance `spender` may pull from `owner`.
    pub fn approve(&self, token: Address, owner: Address, spender: Address, amount: u128) {
        self.state
            .write()
            .allowances
            .insert((token, owner, spender), amount);
    }

    /// Create an empty pool for two tokens at its canonical address.
    pub fn create_pair(&self, a: Address, b: Address) -> Result<Address, DomainError> {
        let (token0, token1) = sort_tokens(a, b)?;
        let pair = self.pairs.pair_for(token0, token1)?;
        self.state
            .write()
            .pools
            .entry(pair)
            .or_insert(PoolRecord {
                token0,
                token1,
                reserve0: 0,
                reserve1: 0,
            });
        Ok(pair)
    }

    /// Create the pool if needed, deposit liquidity and sync its reserves.
    pub fn seed_pair(
        &self,
        a: Address,
        b: Address,
        amount_a: u128,
        amount_b: u128,
    ) -> Result<Address, DomainError> {
        let pair = self.create_pair(a, b)?;
        let mut state = self.state.write();
        let ledger_err = |e: LedgerError| DomainError::invalid("liquidity", e.to_string());
        state.credit(a, pair, amount_a).map_err(ledger_err)?;
        state.credit(b, pair, amount_b).map_err(ledger_err)?;
        let balance_a = state.balance(a, pair);
        let balance_b = state.balance(b, pair);
        if let Some(pool) = state.pools.get_mut(&pair) {
            if pool.token0 == a {
                pool.reserve0 = balance_a;
                pool.reserve1 = balance_b;
            } else {
                pool.reserve0 = balance_b;
                pool.reserve1 = balance_a;
            }
        }
        Ok(pair)
    }

    /// Register an option series.
    pub fn register_option(&self, series: OptionSeries) {
        let option = series.address();
        self.state.write().options.insert(
            option,
            OptionRecord {
                series,
                cached_underlying: 0,
            },
        );
    }

    /// Set the chain clock.
    pub fn set_time(&self, now: DateTime<Utc>) {
        self.state.write().now = now;
    }

    /// Current chain clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.state.read().now
    }

    /// Canonical pool for two tokens.
    pub fn pair_for(&self, a: Address, b: Address) -> Result<Address, DomainError> {
        self.pairs.pair_for(a, b)
    }

    /// Reserves of the pool for two tokens, if it exists.
    pub fn reserves_for(&self, a: Address, b: Address) -> Option<PairReserves> {
        let pair = self.pair_for(a, b).ok()?;
        crate::application::ports::PoolServicePort::reserves(self, pair).ok()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::shared::CodeHash;

    pub fn pair_factory() -> PairFactory {
        PairFactory::new(Address::from_label("factory"), CodeHash::digest(b"pair"))
    }

    pub fn chain() -> InMemoryChain {
        InMemoryChain::new(SwapFee::default(), pair_factory())
    }

    #[test]
    fn seed_pair_orients_reserves_by_token() {
        let chain = chain();
        let low = Address::repeat_byte(0x01);
        let high = Address::repeat_byte(0x02);

        chain.seed_pair(high, low, 200, 100).unwrap();
        let reserves = chain.reserves_for(low, high).unwrap();
        assert_eq!(reserves.token0, low);
        assert_eq!(reserves.reserve0, 100);
        assert_eq!(reserves.reserve1, 200);
    }

    #[test]
    fn create_pair_uses_canonical_address() {
        let chain = chain();
        let a = Address::from_label("A");
        let b = Address::from_label("B");
        let pair = chain.create_pair(a, b).unwrap();
        assert_eq!(pair, pair_factory().pair_for(b, a).unwrap());
    }
}

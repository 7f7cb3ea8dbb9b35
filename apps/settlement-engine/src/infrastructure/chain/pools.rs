//! Pool service adapter.
//!
//! Uniswap-V2 shaped flash swaps: amounts go out first, the callee runs, and
//! the fee-adjusted constant product of the new balances must be at least
//! that of the old reserves. The whole swap runs in its own checkpoint.

use crate::application::ports::{
    AtomicUnitPort, FlashSwapCallback, FlashSwapCallee, FlashSwapRequest, PoolError,
    PoolServicePort,
};
use crate::domain::amm::{BPS_DENOMINATOR, PairReserves, SwapFee};
use crate::domain::shared::Address;
use crate::domain::shared::math::U256;

use super::InMemoryChain;

/// Releases the per-pair lock on drop.
struct PairLock<'a> {
    chain: &'a InMemoryChain,
    pair: Address,
}

impl<'a> PairLock<'a> {
    fn acquire(chain: &'a InMemoryChain, pair: Address) -> Result<Self, PoolError> {
        if !chain.locked_pairs.lock().insert(pair) {
            return Err(PoolError::Locked { pair });
        }
        Ok(Self { chain, pair })
    }
}

impl Drop for PairLock<'_> {
    fn drop(&mut self) {
        self.chain.locked_pairs.lock().remove(&self.pair);
    }
}

/// Fee-adjusted balance: `balance * 10000 - amount_in * fee`.
fn adjusted(balance: u128, amount_in: u128, fee: SwapFee) -> U256 {
    U256::from(balance) * U256::from(BPS_DENOMINATOR)
        - U256::from(amount_in) * U256::from(fee.bps())
}

impl InMemoryChain {
    fn swap(&self, request: FlashSwapRequest, callee: &dyn FlashSwapCallee) -> Result<(), PoolError> {
        let pair = request.pair;
        let reserves = self.reserves(pair)?;
        let (amount0_out, amount1_out) = (request.amount0_out, request.amount1_out);

        if amount0_out == 0 && amount1_out == 0 {
            return Err(PoolError::InsufficientOutputAmount);
        }
        if amount0_out >= reserves.reserve0 || amount1_out >= reserves.reserve1 {
            return Err(PoolError::InsufficientLiquidity { pair });
        }
        if request.to == reserves.token0 || request.to == reserves.token1 {
            return Err(PoolError::InvalidRecipient { to: request.to });
        }

        let _lock = PairLock::acquire(self, pair)?;

        {
            let mut state = self.state.write();
            state.move_balance(reserves.token0, pair, request.to, amount0_out)?;
            state.move_balance(reserves.token1, pair, request.to, amount1_out)?;
        }

        if !request.payload.is_empty() {
            callee
                .on_flash_swap(FlashSwapCallback {
                    caller: pair,
                    sender: request.sender,
                    amount0: amount0_out,
                    amount1: amount1_out,
                    payload: request.payload,
                })
                .map_err(|e| PoolError::CallbackFailed(Box::new(e)))?;
        }

        let mut state = self.state.write();
        let balance0 = state.balance(reserves.token0, pair);
        let balance1 = state.balance(reserves.token1, pair);

        let remaining0 = reserves.reserve0 - amount0_out;
        let remaining1 = reserves.reserve1 - amount1_out;
        let amount0_in = balance0.saturating_sub(remaining0);
        let amount1_in = balance1.saturating_sub(remaining1);
        if amount0_in == 0 && amount1_in == 0 {
            return Err(PoolError::InsufficientInputAmount);
        }

        let fee = self.fee;
        let k_after = adjusted(balance0, amount0_in, fee) * adjusted(balance1, amount1_in, fee);
        let k_before = U256::from(reserves.reserve0)
            * U256::from(reserves.reserve1)
            * U256::from(BPS_DENOMINATOR * BPS_DENOMINATOR);
        if k_after < k_before {
            return Err(PoolError::InsufficientRepayment { pair });
        }

        if let Some(pool) = state.pools.get_mut(&pair) {
            pool.reserve0 = balance0;
            pool.reserve1 = balance1;
        }
        tracing::trace!(pair = %pair, reserve0 = %balance0, reserve1 = %balance1, "Pool synced");
        Ok(())
    }
}

impl PoolServicePort for InMemoryChain {
    fn fee(&self) -> SwapFee {
        self.fee
    }

    fn reserves(&self, pair: Address) -> Result<PairReserves, PoolError> {
        self.state
            .read()
            .pools
            .get(&pair)
            .map(|pool| PairReserves {
                pair,
                token0: pool.token0,
                token1: pool.token1,
                reserve0: pool.reserve0,
                reserve1: pool.reserve1,
            })
            .ok_or(PoolError::UnknownPair { pair })
    }

    fn flash_swap(
        &self,
        request: FlashSwapRequest,
        callee: &dyn FlashSwapCallee,
    ) -> Result<(), PoolError> {
        self.run(|| self.swap(request, callee))
    }
}

impl From<crate::application::ports::AtomicUnitError> for PoolError {
    fn from(err: crate::application::ports::AtomicUnitError) -> Self {
        Self::Unavailable {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::TokenLedgerPort;
    use crate::domain::amm::PathStep;
    use crate::error::SettlementError;
    use crate::infrastructure::chain::tests::chain;

    /// Callee that repays a fixed amount of one token from its own balance.
    struct Repayer<'a> {
        chain: &'a InMemoryChain,
        account: Address,
        token: Address,
        amount: u128,
    }

    impl FlashSwapCallee for Repayer<'_> {
        fn on_flash_swap(&self, callback: FlashSwapCallback) -> Result<(), SettlementError> {
            self.chain
                .transfer(self.token, self.account, callback.caller, self.amount)?;
            Ok(())
        }
    }

    /// Callee that always fails.
    struct Failing;

    impl FlashSwapCallee for Failing {
        fn on_flash_swap(&self, _callback: FlashSwapCallback) -> Result<(), SettlementError> {
            Err(SettlementError::ZeroQuantity)
        }
    }

    fn tokens() -> (Address, Address) {
        (Address::repeat_byte(0x01), Address::repeat_byte(0x02))
    }

    fn request(pair: Address, to: Address, amount1_out: u128) -> FlashSwapRequest {
        FlashSwapRequest {
            pair,
            amount0_out: 0,
            amount1_out,
            sender: to,
            to,
            payload: b"x".to_vec(),
        }
    }

    #[test]
    fn exact_repayment_passes_and_syncs() {
        let chain = chain();
        let (t0, t1) = tokens();
        let pair = chain.seed_pair(t0, t1, 1_000, 1_000).unwrap();
        let borrower = Address::from_label("borrower");
        chain.credit(t0, borrower, 100).unwrap();

        let due = chain
            .amount_in(pair, 10, PathStep::new(t0, t1))
            .unwrap();
        assert_eq!(due, 11);
        let callee = Repayer {
            chain: &chain,
            account: borrower,
            token: t0,
            amount: due,
        };
        chain.flash_swap(request(pair, borrower, 10), &callee).unwrap();

        let reserves = chain.reserves(pair).unwrap();
        assert_eq!((reserves.reserve0, reserves.reserve1), (1_011, 990));
        assert_eq!(chain.balance_of(t1, borrower).unwrap(), 10);
    }

    #[test]
    fn short_repayment_reverts_everything() {
        let chain = chain();
        let (t0, t1) = tokens();
        let pair = chain.seed_pair(t0, t1, 1_000, 1_000).unwrap();
        let borrower = Address::from_label("borrower");
        chain.credit(t0, borrower, 100).unwrap();

        let callee = Repayer {
            chain: &chain,
            account: borrower,
            token: t0,
            amount: 10,
        };
        let err = chain
            .flash_swap(request(pair, borrower, 10), &callee)
            .unwrap_err();
        assert!(matches!(err, PoolError::InsufficientRepayment { .. }));
        assert_eq!(chain.balance_of(t0, borrower).unwrap(), 100);
        assert_eq!(chain.balance_of(t1, borrower).unwrap(), 0);
        assert_eq!(chain.balance_of(t1, pair).unwrap(), 1_000);
    }

    #[test]
    fn callee_failure_is_wrapped() {
        let chain = chain();
        let (t0, t1) = tokens();
        let pair = chain.seed_pair(t0, t1, 1_000, 1_000).unwrap();
        let err = chain
            .flash_swap(request(pair, Address::from_label("b"), 10), &Failing)
            .unwrap_err();
        assert!(matches!(err, PoolError::CallbackFailed(_)));
        assert_eq!(chain.balance_of(t1, pair).unwrap(), 1_000);
    }

    #[test]
    fn draining_the_reserve_is_rejected() {
        let chain = chain();
        let (t0, t1) = tokens();
        let pair = chain.seed_pair(t0, t1, 1_000, 1_000).unwrap();
        let err = chain
            .flash_swap(request(pair, Address::from_label("b"), 1_000), &Failing)
            .unwrap_err();
        assert!(matches!(err, PoolError::InsufficientLiquidity { .. }));
    }

    #[test]
    fn unknown_pair() {
        let chain = chain();
        assert!(matches!(
            chain.reserves(Address::from_label("none")),
            Err(PoolError::UnknownPair { .. })
        ));
    }

    #[test]
    fn nested_swap_on_the_same_pair_is_locked() {
        struct Reenter<'a> {
            chain: &'a InMemoryChain,
            pair: Address,
        }

        impl FlashSwapCallee for Reenter<'_> {
            fn on_flash_swap(&self, _callback: FlashSwapCallback) -> Result<(), SettlementError> {
                self.chain
                    .flash_swap(request(self.pair, Address::from_label("b"), 1), &Failing)?;
                Ok(())
            }
        }

        let chain = chain();
        let (t0, t1) = tokens();
        let pair = chain.seed_pair(t0, t1, 1_000, 1_000).unwrap();
        let err = chain
            .flash_swap(
                request(pair, Address::from_label("b"), 10),
                &Reenter {
                    chain: &chain,
                    pair,
                },
            )
            .unwrap_err();
        let PoolError::CallbackFailed(inner) = err else {
            panic!("expected callback failure");
        };
        assert!(matches!(*inner, SettlementError::Pool(PoolError::Locked { .. })));
        // Lock released after the outer swap.
        assert!(chain.locked_pairs.lock().is_empty());
    }
}

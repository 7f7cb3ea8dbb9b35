//! Pool Service Port (Driven Port)
//!
//! Constant-product pools offering a flash-swap primitive. The pool releases
//! the requested amounts, re-enters the borrower through
//! [`FlashSwapCallee::on_flash_swap`], then verifies repayment before
//! returning.

use crate::domain::amm::{PairReserves, PathStep, SwapFee};
use crate::domain::shared::{Address, DomainError};
use crate::error::SettlementError;

use super::LedgerError;

/// A flash-swap borrow request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashSwapRequest {
    /// Pool to borrow from.
    pub pair: Address,
    /// Amount of `token0` released.
    pub amount0_out: u128,
    /// Amount of `token1` released.
    pub amount1_out: u128,
    /// Account initiating the swap.
    pub sender: Address,
    /// Recipient of the released amounts.
    pub to: Address,
    /// Opaque payload passed back to the callee. Empty means a plain swap.
    pub payload: Vec<u8>,
}

/// Arguments the pool passes to the callee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashSwapCallback {
    /// Address of the pool invoking the callback.
    pub caller: Address,
    /// Account that initiated the swap.
    pub sender: Address,
    /// Amount of `token0` released.
    pub amount0: u128,
    /// Amount of `token1` released.
    pub amount1: u128,
    /// Payload from the request.
    pub payload: Vec<u8>,
}

/// The single designated callback entry point of a flash-swap borrower.
pub trait FlashSwapCallee {
    /// Settle a flash swap in progress.
    fn on_flash_swap(&self, callback: FlashSwapCallback) -> Result<(), SettlementError>;
}

/// Pool service error.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// No pool at this address.
    #[error("unknown pair {pair}")]
    UnknownPair { pair: Address },

    /// Pool already mid-swap.
    #[error("pair {pair} locked")]
    Locked { pair: Address },

    /// Both output amounts zero.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// Output not below reserves.
    #[error("insufficient liquidity in {pair}")]
    InsufficientLiquidity { pair: Address },

    /// Recipient is one of the pool tokens.
    #[error("invalid recipient {to}")]
    InvalidRecipient { to: Address },

    /// Nothing paid in.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// Fee-adjusted constant product decreased.
    #[error("insufficient repayment to {pair}")]
    InsufficientRepayment { pair: Address },

    /// Callee failed during the callback.
    #[error("callback failed: {0}")]
    CallbackFailed(Box<SettlementError>),

    /// Reserve math failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Token movement failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Pool state unavailable.
    #[error("pool unavailable: {message}")]
    Unavailable { message: String },
}

/// Port for constant-product pools.
pub trait PoolServicePort: Send + Sync {
    /// Trading fee charged on every input.
    fn fee(&self) -> SwapFee;

    /// Last synced reserves of `pair`. Inside a flash-swap callback these are
    /// still the pre-borrow reserves.
    fn reserves(&self, pair: Address) -> Result<PairReserves, PoolError>;

    /// Release the requested amounts, invoke `callee` when the payload is
    /// non-empty, and verify repayment.
    fn flash_swap(
        &self,
        request: FlashSwapRequest,
        callee: &dyn FlashSwapCallee,
    ) -> Result<(), PoolError>;

    /// Exact input of `step.token_in` needed for `amount_out` of `step.token_out`.
    fn amount_in(&self, pair: Address, amount_out: u128, step: PathStep) -> Result<u128, PoolError> {
        Ok(self.reserves(pair)?.amount_in(amount_out, step, self.fee())?)
    }

    /// Output of `step.token_out` for `amount_in` of `step.token_in`.
    fn amount_out(&self, pair: Address, amount_in: u128, step: PathStep) -> Result<u128, PoolError> {
        Ok(self.reserves(pair)?.amount_out(amount_in, step, self.fee())?)
    }
}

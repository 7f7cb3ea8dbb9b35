//! Premium Calculator
//!
//! Prices the repayment side of a flash operation against the pool's
//! pre-borrow reserves.
//!
//! # Open
//!
//! Borrowing `q` underlying mints `q` long and `short_from_long(q)` short
//! units. The pool is repaid in short units; if the minted shorts do not
//! cover the exact input the pool requires, the shortfall is valued in
//! underlying (rounded up) and grossed up by the fee, since it reaches the
//! pool as a second input leg. Any deficit therefore costs at least one
//! unit. A surplus of minted shorts is a rebate.
//!
//! # Close
//!
//! Borrowing `q` short units and closing them releases `long_from_short(q)`
//! underlying. The pool is repaid in underlying; what is left over is the
//! payout, a shortfall is a remainder the caller funds.

use serde::{Deserialize, Serialize};

use crate::domain::amm::{PairReserves, PathStep, SwapFee};
use crate::domain::option_series::{OptionSeries, long_from_short, short_from_long};
use crate::domain::shared::DomainError;

/// Priced open operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPremium {
    /// Short units minted alongside the borrowed quantity.
    pub short_minted: u128,
    /// Exact short input the pool requires for the borrowed underlying.
    pub short_required: u128,
    /// Extra underlying the caller must supply.
    pub loan_remainder: u128,
    /// Surplus short units returned to the caller.
    pub rebate: u128,
}

impl OpenPremium {
    /// Whether the minted shorts fall short of the pool's required input.
    #[must_use]
    pub const fn has_deficit(&self) -> bool {
        self.short_required > self.short_minted
    }
}

/// Priced close operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePremium {
    /// Underlying released by closing the borrowed short units.
    pub underlying_from_close: u128,
    /// Exact underlying input the pool requires for the borrowed shorts.
    pub underlying_required: u128,
    /// Underlying left for the caller.
    pub payout: u128,
    /// Extra underlying the caller must supply.
    pub loan_remainder: u128,
}

/// Stateless premium calculator bound to a pool fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PremiumCalculator {
    fee: SwapFee,
}

impl PremiumCalculator {
    /// Create a calculator for the given pool fee.
    #[must_use]
    pub const fn new(fee: SwapFee) -> Self {
        Self { fee }
    }

    /// Pool fee used for pricing.
    #[must_use]
    pub const fn fee(&self) -> SwapFee {
        self.fee
    }

    /// Price opening `loan_qty` long units by borrowing underlying.
    pub fn open_premium(
        &self,
        reserves: &PairReserves,
        option: &OptionSeries,
        loan_qty: u128,
    ) -> Result<OpenPremium, DomainError> {
        let short_minted = short_from_long(option, loan_qty)?;
        let step = PathStep::new(option.redeem(), option.underlying());
        let short_required = reserves.amount_in(loan_qty, step, self.fee)?;

        if short_required > short_minted {
            let deficit = short_required - short_minted;
            let deficit_in_underlying = reserves.amount_out_ceil(deficit, step, self.fee)?;
            let loan_remainder = self.fee.gross_up(deficit_in_underlying)?;
            Ok(OpenPremium {
                short_minted,
                short_required,
                loan_remainder,
                rebate: 0,
            })
        } else {
            Ok(OpenPremium {
                short_minted,
                short_required,
                loan_remainder: 0,
                rebate: short_minted - short_required,
            })
        }
    }

    /// Price closing `loan_qty` short units by borrowing them.
    pub fn close_premium(
        &self,
        reserves: &PairReserves,
        option: &OptionSeries,
        loan_qty: u128,
    ) -> Result<ClosePremium, DomainError> {
        let underlying_from_close = long_from_short(option, loan_qty)?;
        let step = PathStep::new(option.underlying(), option.redeem());
        let underlying_required = reserves.amount_in(loan_qty, step, self.fee)?;

        let (payout, loan_remainder) = if underlying_from_close > underlying_required {
            (underlying_from_close - underlying_required, 0)
        } else {
            (0, underlying_required - underlying_from_close)
        };

        Ok(ClosePremium {
            underlying_from_close,
            underlying_required,
            payout,
            loan_remainder,
        })
    }
}

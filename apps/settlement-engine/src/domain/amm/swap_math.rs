//! Constant-product swap math with a basis-point input fee.
//!
//! The fee is charged on the input leg in both directions, so `amount_in`
//! is the exact inverse of `amount_out` rounded in the pool's favour.

use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;
use crate::domain::shared::math::{U256, mul_div_ceil, narrow};

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Default pool fee (0.30%).
pub const DEFAULT_FEE_BPS: u16 = 30;

/// A pool trading fee in basis points, strictly below 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct SwapFee(u16);

impl SwapFee {
    /// Create a fee, rejecting values of 100% or more.
    pub fn new(bps: u16) -> Result<Self, DomainError> {
        if u128::from(bps) >= BPS_DENOMINATOR {
            return Err(DomainError::invalid("fee_bps", "must be below 10000"));
        }
        Ok(Self(bps))
    }

    /// Fee in basis points.
    #[must_use]
    pub const fn bps(self) -> u16 {
        self.0
    }

    /// Share of the input that reaches the curve, in basis points.
    #[must_use]
    pub fn input_factor(self) -> u128 {
        BPS_DENOMINATOR - u128::from(self.0)
    }

    /// Gross input whose post-fee share is at least `net`.
    pub fn gross_up(self, net: u128) -> Result<u128, DomainError> {
        mul_div_ceil(net, BPS_DENOMINATOR, self.input_factor(), "gross_up")
    }
}

impl Default for SwapFee {
    fn default() -> Self {
        Self(DEFAULT_FEE_BPS)
    }
}

impl TryFrom<u16> for SwapFee {
    type Error = DomainError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SwapFee> for u16 {
    fn from(fee: SwapFee) -> Self {
        fee.0
    }
}

/// Output received for `amount_in`, given the reserves on each side.
pub fn get_amount_out(
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
    fee: SwapFee,
) -> Result<u128, DomainError> {
    let (numerator, denominator) = amount_out_ratio(amount_in, reserve_in, reserve_out, fee)?;
    narrow(numerator / denominator, "amount_out")
}

/// [`get_amount_out`] rounded up instead of down.
///
/// Used where the value prices a debt owed to the pool rather than tokens
/// paid out by it.
pub fn get_amount_out_ceil(
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
    fee: SwapFee,
) -> Result<u128, DomainError> {
    let (numerator, denominator) = amount_out_ratio(amount_in, reserve_in, reserve_out, fee)?;
    let mut quotient = numerator / denominator;
    if !(numerator % denominator).is_zero() {
        quotient = quotient + U256::one();
    }
    narrow(quotient, "amount_out")
}

fn amount_out_ratio(
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
    fee: SwapFee,
) -> Result<(U256, U256), DomainError> {
    if amount_in == 0 {
        return Err(DomainError::InsufficientInputAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(DomainError::InsufficientLiquidity {
            requested: amount_in,
            reserve: 0,
        });
    }

    let in_with_fee = U256::from(amount_in) * U256::from(fee.input_factor());
    let numerator = in_with_fee * U256::from(reserve_out);
    let denominator = U256::from(reserve_in) * U256::from(BPS_DENOMINATOR) + in_with_fee;
    Ok((numerator, denominator))
}

/// Input required to receive exactly `amount_out`.
pub fn get_amount_in(
    amount_out: u128,
    reserve_in: u128,
    reserve_out: u128,
    fee: SwapFee,
) -> Result<u128, DomainError> {
    if amount_out == 0 {
        return Err(DomainError::InsufficientOutputAmount);
    }
    if reserve_in == 0 || reserve_out == 0 || amount_out >= reserve_out {
        return Err(DomainError::InsufficientLiquidity {
            requested: amount_out,
            reserve: reserve_out,
        });
    }

    let numerator =
        U256::from(reserve_in) * U256::from(amount_out) * U256::from(BPS_DENOMINATOR);
    let denominator = U256::from(reserve_out - amount_out) * U256::from(fee.input_factor());
    narrow(numerator / denominator + U256::one(), "amount_in")
}

//! Checked integer math with 256-bit intermediates.
//!
//! Token amounts are `u128`; products of two amounts (and of an amount with a
//! basis-point scale) can exceed that range, so every product goes through
//! [`U256`] and the result is checked back into `u128`.

use crate::domain::shared::DomainError;

#[allow(clippy::all, clippy::pedantic, clippy::nursery, missing_docs)]
mod wide {
    uint::construct_uint! {
        /// 256-bit unsigned integer for intermediate products.
        pub struct U256(4);
    }
}

pub use wide::U256;

/// Narrow a 256-bit value back into the `u128` amount range.
pub fn narrow(value: U256, operation: &'static str) -> Result<u128, DomainError> {
    if value > U256::from(u128::MAX) {
        return Err(DomainError::MathOverflow { operation });
    }
    Ok(value.low_u128())
}

/// `a * b / denominator`, rounded down.
pub fn mul_div(
    a: u128,
    b: u128,
    denominator: u128,
    operation: &'static str,
) -> Result<u128, DomainError> {
    if denominator == 0 {
        return Err(DomainError::invalid(operation, "division by zero"));
    }
    narrow(U256::from(a) * U256::from(b) / U256::from(denominator), operation)
}

/// `a * b / denominator`, rounded up.
pub fn mul_div_ceil(
    a: u128,
    b: u128,
    denominator: u128,
    operation: &'static str,
) -> Result<u128, DomainError> {
    if denominator == 0 {
        return Err(DomainError::invalid(operation, "division by zero"));
    }
    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);
    let mut quotient = product / denominator;
    if !(product % denominator).is_zero() {
        quotient = quotient + U256::one();
    }
    narrow(quotient, operation)
}

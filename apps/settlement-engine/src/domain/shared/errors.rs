//! Domain errors for the settlement engine.

use thiserror::Error;

/// Domain-level errors raised by value objects and pure math.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Invalid value for a field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Invalid state transition attempted.
    #[error("Invalid state transition for {entity}: {from} -> {to}")]
    InvalidStateTransition {
        /// Entity type (e.g., "FlashSettlementEngine").
        entity: &'static str,
        /// Current state.
        from: String,
        /// Attempted state.
        to: String,
    },

    /// Arithmetic overflowed the 128-bit amount range.
    #[error("Math overflow in {operation}")]
    MathOverflow {
        /// Operation that overflowed.
        operation: &'static str,
    },

    /// A swap was requested with a zero input amount.
    #[error("Insufficient input amount")]
    InsufficientInputAmount,

    /// A swap was requested with a zero output amount.
    #[error("Insufficient output amount")]
    InsufficientOutputAmount,

    /// Pool reserves cannot serve the requested amount.
    #[error("Insufficient liquidity: requested {requested}, reserve {reserve}")]
    InsufficientLiquidity {
        /// Requested output amount.
        requested: u128,
        /// Available reserve.
        reserve: u128,
    },

    /// A token pair was built from the same token twice.
    #[error("Identical tokens: {token}")]
    IdenticalTokens {
        /// The repeated token.
        token: String,
    },

    /// The token is not part of the pair.
    #[error("Token {token} is not part of pair {pair}")]
    TokenNotInPair {
        /// Token requested.
        token: String,
        /// Pair address.
        pair: String,
    },
}

impl DomainError {
    /// Shorthand for an `InvalidValue` error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_display() {
        let err = DomainError::invalid("base", "must be positive");
        let msg = format!("{err}");
        assert!(msg.contains("base"));
        assert!(msg.contains("positive"));
    }

    #[test]
    fn insufficient_liquidity_display() {
        let err = DomainError::InsufficientLiquidity {
            requested: 1_000,
            reserve: 999,
        };
        let msg = format!("{err}");
        assert!(msg.contains("1000"));
        assert!(msg.contains("999"));
    }

    #[test]
    fn invalid_state_transition_display() {
        let err = DomainError::InvalidStateTransition {
            entity: "Engine",
            from: "IDLE".to_string(),
            to: "SETTLED".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("IDLE -> SETTLED"));
    }

    #[test]
    fn overflow_names_operation() {
        let err = DomainError::MathOverflow {
            operation: "amount_in",
        };
        assert_eq!(format!("{err}"), "Math overflow in amount_in");
    }
}

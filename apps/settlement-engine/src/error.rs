//! Rich error handling for the settlement engine.
//!
//! Every public engine operation returns [`SettlementError`]. Each variant
//! maps to one of four categories and to a stable reason code, so callers
//! can branch on the category and log the code.
//!
//! # Categories
//!
//! | Category | Usage |
//! |----------|-------|
//! | `INPUT_ERROR` | Zero quantity, zero or reserved beneficiary, unknown option |
//! | `BOUND_VIOLATION` | Premium above `max_premium`, payout below `min_payout` |
//! | `AUTHENTICATION_ERROR` | Callback from a non-canonical pool or outside the armed state |
//! | `EXTERNAL_SERVICE_FAILURE` | Ledger, option or pool failure, inconsistent receipts |
//!
//! No category is retried. Every error aborts the whole operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::{
    AtomicUnitError, LedgerError, OptionServiceError, PoolError,
};
use crate::domain::settlement::{EngineState, FlashKind, SettlementOutcome};
use crate::domain::shared::{Address, DomainError, OperationId};

/// Category of a settlement failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Malformed request.
    InputError,
    /// Caller-supplied economic bound not met.
    BoundViolation,
    /// Callback not attributable to a genuine pool-initiated loan.
    AuthenticationError,
    /// A collaborator failed or returned inconsistent data.
    ExternalServiceFailure,
}

impl ErrorCategory {
    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InputError => "INPUT_ERROR",
            Self::BoundViolation => "BOUND_VIOLATION",
            Self::AuthenticationError => "AUTHENTICATION_ERROR",
            Self::ExternalServiceFailure => "EXTERNAL_SERVICE_FAILURE",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error codes for the settlement engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Input errors
    /// Loan quantity of zero.
    ZeroQuantity,
    /// Beneficiary is the zero address.
    ZeroBeneficiary,
    /// Beneficiary is the engine's own settlement address.
    ReservedBeneficiary,
    /// Option series unknown to the option service.
    OptionNotFound,
    /// Option series past expiry.
    OptionExpired,

    // Bound violations
    /// Premium above the caller's maximum.
    PremiumExceedsMax,
    /// Payout below the caller's minimum.
    PayoutBelowMin,
    /// Close needs funding but the caller asked for a positive payout.
    RemainderNotAccepted,

    // Authentication errors
    /// Callback caller is not the canonical pool.
    UntrustedCaller,
    /// Flash swap not initiated by this engine.
    UnexpectedInitiator,
    /// Payload does not describe the armed operation.
    OperationMismatch,
    /// Callback arrived outside the awaiting state.
    NotAwaitingCallback,
    /// Another operation is already in flight.
    OperationInFlight,

    // External service failures
    /// Token ledger failure.
    LedgerFailure,
    /// Option service failure.
    OptionServiceFailure,
    /// Pool service failure.
    PoolFailure,
    /// Atomic unit failure.
    AtomicUnitFailure,
    /// Mint receipt not in `base:quote` proportion.
    InconsistentMint,
    /// Close receipt does not match the closed quantity.
    InconsistentClose,
    /// Pool released a different amount than requested.
    UnexpectedLoanAmount,
    /// Callback settled a different direction than requested.
    UnexpectedOutcome,
    /// Pool returned without invoking the callback.
    CallbackMissing,
    /// Payload could not be decoded.
    MalformedPayload,
    /// Pricing against pool state failed.
    PricingFailure,
}

impl ErrorCode {
    /// Category this code belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ZeroQuantity
            | Self::ZeroBeneficiary
            | Self::ReservedBeneficiary
            | Self::OptionNotFound
            | Self::OptionExpired => ErrorCategory::InputError,

            Self::PremiumExceedsMax | Self::PayoutBelowMin | Self::RemainderNotAccepted => {
                ErrorCategory::BoundViolation
            }

            Self::UntrustedCaller
            | Self::UnexpectedInitiator
            | Self::OperationMismatch
            | Self::NotAwaitingCallback
            | Self::OperationInFlight => ErrorCategory::AuthenticationError,

            Self::LedgerFailure
            | Self::OptionServiceFailure
            | Self::PoolFailure
            | Self::AtomicUnitFailure
            | Self::InconsistentMint
            | Self::InconsistentClose
            | Self::UnexpectedLoanAmount
            | Self::UnexpectedOutcome
            | Self::CallbackMissing
            | Self::MalformedPayload
            | Self::PricingFailure => ErrorCategory::ExternalServiceFailure,
        }
    }

    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::ZeroQuantity => "ZERO_QUANTITY",
            Self::ZeroBeneficiary => "ZERO_BENEFICIARY",
            Self::ReservedBeneficiary => "RESERVED_BENEFICIARY",
            Self::OptionNotFound => "OPTION_NOT_FOUND",
            Self::OptionExpired => "OPTION_EXPIRED",
            Self::PremiumExceedsMax => "PREMIUM_EXCEEDS_MAX",
            Self::PayoutBelowMin => "PAYOUT_BELOW_MIN",
            Self::RemainderNotAccepted => "REMAINDER_NOT_ACCEPTED",
            Self::UntrustedCaller => "UNTRUSTED_CALLER",
            Self::UnexpectedInitiator => "UNEXPECTED_INITIATOR",
            Self::OperationMismatch => "OPERATION_MISMATCH",
            Self::NotAwaitingCallback => "NOT_AWAITING_CALLBACK",
            Self::OperationInFlight => "OPERATION_IN_FLIGHT",
            Self::LedgerFailure => "LEDGER_FAILURE",
            Self::OptionServiceFailure => "OPTION_SERVICE_FAILURE",
            Self::PoolFailure => "POOL_FAILURE",
            Self::AtomicUnitFailure => "ATOMIC_UNIT_FAILURE",
            Self::InconsistentMint => "INCONSISTENT_MINT",
            Self::InconsistentClose => "INCONSISTENT_CLOSE",
            Self::UnexpectedLoanAmount => "UNEXPECTED_LOAN_AMOUNT",
            Self::UnexpectedOutcome => "UNEXPECTED_OUTCOME",
            Self::CallbackMissing => "CALLBACK_MISSING",
            Self::MalformedPayload => "MALFORMED_PAYLOAD",
            Self::PricingFailure => "PRICING_FAILURE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Error returned by every settlement engine operation.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Loan quantity of zero.
    #[error("loan quantity must be positive")]
    ZeroQuantity,

    /// Beneficiary is the zero address.
    #[error("beneficiary must not be the zero address")]
    ZeroBeneficiary,

    /// Beneficiary is the engine's own settlement address.
    #[error("beneficiary {beneficiary} is reserved for settlement")]
    ReservedBeneficiary {
        /// Rejected beneficiary.
        beneficiary: Address,
    },

    /// Option series unknown.
    #[error("option {option} not found")]
    OptionNotFound {
        /// Requested option.
        option: Address,
    },

    /// Option series past expiry.
    #[error("option {option} has expired")]
    OptionExpired {
        /// Requested option.
        option: Address,
    },

    /// Premium above the caller's maximum.
    #[error("premium {premium} exceeds max premium {max_premium}")]
    PremiumExceedsMax {
        /// Computed loan remainder.
        premium: u128,
        /// Caller bound.
        max_premium: u128,
    },

    /// Payout below the caller's minimum.
    #[error("payout {payout} below min payout {min_payout}")]
    PayoutBelowMin {
        /// Computed payout.
        payout: u128,
        /// Caller bound.
        min_payout: u128,
    },

    /// Close needs `remainder` extra underlying but the caller asked for a payout.
    #[error("close requires {remainder} additional underlying but min payout is {min_payout}")]
    RemainderNotAccepted {
        /// Underlying the caller would have to supply.
        remainder: u128,
        /// Caller bound.
        min_payout: u128,
    },

    /// Callback caller is not the canonical pool.
    #[error("callback from {caller}, expected canonical pool {expected}")]
    UntrustedCaller {
        /// Actual caller.
        caller: Address,
        /// Canonical pool of the armed operation.
        expected: Address,
    },

    /// Flash swap not initiated by this engine.
    #[error("flash swap initiated by {sender}, not by this engine")]
    UnexpectedInitiator {
        /// Reported initiator.
        sender: Address,
    },

    /// Payload does not describe the armed operation.
    #[error("operation {actual} does not match armed operation {expected}")]
    OperationMismatch {
        /// Armed operation.
        expected: OperationId,
        /// Operation carried by the payload.
        actual: OperationId,
    },

    /// Callback arrived outside the awaiting state.
    #[error("callback not expected in state {state}")]
    NotAwaitingCallback {
        /// Engine state at arrival.
        state: EngineState,
    },

    /// Another operation is already in flight.
    #[error("operation already in flight (state {state})")]
    OperationInFlight {
        /// Engine state at arrival.
        state: EngineState,
    },

    /// Token ledger failure.
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),

    /// Option service failure.
    #[error("option service: {0}")]
    OptionService(OptionServiceError),

    /// Pool service failure.
    #[error("pool: {0}")]
    Pool(PoolError),

    /// Atomic unit failure.
    #[error("atomic unit: {0}")]
    AtomicUnit(#[from] AtomicUnitError),

    /// Mint receipt not in `base:quote` proportion.
    #[error("mint returned ({long}, {short}), expected ({expected_long}, {expected_short})")]
    InconsistentMint {
        /// Expected long units.
        expected_long: u128,
        /// Expected short units.
        expected_short: u128,
        /// Reported long units.
        long: u128,
        /// Reported short units.
        short: u128,
    },

    /// Close receipt does not match the closed quantity.
    #[error("close released {released} underlying, expected {expected}")]
    InconsistentClose {
        /// Expected underlying.
        expected: u128,
        /// Reported underlying.
        released: u128,
    },

    /// Pool released a different amount than requested.
    #[error("pool released ({amount0}, {amount1}), expected ({expected0}, {expected1})")]
    UnexpectedLoanAmount {
        /// Expected `token0` amount.
        expected0: u128,
        /// Expected `token1` amount.
        expected1: u128,
        /// Released `token0` amount.
        amount0: u128,
        /// Released `token1` amount.
        amount1: u128,
    },

    /// Callback settled a different direction than requested.
    #[error("operation {operation_id} settled as {actual}, expected {expected}")]
    UnexpectedOutcome {
        /// Settled operation.
        operation_id: OperationId,
        /// Requested direction.
        expected: FlashKind,
        /// Settled direction.
        actual: FlashKind,
    },

    /// Pool returned without invoking the callback.
    #[error("pool returned without settling operation {operation_id}")]
    CallbackMissing {
        /// Armed operation.
        operation_id: OperationId,
    },

    /// Payload could not be decoded.
    #[error("malformed payload: {message}")]
    MalformedPayload {
        /// Decoder message.
        message: String,
    },

    /// Pricing against pool state failed.
    #[error("pricing: {0}")]
    Pricing(#[from] DomainError),
}

impl SettlementError {
    /// Stable reason code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ZeroQuantity => ErrorCode::ZeroQuantity,
            Self::ZeroBeneficiary => ErrorCode::ZeroBeneficiary,
            Self::ReservedBeneficiary { .. } => ErrorCode::ReservedBeneficiary,
            Self::OptionNotFound { .. } => ErrorCode::OptionNotFound,
            Self::OptionExpired { .. } => ErrorCode::OptionExpired,
            Self::PremiumExceedsMax { .. } => ErrorCode::PremiumExceedsMax,
            Self::PayoutBelowMin { .. } => ErrorCode::PayoutBelowMin,
            Self::RemainderNotAccepted { .. } => ErrorCode::RemainderNotAccepted,
            Self::UntrustedCaller { .. } => ErrorCode::UntrustedCaller,
            Self::UnexpectedInitiator { .. } => ErrorCode::UnexpectedInitiator,
            Self::OperationMismatch { .. } => ErrorCode::OperationMismatch,
            Self::NotAwaitingCallback { .. } => ErrorCode::NotAwaitingCallback,
            Self::OperationInFlight { .. } => ErrorCode::OperationInFlight,
            Self::Ledger(_) => ErrorCode::LedgerFailure,
            Self::OptionService(_) => ErrorCode::OptionServiceFailure,
            Self::Pool(_) => ErrorCode::PoolFailure,
            Self::AtomicUnit(_) => ErrorCode::AtomicUnitFailure,
            Self::InconsistentMint { .. } => ErrorCode::InconsistentMint,
            Self::InconsistentClose { .. } => ErrorCode::InconsistentClose,
            Self::UnexpectedLoanAmount { .. } => ErrorCode::UnexpectedLoanAmount,
            Self::UnexpectedOutcome { .. } => ErrorCode::UnexpectedOutcome,
            Self::CallbackMissing { .. } => ErrorCode::CallbackMissing,
            Self::MalformedPayload { .. } => ErrorCode::MalformedPayload,
            Self::Pricing(_) => ErrorCode::PricingFailure,
        }
    }

    /// Category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.code().category()
    }

    /// An outcome whose direction differs from the requested one.
    #[must_use]
    pub fn unexpected_outcome(expected: FlashKind, outcome: SettlementOutcome) -> Self {
        Self::UnexpectedOutcome {
            actual: outcome.kind(),
            operation_id: outcome.operation_id().clone(),
            expected,
        }
    }
}

impl From<OptionServiceError> for SettlementError {
    fn from(err: OptionServiceError) -> Self {
        match err {
            OptionServiceError::UnknownOption { option } => Self::OptionNotFound { option },
            OptionServiceError::Expired { option } => Self::OptionExpired { option },
            other => Self::OptionService(other),
        }
    }
}

impl From<PoolError> for SettlementError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::CallbackFailed(inner) => *inner,
            other => Self::Pool(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settlement::CloseSettlement;

    #[test]
    fn categories_follow_codes() {
        assert_eq!(
            SettlementError::ZeroQuantity.category(),
            ErrorCategory::InputError
        );
        assert_eq!(
            SettlementError::PayoutBelowMin {
                payout: 4,
                min_payout: 5
            }
            .category(),
            ErrorCategory::BoundViolation
        );
        assert_eq!(
            SettlementError::NotAwaitingCallback {
                state: EngineState::Idle
            }
            .category(),
            ErrorCategory::AuthenticationError
        );
        assert_eq!(
            SettlementError::CallbackMissing {
                operation_id: OperationId::new("op-1")
            }
            .category(),
            ErrorCategory::ExternalServiceFailure
        );
    }

    #[test]
    fn pool_callback_failure_is_unwrapped() {
        let inner = SettlementError::PremiumExceedsMax {
            premium: 6,
            max_premium: 5,
        };
        let err = SettlementError::from(PoolError::CallbackFailed(Box::new(inner)));
        assert_eq!(err.code(), ErrorCode::PremiumExceedsMax);
        assert_eq!(err.category(), ErrorCategory::BoundViolation);
    }

    #[test]
    fn other_pool_errors_stay_external() {
        let err = SettlementError::from(PoolError::InsufficientRepayment {
            pair: Address::repeat_byte(0x11),
        });
        assert_eq!(err.code(), ErrorCode::PoolFailure);
    }

    #[test]
    fn unknown_option_is_an_input_error() {
        let option = Address::repeat_byte(0x22);
        let err = SettlementError::from(OptionServiceError::UnknownOption { option });
        assert!(matches!(err, SettlementError::OptionNotFound { option: o } if o == option));
        assert_eq!(err.category(), ErrorCategory::InputError);
    }

    #[test]
    fn mismatched_outcome_names_both_directions() {
        let outcome = SettlementOutcome::Close(CloseSettlement {
            operation_id: OperationId::new("op-7"),
            quantity: 10,
            output_underlying: 10,
            underlying_required: 6,
            payout: 4,
            loan_remainder: 0,
        });
        let err = SettlementError::unexpected_outcome(FlashKind::Open, outcome);

        assert!(matches!(
            &err,
            SettlementError::UnexpectedOutcome {
                expected: FlashKind::Open,
                actual: FlashKind::Close,
                ..
            }
        ));
        assert_eq!(err.to_string(), "operation op-7 settled as close, expected open");
        assert_eq!(err.code().reason(), "UNEXPECTED_OUTCOME");
        assert_eq!(err.category(), ErrorCategory::ExternalServiceFailure);
    }

    #[test]
    fn display_includes_figures() {
        let err = SettlementError::PremiumExceedsMax {
            premium: 6,
            max_premium: 5,
        };
        assert_eq!(err.to_string(), "premium 6 exceeds max premium 5");
        assert_eq!(err.code().to_string(), "PREMIUM_EXCEEDS_MAX");
        assert_eq!(err.category().to_string(), "BOUND_VIOLATION");
    }
}

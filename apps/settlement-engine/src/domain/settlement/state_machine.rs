//! Engine State Machine
//!
//! One flash operation walks `Idle -> LoanRequested -> InCallback -> Settled -> Idle`.
//! Any non-idle state may fall back to `Idle` when the operation aborts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// Lifecycle state of the engine's single in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineState {
    /// No operation in flight.
    #[default]
    Idle,
    /// Borrow issued, waiting for the pool's callback.
    LoanRequested,
    /// Inside the pool's callback, settling.
    InCallback,
    /// Settlement recorded, waiting for the borrow to return.
    Settled,
}

impl EngineState {
    /// Whether an operation is in flight.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::LoanRequested => "LOAN_REQUESTED",
            Self::InCallback => "IN_CALLBACK",
            Self::Settled => "SETTLED",
        };
        write!(f, "{s}")
    }
}

/// Validates engine state transitions.
pub struct EngineStateMachine;

impl EngineStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub const fn is_valid_transition(from: EngineState, to: EngineState) -> bool {
        matches!(
            (from, to),
            (EngineState::Idle, EngineState::LoanRequested)
                | (EngineState::LoanRequested, EngineState::InCallback)
                | (EngineState::InCallback, EngineState::Settled)
                | (EngineState::Settled, EngineState::Idle)
                // Abort
                | (EngineState::LoanRequested, EngineState::Idle)
                | (EngineState::InCallback, EngineState::Idle)
        )
    }

    /// Validate a state transition.
    pub fn validate_transition(from: EngineState, to: EngineState) -> Result<(), DomainError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                entity: "FlashSettlementEngine",
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }
}

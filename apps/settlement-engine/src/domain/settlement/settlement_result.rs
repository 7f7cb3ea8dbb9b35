//! Realized settlement figures returned to callers.

use serde::{Deserialize, Serialize};

use crate::domain::settlement::FlashKind;
use crate::domain::shared::OperationId;

/// Realized figures of a settled open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSettlement {
    /// Operation ID.
    pub operation_id: OperationId,
    /// Long units delivered to the beneficiary.
    pub quantity: u128,
    /// Short units minted.
    pub short_minted: u128,
    /// Short units the pool required for the borrowed underlying.
    pub short_required: u128,
    /// Underlying pulled from the caller.
    pub loan_remainder: u128,
    /// Short units sent to the beneficiary.
    pub rebate: u128,
}

/// Realized figures of a settled close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseSettlement {
    /// Operation ID.
    pub operation_id: OperationId,
    /// Short units borrowed and closed.
    pub quantity: u128,
    /// Underlying released by the close.
    pub output_underlying: u128,
    /// Underlying the pool required for the borrowed shorts.
    pub underlying_required: u128,
    /// Underlying sent to the beneficiary.
    pub payout: u128,
    /// Underlying pulled from the caller.
    pub loan_remainder: u128,
}

/// Outcome recorded by the callback and handed back to the initiator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementOutcome {
    /// Open settled.
    Open(OpenSettlement),
    /// Close settled.
    Close(CloseSettlement),
}

impl SettlementOutcome {
    /// Operation ID of the settled operation.
    #[must_use]
    pub const fn operation_id(&self) -> &OperationId {
        match self {
            Self::Open(s) => &s.operation_id,
            Self::Close(s) => &s.operation_id,
        }
    }
    /// Direction of the settled operation.
    #[must_use]
    pub const fn kind(&self) -> FlashKind {
        match self {
            Self::Open(_) => FlashKind::Open,
            Self::Close(_) => FlashKind::Close,
        }
    }
}

//! Domain events for flash settlement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Address, OperationId};

/// Events emitted by settled flash operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SettlementEvent {
    /// Leveraged long opened.
    #[serde(rename = "FLASH_OPENED")]
    Opened(FlashOpened),
    /// Leveraged long closed.
    #[serde(rename = "FLASH_CLOSED")]
    Closed(FlashClosed),
}

impl SettlementEvent {
    /// Get the operation ID for this event.
    #[must_use]
    pub const fn operation_id(&self) -> &OperationId {
        match self {
            Self::Opened(e) => &e.operation_id,
            Self::Closed(e) => &e.operation_id,
        }
    }

    /// Get the timestamp when this event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Opened(e) => e.occurred_at,
            Self::Closed(e) => e.occurred_at,
        }
    }

    /// Get the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Opened(_) => "FLASH_OPENED",
            Self::Closed(_) => "FLASH_CLOSED",
        }
    }
}

/// Event: leveraged long opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashOpened {
    /// Operation ID.
    pub operation_id: OperationId,
    /// Initiating account.
    pub caller: Address,
    /// Account that received the long units.
    pub beneficiary: Address,
    /// Option series.
    pub option: Address,
    /// Long units opened.
    pub quantity: u128,
    /// Underlying paid by the caller.
    pub loan_remainder: u128,
    /// Short units rebated.
    pub rebate: u128,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

/// Event: leveraged long closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashClosed {
    /// Operation ID.
    pub operation_id: OperationId,
    /// Initiating account.
    pub caller: Address,
    /// Account that received the payout.
    pub beneficiary: Address,
    /// Option series.
    pub option: Address,
    /// Short units closed.
    pub quantity: u128,
    /// Underlying released by the close.
    pub output_underlying: u128,
    /// Underlying paid out.
    pub payout: u128,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

//! Flash operation record carried through the pool's opaque payload.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::option_series::OptionSeries;
use crate::domain::shared::{Address, DomainError, OperationId};

/// Direction of a flash operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlashKind {
    /// Borrow underlying, mint, repay in short units.
    Open,
    /// Borrow short units, close, repay in underlying.
    Close,
}

impl FlashKind {
    /// Lowercase label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }

    /// Token borrowed from the pool for this direction.
    #[must_use]
    pub const fn borrowed_token(self, option: &OptionSeries) -> Address {
        match self {
            Self::Open => option.underlying(),
            Self::Close => option.redeem(),
        }
    }
}

impl fmt::Display for FlashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested flash operation.
///
/// `bound` is `max_premium` for [`FlashKind::Open`] and `min_payout` for
/// [`FlashKind::Close`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashOperation {
    /// Operation ID.
    pub id: OperationId,
    /// Direction.
    pub kind: FlashKind,
    /// Option series acted upon.
    pub option: Address,
    /// Canonical pool lending the funds.
    pub pair: Address,
    /// Loan quantity.
    pub quantity: u128,
    /// Caller-supplied economic bound.
    pub bound: u128,
    /// Account that initiated the operation and funds any remainder.
    pub caller: Address,
    /// Account receiving the position and any payout or rebate.
    pub beneficiary: Address,
}

impl FlashOperation {
    /// Encode into the pool's opaque payload.
    pub fn encode(&self) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec(self).map_err(|e| DomainError::invalid("payload", e.to_string()))
    }

    /// Decode from the pool's opaque payload.
    pub fn decode(payload: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(payload).map_err(|e| DomainError::invalid("payload", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::option_series::option_series::fixtures::series;

    fn operation() -> FlashOperation {
        FlashOperation {
            id: OperationId::new("op-1"),
            kind: FlashKind::Close,
            option: Address::from_label("option"),
            pair: Address::from_label("pair"),
            quantity: 340_282_366_920_938_463_463_374_607_431_768_211_455,
            bound: 5,
            caller: Address::from_label("alice"),
            beneficiary: Address::from_label("bob"),
        }
    }

    #[test]
    fn payload_preserves_full_width_amounts() {
        let op = operation();
        let decoded = FlashOperation::decode(&op.encode().unwrap()).unwrap();
        assert_eq!(decoded, op);
        assert_eq!(decoded.quantity, u128::MAX);
    }

    #[test]
    fn garbage_payload_is_rejected() {
        let err = FlashOperation::decode(b"\x00\x01not-json").unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { ref field, .. } if field == "payload"));
    }

    #[test]
    fn kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&FlashKind::Open).unwrap();
        assert_eq!(json, "\"OPEN\"");
    }

    #[test]
    fn borrowed_token_by_direction() {
        let s = series(1, 1);
        assert_eq!(FlashKind::Open.borrowed_token(&s), s.underlying());
        assert_eq!(FlashKind::Close.borrowed_token(&s), s.redeem());
    }
}

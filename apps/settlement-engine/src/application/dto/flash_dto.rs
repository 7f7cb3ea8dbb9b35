//! Flash Operation DTOs

use serde::{Deserialize, Serialize};

use crate::domain::settlement::{ClosePremium, FlashKind, OpenPremium};
use crate::domain::shared::Address;

/// Request to open a leveraged long position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFlashLongCommand {
    /// Account initiating the open and funding any remainder.
    pub caller: Address,
    /// Option series.
    pub option: Address,
    /// Long units to open (underlying borrowed).
    pub quantity: u128,
    /// Largest underlying remainder the caller will pay.
    pub max_premium: u128,
    /// Account receiving the long units and any rebate.
    pub beneficiary: Address,
}

impl OpenFlashLongCommand {
    /// Open for the caller's own account.
    #[must_use]
    pub const fn new(caller: Address, option: Address, quantity: u128, max_premium: u128) -> Self {
        Self {
            caller,
            option,
            quantity,
            max_premium,
            beneficiary: caller,
        }
    }

    /// Deliver the position to another account.
    #[must_use]
    pub const fn with_beneficiary(mut self, beneficiary: Address) -> Self {
        self.beneficiary = beneficiary;
        self
    }
}

/// Request to close a leveraged long position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseFlashLongCommand {
    /// Account initiating the close and supplying the long units.
    pub caller: Address,
    /// Option series.
    pub option: Address,
    /// Short units to borrow and close.
    pub quantity: u128,
    /// Smallest underlying payout the caller accepts. Zero also accepts
    /// paying a remainder.
    pub min_payout: u128,
    /// Account receiving the payout.
    pub beneficiary: Address,
}

impl CloseFlashLongCommand {
    /// Close for the caller's own account.
    #[must_use]
    pub const fn new(caller: Address, option: Address, quantity: u128, min_payout: u128) -> Self {
        Self {
            caller,
            option,
            quantity,
            min_payout,
            beneficiary: caller,
        }
    }

    /// Send the payout to another account.
    #[must_use]
    pub const fn with_beneficiary(mut self, beneficiary: Address) -> Self {
        self.beneficiary = beneficiary;
        self
    }
}

/// Quoted premium for a prospective operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumQuoteDto {
    /// Direction.
    pub kind: FlashKind,
    /// Option series.
    pub option: Address,
    /// Canonical pool priced against.
    pub pair: Address,
    /// Quantity priced.
    pub quantity: u128,
    /// Underlying the caller would pay.
    pub loan_remainder: u128,
    /// Short units (open) or underlying (close) the beneficiary would receive.
    pub proceeds: u128,
}

impl PremiumQuoteDto {
    /// Quote for an open.
    #[must_use]
    pub const fn from_open(option: Address, pair: Address, quantity: u128, premium: &OpenPremium) -> Self {
        Self {
            kind: FlashKind::Open,
            option,
            pair,
            quantity,
            loan_remainder: premium.loan_remainder,
            proceeds: premium.rebate,
        }
    }

    /// Quote for a close.
    #[must_use]
    pub const fn from_close(option: Address, pair: Address, quantity: u128, premium: &ClosePremium) -> Self {
        Self {
            kind: FlashKind::Close,
            option,
            pair,
            quantity,
            loan_remainder: premium.loan_remainder,
            proceeds: premium.payout,
        }
    }
}

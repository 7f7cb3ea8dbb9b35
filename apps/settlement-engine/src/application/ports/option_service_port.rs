//! Option Service Port (Driven Port)
//!
//! Mint and close accounting for option series. The service is trusted to
//! keep long and short issuance in `base:quote` proportion; the engine still
//! checks every receipt.

use serde::{Deserialize, Serialize};

use crate::domain::option_series::OptionSeries;
use crate::domain::shared::Address;

/// Long and short units minted by one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    /// Long units minted.
    pub long: u128,
    /// Short units minted.
    pub short: u128,
}

/// Units burned and underlying released by one close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseReceipt {
    /// Long units burned.
    pub long_burned: u128,
    /// Short units burned.
    pub short_burned: u128,
    /// Underlying sent to the receiver.
    pub underlying_released: u128,
}

/// Option service error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionServiceError {
    /// No series registered at this address.
    #[error("unknown option {option}")]
    UnknownOption { option: Address },

    /// Series past expiry.
    #[error("option {option} expired")]
    Expired { option: Address },

    /// No underlying deposited since the last mint.
    #[error("nothing to mint for {option}")]
    NothingToMint { option: Address },

    /// Deposited units do not close any position.
    #[error("nothing to close for {option}")]
    NothingToClose { option: Address },

    /// Service rejected the call.
    #[error("option service rejected call: {message}")]
    Rejected { message: String },
}

/// Port for the option series service.
#[cfg_attr(test, mockall::automock)]
pub trait OptionServicePort: Send + Sync {
    /// Parameters of a registered series.
    fn series(&self, option: Address) -> Result<OptionSeries, OptionServiceError>;

    /// Mint long and short units against underlying deposited into the
    /// option since the last call.
    fn mint(&self, option: Address, receiver: Address) -> Result<MintReceipt, OptionServiceError>;

    /// Burn the long and short units held by the option contract and release
    /// the proportional underlying to `receiver`.
    fn close(&self, option: Address, receiver: Address)
    -> Result<CloseReceipt, OptionServiceError>;
}

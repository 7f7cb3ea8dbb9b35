//! Option Series Value Object

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Address, DomainError};

/// Immutable parameters of one option series.
///
/// The option contract itself is the long token; `redeem` is the paired
/// short token. One long unit is minted per underlying unit deposited and
/// `quote / base` short units are minted alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSeries {
    /// Option contract address (also the long token).
    address: Address,
    /// Redeem (short) token address.
    redeem: Address,
    /// Underlying asset.
    underlying: Address,
    /// Strike asset.
    strike: Address,
    /// Underlying units per contract.
    base: u128,
    /// Strike units per contract.
    quote: u128,
    /// Expiry.
    expiry: DateTime<Utc>,
}

/// Parameters for building an [`OptionSeries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSeriesParams {
    /// Option contract address (also the long token).
    pub address: Address,
    /// Redeem (short) token address.
    pub redeem: Address,
    /// Underlying asset.
    pub underlying: Address,
    /// Strike asset.
    pub strike: Address,
    /// Underlying units per contract.
    pub base: u128,
    /// Strike units per contract.
    pub quote: u128,
    /// Expiry.
    pub expiry: DateTime<Utc>,
}

impl OptionSeries {
    /// Create a validated option series.
    pub fn new(params: OptionSeriesParams) -> Result<Self, DomainError> {
        if params.base == 0 {
            return Err(DomainError::invalid("base", "must be positive"));
        }
        if params.quote == 0 {
            return Err(DomainError::invalid("quote", "must be positive"));
        }
        for (field, addr) in [
            ("address", params.address),
            ("redeem", params.redeem),
            ("underlying", params.underlying),
            ("strike", params.strike),
        ] {
            if addr.is_zero() {
                return Err(DomainError::invalid(field, "zero address"));
            }
        }
        if params.underlying == params.strike {
            return Err(DomainError::invalid(
                "strike",
                "underlying and strike must differ",
            ));
        }
        if params.redeem == params.address || params.redeem == params.underlying {
            return Err(DomainError::invalid(
                "redeem",
                "redeem token must be distinct from the option and underlying",
            ));
        }

        Ok(Self {
            address: params.address,
            redeem: params.redeem,
            underlying: params.underlying,
            strike: params.strike,
            base: params.base,
            quote: params.quote,
            expiry: params.expiry,
        })
    }

    /// Option contract / long token address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Redeem (short) token address.
    #[must_use]
    pub const fn redeem(&self) -> Address {
        self.redeem
    }

    /// Underlying asset.
    #[must_use]
    pub const fn underlying(&self) -> Address {
        self.underlying
    }

    /// Strike asset.
    #[must_use]
    pub const fn strike(&self) -> Address {
        self.strike
    }

    /// Underlying units per contract.
    #[must_use]
    pub const fn base(&self) -> u128 {
        self.base
    }

    /// Strike units per contract.
    #[must_use]
    pub const fn quote(&self) -> u128 {
        self.quote
    }

    /// Expiry timestamp.
    #[must_use]
    pub const fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// Check if the series has expired.
    #[must_use]
    pub fn is_expired(&self, as_of: DateTime<Utc>) -> bool {
        as_of >= self.expiry
    }
}

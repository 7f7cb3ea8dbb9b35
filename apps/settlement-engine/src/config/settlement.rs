//! Settlement engine configuration.

use serde::{Deserialize, Serialize};

use crate::domain::amm::{DEFAULT_FEE_BPS, PairFactory, SwapFee};
use crate::domain::shared::{Address, CodeHash, DomainError};

/// Addresses and pool parameters the engine settles against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// The engine's own settlement address. Holds borrowed funds during a
    /// callback and is never a valid beneficiary.
    pub engine_address: Address,
    /// Pool factory used for canonical pool derivation.
    pub factory: Address,
    /// Pool init code hash used for canonical pool derivation.
    pub pair_init_code_hash: CodeHash,
    /// Pool fee in basis points.
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u16,
}

impl SettlementConfig {
    /// Canonical pool derivation parameters.
    #[must_use]
    pub const fn pair_factory(&self) -> PairFactory {
        PairFactory::new(self.factory, self.pair_init_code_hash)
    }

    /// Validated pool fee.
    pub fn swap_fee(&self) -> Result<SwapFee, DomainError> {
        SwapFee::new(self.fee_bps)
    }
}

const fn default_fee_bps() -> u16 {
    DEFAULT_FEE_BPS
}

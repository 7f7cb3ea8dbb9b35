//! Quote Premium Use Case
//!
//! Prices a prospective open or close against live reserves so callers can
//! choose `max_premium` and `min_payout`. Read-only.

use std::sync::Arc;

use crate::application::dto::PremiumQuoteDto;
use crate::application::ports::{OptionServicePort, PoolServicePort};
use crate::domain::amm::PairFactory;
use crate::domain::settlement::PremiumCalculator;
use crate::domain::shared::Address;
use crate::error::SettlementError;

/// Use case for quoting flash premiums.
pub struct QuotePremiumUseCase<O, P>
where
    O: OptionServicePort,
    P: PoolServicePort,
{
    options: Arc<O>,
    pools: Arc<P>,
    pairs: PairFactory,
}

impl<O, P> QuotePremiumUseCase<O, P>
where
    O: OptionServicePort,
    P: PoolServicePort,
{
    /// Create a new `QuotePremiumUseCase`.
    pub const fn new(options: Arc<O>, pools: Arc<P>, pairs: PairFactory) -> Self {
        Self {
            options,
            pools,
            pairs,
        }
    }

    /// Quote opening `quantity` long units of `option`.
    pub fn quote_open_premium(
        &self,
        option: Address,
        quantity: u128,
    ) -> Result<PremiumQuoteDto, SettlementError> {
        if quantity == 0 {
            return Err(SettlementError::ZeroQuantity);
        }
        let series = self.options.series(option)?;
        let pair = self.pairs.pair_for(series.redeem(), series.underlying())?;
        let reserves = self.pools.reserves(pair)?;
        let premium =
            PremiumCalculator::new(self.pools.fee()).open_premium(&reserves, &series, quantity)?;
        Ok(PremiumQuoteDto::from_open(option, pair, quantity, &premium))
    }

    /// Quote closing `quantity` short units of `option`.
    pub fn quote_close_premium(
        &self,
        option: Address,
        quantity: u128,
    ) -> Result<PremiumQuoteDto, SettlementError> {
        if quantity == 0 {
            return Err(SettlementError::ZeroQuantity);
        }
        let series = self.options.series(option)?;
        let pair = self.pairs.pair_for(series.redeem(), series.underlying())?;
        let reserves = self.pools.reserves(pair)?;
        let premium =
            PremiumCalculator::new(self.pools.fee()).close_premium(&reserves, &series, quantity)?;
        Ok(PremiumQuoteDto::from_close(option, pair, quantity, &premium))
    }
}

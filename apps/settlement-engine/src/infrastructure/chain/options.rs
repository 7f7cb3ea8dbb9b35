//! Option service adapter.
//!
//! Minting issues one long unit per underlying unit deposited since the last
//! call plus `short_from_long` short units. Closing burns the short units
//! held by the option contract with the proportional long units and releases
//! one underlying unit per long unit burned.

use crate::application::ports::{CloseReceipt, MintReceipt, OptionServiceError, OptionServicePort};
use crate::domain::option_series::{OptionSeries, long_from_short, short_from_long};
use crate::domain::shared::Address;

use super::InMemoryChain;

fn rejected(err: impl std::fmt::Display) -> OptionServiceError {
    OptionServiceError::Rejected {
        message: err.to_string(),
    }
}

impl OptionServicePort for InMemoryChain {
    fn series(&self, option: Address) -> Result<OptionSeries, OptionServiceError> {
        self.state
            .read()
            .options
            .get(&option)
            .map(|record| record.series.clone())
            .ok_or(OptionServiceError::UnknownOption { option })
    }

    fn mint(&self, option: Address, receiver: Address) -> Result<MintReceipt, OptionServiceError> {
        let mut state = self.state.write();
        let now = state.now;
        let (series, cached) = match state.options.get(&option) {
            Some(record) => (record.series.clone(), record.cached_underlying),
            None => return Err(OptionServiceError::UnknownOption { option }),
        };
        if series.is_expired(now) {
            return Err(OptionServiceError::Expired { option });
        }

        let held = state.balance(series.underlying(), option);
        let deposited = held.saturating_sub(cached);
        if deposited == 0 {
            return Err(OptionServiceError::NothingToMint { option });
        }
        let short = short_from_long(&series, deposited).map_err(rejected)?;

        state.credit(series.address(), receiver, deposited).map_err(rejected)?;
        state.credit(series.redeem(), receiver, short).map_err(rejected)?;
        if let Some(record) = state.options.get_mut(&option) {
            record.cached_underlying = held;
        }

        Ok(MintReceipt {
            long: deposited,
            short,
        })
    }

    fn close(&self, option: Address, receiver: Address) -> Result<CloseReceipt, OptionServiceError> {
        let mut state = self.state.write();
        let series = match state.options.get(&option) {
            Some(record) => record.series.clone(),
            None => return Err(OptionServiceError::UnknownOption { option }),
        };

        let short_held = state.balance(series.redeem(), option);
        let long_held = state.balance(series.address(), option);
        let long_required = long_from_short(&series, short_held).map_err(rejected)?;
        if short_held == 0 || long_required == 0 {
            return Err(OptionServiceError::NothingToClose { option });
        }
        if long_held < long_required {
            return Err(OptionServiceError::Rejected {
                message: format!(
                    "close of {short_held} short units needs {long_required} long units, option holds {long_held}"
                ),
            });
        }

        state.debit(series.redeem(), option, short_held).map_err(rejected)?;
        state.debit(series.address(), option, long_required).map_err(rejected)?;
        state
            .move_balance(series.underlying(), option, receiver, long_required)
            .map_err(rejected)?;
        let held = state.balance(series.underlying(), option);
        if let Some(record) = state.options.get_mut(&option) {
            record.cached_underlying = held;
        }

        Ok(CloseReceipt {
            long_burned: long_required,
            short_burned: short_held,
            underlying_released: long_required,
        })
    }
}

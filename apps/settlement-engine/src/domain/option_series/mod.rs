//! Option Series Bounded Context
//!
//! Immutable option parameters and the fixed long/short ratio between them.

pub mod conversion;
pub mod option_series;

pub use conversion::{long_from_short, short_from_long};
pub use option_series::{OptionSeries, OptionSeriesParams};

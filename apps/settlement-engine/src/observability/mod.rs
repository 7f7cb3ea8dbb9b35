//! Observability module for settlement metrics.

mod metrics;

pub use metrics::{record_rejection, record_settlement};

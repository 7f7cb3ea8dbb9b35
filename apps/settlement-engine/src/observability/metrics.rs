//! Settlement metrics.
//!
//! Counters and histograms are recorded through the `metrics` facade. The
//! library installs no exporter; the embedding process chooses one.

use metrics::{counter, histogram};

/// Record a settled flash operation.
///
/// # Arguments
///
/// * `kind` - Operation direction (`"open"`, `"close"`)
/// * `outcome` - Settlement outcome (`"remainder"`, `"rebate"`, `"payout"`, `"even"`)
/// * `premium_units` - Remainder, rebate or payout in token base units
/// * `duration_seconds` - Wall time from request to commit
pub fn record_settlement(kind: &str, outcome: &str, premium_units: u128, duration_seconds: f64) {
    counter!(
        "flash_settlements_total",
        "kind" => kind.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!("flash_premium_units", "kind" => kind.to_string()).record(premium_units as f64);

    histogram!("flash_settlement_duration_seconds", "kind" => kind.to_string())
        .record(duration_seconds);
}

/// Record a rejected flash operation.
///
/// # Arguments
///
/// * `kind` - Operation direction
/// * `category` - Error category (e.g. `"BOUND_VIOLATION"`)
/// * `code` - Error reason code (e.g. `"PREMIUM_EXCEEDS_MAX"`)
pub fn record_rejection(kind: &str, category: &str, code: &str) {
    counter!(
        "flash_rejections_total",
        "kind" => kind.to_string(),
        "category" => category.to_string(),
        "code" => code.to_string()
    )
    .increment(1);
}

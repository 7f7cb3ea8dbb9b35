//! Tracing Setup
//!
//! Installs a `tracing-subscriber` fmt subscriber driven by [`LoggingConfig`].
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides the configured level when set
//! - `format`: `json` for structured lines, `pretty` for local development
//!
//! # Usage
//!
//! ```rust,ignore
//! use flash_settlement::config::load_config;
//! use flash_settlement::telemetry::init_tracing;
//!
//! let config = load_config(None)?;
//! init_tracing(&config.observability.logging)?;
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::LoggingConfig;

/// Tracing initialization error.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Level directive could not be parsed.
    #[error("invalid log level '{level}': {message}")]
    InvalidLevel {
        /// Rejected directive.
        level: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Build the `EnvFilter`: `RUST_LOG` when set, otherwise the configured level.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| TelemetryError::InvalidLevel {
        level: config.level.clone(),
        message: e.to_string(),
    })
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_target(true);

    let result = if config.format == "pretty" {
        builder.pretty().try_init()
    } else {
        builder
            .json()
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .try_init()
    };

    result.map_err(|e| TelemetryError::AlreadyInstalled(e.to_string()))?;

    tracing::info!(
        level = %config.level,
        format = %config.format,
        "Tracing initialized"
    );
    Ok(())
}

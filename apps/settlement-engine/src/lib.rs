// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Flash Settlement Engine - Rust Core Library
//!
//! Opens and closes leveraged option positions in one atomic unit by
//! borrowing from a constant-product pool and settling inside its callback.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure pricing and lifecycle logic
//!   - `option_series`: Option parameters, long/short proportional conversion
//!   - `amm`: Constant-product swap math, canonical pool derivation
//!   - `settlement`: Premium calculator, engine state machine, events
//!
//! - **Application**: Orchestration
//!   - `ports`: Ledger, option service, pool service, atomic unit, events
//!   - `services`: `FlashSettlementEngine` and its `CallbackGate`
//!   - `use_cases`: Open/close settlement steps, premium quotes
//!   - `dto`: Commands and quote results
//!
//! - **Infrastructure**: In-memory adapters for every port
//!
//! Cross-cutting: `config` (YAML), `error`, `observability` (metrics) and
//! `telemetry` (tracing subscriber).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core pricing and lifecycle logic with no external dependencies.
pub mod domain;

/// Application layer - Ports, orchestration and use cases.
pub mod application;

/// Infrastructure layer - Adapters for the application ports.
pub mod infrastructure;

// =============================================================================
// Cross-cutting Modules
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Crate-level settlement errors.
pub mod error;

/// Settlement metrics.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::dto::{CloseFlashLongCommand, OpenFlashLongCommand, PremiumQuoteDto};
pub use application::services::{CallbackGate, EngineSettings, FlashSettlementEngine};
pub use application::use_cases::QuotePremiumUseCase;
pub use domain::amm::{PairFactory, SwapFee};
pub use domain::option_series::{OptionSeries, OptionSeriesParams};
pub use domain::settlement::{
    CloseSettlement, EngineState, OpenSettlement, PremiumCalculator, SettlementEvent,
};
pub use domain::shared::{Address, CodeHash, OperationId};
pub use error::{ErrorCategory, ErrorCode, SettlementError};
pub use infrastructure::{InMemoryChain, InMemoryEventPublisher};

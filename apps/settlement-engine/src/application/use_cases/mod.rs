//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.
//! The open and close settlement steps run inside the pool callback; the
//! quote use case is read-only.

mod close_flash_long;
mod open_flash_long;
mod quote_premium;

pub use close_flash_long::settle_close;
pub use open_flash_long::settle_open;
pub use quote_premium::QuotePremiumUseCase;

use crate::domain::shared::Address;

/// Collaborators available to a settlement step inside the pool callback.
pub struct SettlementContext<'a, L, O, P> {
    /// Token ledger.
    pub ledger: &'a L,
    /// Option service.
    pub options: &'a O,
    /// Pool service.
    pub pools: &'a P,
    /// The engine's own settlement address, holder of borrowed funds.
    pub engine: Address,
}

//! Application Services
//!
//! The flash-swap orchestrator and the callback gate it settles through.

mod callback_gate;
mod flash_swap_orchestrator;

pub use callback_gate::{CallbackGate, PendingOperation};
pub use flash_swap_orchestrator::{EngineSettings, FlashSettlementEngine};

//! Settlement Bounded Context
//!
//! The in-flight flash operation, its lifecycle, its pricing and the events
//! it produces.

pub mod events;
pub mod flash_operation;
pub mod premium;
pub mod settlement_result;
pub mod state_machine;

pub use events::{FlashClosed, FlashOpened, SettlementEvent};
pub use flash_operation::{FlashKind, FlashOperation};
pub use premium::{ClosePremium, OpenPremium, PremiumCalculator};
pub use settlement_result::{CloseSettlement, OpenSettlement, SettlementOutcome};
pub use state_machine::{EngineState, EngineStateMachine};

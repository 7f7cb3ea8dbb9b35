//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - `chain/`: In-memory ledger, option service, constant-product pools and
//!   atomic unit sharing one snapshot-able state
//! - `events/`: Event publishing adapters

pub mod chain;
pub mod events;

pub use chain::InMemoryChain;
pub use events::InMemoryEventPublisher;

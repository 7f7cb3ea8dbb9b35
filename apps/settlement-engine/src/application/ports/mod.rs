//! Application Ports (Driven)
//!
//! Ports define the interfaces of the external services the engine drives:
//! the token ledger, the option service, constant-product pools, the atomic
//! unit and the event sink.

mod atomic_unit_port;
mod event_publisher_port;
mod option_service_port;
mod pool_service_port;
mod token_ledger_port;

pub use atomic_unit_port::{AtomicUnitError, AtomicUnitPort, Checkpoint};
pub use event_publisher_port::{EventPublishError, EventPublisherPort, NoOpEventPublisher};
#[cfg(test)]
pub use option_service_port::MockOptionServicePort;
pub use option_service_port::{
    CloseReceipt, MintReceipt, OptionServiceError, OptionServicePort,
};
pub use pool_service_port::{
    FlashSwapCallback, FlashSwapCallee, FlashSwapRequest, PoolError, PoolServicePort,
};
pub use token_ledger_port::{LedgerError, TokenLedgerPort};

//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for the ledger, option service, pools, atomic unit
//!   and event sink
//! - **Services**: The flash-swap orchestrator and its callback gate
//! - **Use Cases**: Open and close settlement steps, premium quotes
//! - **DTOs**: Commands and quote results

pub mod dto;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use services::*;
pub use use_cases::*;

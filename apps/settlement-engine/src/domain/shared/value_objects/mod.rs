//! Shared value objects.

mod address;
mod identifiers;

pub use address::{Address, CodeHash};
pub use identifiers::OperationId;

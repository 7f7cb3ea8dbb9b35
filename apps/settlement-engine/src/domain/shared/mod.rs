//! Shared Domain Types
//!
//! Value objects, errors and wide-integer math shared across bounded contexts.

pub mod errors;
pub mod math;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{Address, CodeHash, OperationId};

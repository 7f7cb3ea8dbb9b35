//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for use case inputs and outputs.

mod flash_dto;

pub use flash_dto::{CloseFlashLongCommand, OpenFlashLongCommand, PremiumQuoteDto};

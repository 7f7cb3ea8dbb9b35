//! Domain Layer
//!
//! The innermost layer containing pricing and lifecycle logic with zero
//! infrastructure dependencies. This layer defines:
//!
//! - **Value Objects**: addresses, option series, pool reserves, fees
//! - **Domain Services**: swap math, proportional conversion, premium pricing
//! - **Domain Events**: records of settled flash operations
//!
//! # Bounded Contexts
//!
//! - [`option_series`]: Option parameters and long/short conversion
//! - [`amm`]: Constant-product pricing and canonical pool identity
//! - [`settlement`]: Flash operation lifecycle, premium and events

pub mod amm;
pub mod option_series;
pub mod settlement;
pub mod shared;

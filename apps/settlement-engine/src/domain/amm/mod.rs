//! AMM Bounded Context
//!
//! Constant-product pricing and canonical pool identity.

pub mod pair;
pub mod swap_math;

pub use pair::{PairFactory, PairReserves, PathStep, pair_address, sort_tokens};
pub use swap_math::{
    BPS_DENOMINATOR, DEFAULT_FEE_BPS, SwapFee, get_amount_in, get_amount_out, get_amount_out_ceil,
};

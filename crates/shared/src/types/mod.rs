//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{ALLOCATION_TOLERANCE, amounts_match, round_money};

//! Payment/receipt allocation across open documents.
//!
//! A transaction (a payment or receipt) fans out to one or more open
//! documents and exactly one cash or bank movement. The validation here
//! checks the allocation list against the transaction amount using the
//! system's single tolerance-based comparison (0.01 absolute), chosen to
//! absorb rounding without masking real mismatches.

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::AllocationError;
pub use types::{AllocationLine, DocumentBalance, PaymentMethod};
pub use validation::validate_allocations;

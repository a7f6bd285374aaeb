//! Double-entry posting requests and balance validation.
//!
//! A posting request is the structured input to the ledger posting engine:
//! a dated, described set of `{account, debit, credit}` lines plus an
//! optional back-reference to the source document that produced it. The
//! validation here owns the central invariant of the whole system:
//! the debit sum of every persisted journal entry equals its credit sum,
//! exactly, in `Decimal` arithmetic.

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::{LedgerError, LineIssue};
pub use types::{EntryKind, PostingLine, PostingRequest, SourceKind, SourceRef};
pub use validation::validate_posting;

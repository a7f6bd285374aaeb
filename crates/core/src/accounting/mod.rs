//! Source-document accountants.
//!
//! Each accountant is a pure function from a domain event (a cash movement,
//! a bank movement, a document with its item/tax breakdown) to a
//! [`PostingRequest`](crate::ledger::PostingRequest). They own no I/O: the
//! caller gathers the event snapshot (including the resolved account links)
//! and hands the resulting request to the posting engine, with the
//! `{source_kind, source_id}` back-reference set to the owning document.

pub mod bank;
pub mod cash;
pub mod document;
pub mod error;
pub mod types;

pub use bank::bank_movement_posting;
pub use cash::cash_movement_posting;
pub use document::document_posting;
pub use error::AccountingError;
pub use types::{
    BankDetailSplit, BankMovementEvent, CashMovementEvent, DocumentItemLine, DocumentKind,
    DocumentSnapshot, DocumentTaxLine, MovementDirection,
};

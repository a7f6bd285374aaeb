//! Core business logic for Balanza.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry posting requests and balance validation
//! - `accounting` - Source-document accountants (cash, bank, document)
//! - `allocation` - Payment/receipt allocation across open documents
//! - `fiscal` - Electronic-document authorization state machine
//! - `coa` - Chart-of-accounts template cloning
//! - `document` - Document totals and balance maintenance
//! - `storage` - Blob storage for signed XML and certificates

pub mod accounting;
pub mod allocation;
pub mod coa;
pub mod document;
pub mod fiscal;
pub mod ledger;
pub mod storage;

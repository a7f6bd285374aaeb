//! Allocation error types.

use rust_decimal::Decimal;
use thiserror::Error;

use balanza_shared::types::DocumentId;

/// Errors raised while validating or executing a transaction allocation.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The allocation list is empty.
    #[error("Transaction must be allocated to at least one document")]
    EmptyAllocation,

    /// An allocation amount is zero or negative.
    #[error("Allocation to document {0} must be positive")]
    NonPositiveAllocation(DocumentId),

    /// The allocation total differs from the transaction amount by more
    /// than the tolerance.
    #[error("Allocated total ({allocated}) does not match transaction amount ({amount})")]
    AmountMismatch {
        /// The transaction amount.
        amount: Decimal,
        /// The sum of the allocation lines.
        allocated: Decimal,
    },

    /// A referenced document does not exist.
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// An allocation exceeds the document's open balance.
    #[error("Allocation of {applied} to document {document} exceeds its balance of {balance}")]
    ExceedsBalance {
        /// The target document.
        document: DocumentId,
        /// Its current balance.
        balance: Decimal,
        /// The amount that was applied.
        applied: Decimal,
    },

    /// A cash transaction requires an open cash session for the user.
    #[error("No open cash session for this user")]
    NoOpenCashSession,

    /// A transfer transaction requires a bank account.
    #[error("Transfer transaction requires a bank account")]
    MissingBankAccount,
}

impl AllocationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyAllocation => "EMPTY_ALLOCATION",
            Self::NonPositiveAllocation(_) => "NON_POSITIVE_ALLOCATION",
            Self::AmountMismatch { .. } => "ALLOCATION_AMOUNT_MISMATCH",
            Self::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::ExceedsBalance { .. } => "ALLOCATION_EXCEEDS_BALANCE",
            Self::NoOpenCashSession => "NO_OPEN_CASH_SESSION",
            Self::MissingBankAccount => "MISSING_BANK_ACCOUNT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::DocumentNotFound(_) => 404,
            Self::NoOpenCashSession | Self::MissingBankAccount => 422,
            _ => 400,
        }
    }
}

//! Allocation input types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use balanza_shared::types::DocumentId;

/// How a transaction moves money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash through an open cash session.
    Cash,
    /// Bank transfer.
    Transfer,
}

/// One slice of a transaction applied to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    /// The target document.
    pub document_id: DocumentId,
    /// Amount applied to it (must be positive).
    pub amount: Decimal,
}

/// A document's current open balance, as read-state for validation.
#[derive(Debug, Clone, Copy)]
pub struct DocumentBalance {
    /// The document.
    pub document_id: DocumentId,
    /// Its current balance (total minus paid).
    pub balance: Decimal,
}

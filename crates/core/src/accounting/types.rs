//! Domain-event snapshots consumed by the accountants.
//!
//! These are read-state snapshots assembled by the persistence layer:
//! every account link the accountant may need is already resolved to an
//! `Option<AccountId>` so the accountants stay pure and synchronous.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use balanza_shared::types::{AccountId, BankAccountId, CashBoxId, CostCenterId, PersonId};

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Money received (income).
    In,
    /// Money paid out (expense).
    Out,
}

/// Snapshot of a cash movement ready for posting.
#[derive(Debug, Clone)]
pub struct CashMovementEvent {
    /// The movement's id (becomes the entry's source id).
    pub movement_id: Uuid,
    /// Movement direction.
    pub direction: MovementDirection,
    /// Movement amount (positive).
    pub amount: Decimal,
    /// Movement date.
    pub date: NaiveDate,
    /// Free-text concept.
    pub description: String,
    /// The cash box this movement belongs to.
    pub cash_box_id: CashBoxId,
    /// Ledger account linked to the cash box, if configured.
    pub cash_box_account: Option<AccountId>,
    /// Counterparty account (receivable for income, payable for expense),
    /// resolved from the person's configuration, if present.
    pub counterparty_account: Option<AccountId>,
    /// The counterparty, if any.
    pub person_id: Option<PersonId>,
    /// Optional cost center tag.
    pub cost_center_id: Option<CostCenterId>,
}

/// One detail split of a bank movement.
#[derive(Debug, Clone)]
pub struct BankDetailSplit {
    /// Counterpart account for this split.
    pub account_id: Option<AccountId>,
    /// Split amount (positive).
    pub amount: Decimal,
    /// Optional counterparty tag.
    pub person_id: Option<PersonId>,
    /// Optional cost center tag.
    pub cost_center_id: Option<CostCenterId>,
}

/// Snapshot of a bank movement ready for posting.
#[derive(Debug, Clone)]
pub struct BankMovementEvent {
    /// The movement's id (becomes the entry's source id).
    pub movement_id: Uuid,
    /// Movement direction.
    pub direction: MovementDirection,
    /// Movement date.
    pub date: NaiveDate,
    /// Free-text concept.
    pub description: String,
    /// The bank account this movement belongs to.
    pub bank_account_id: BankAccountId,
    /// Ledger account linked to the bank account, if configured.
    pub bank_ledger_account: Option<AccountId>,
    /// Detail splits; each becomes its own counterpart line.
    pub details: Vec<BankDetailSplit>,
}

/// Kind of business document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Sales invoice.
    SalesInvoice,
    /// Credit note against a sales invoice.
    CreditNote,
    /// Purchase invoice (vendor bill).
    PurchaseInvoice,
    /// Tax withholding document.
    Withholding,
}

impl DocumentKind {
    /// Returns true for documents that are sent to the tax authority for
    /// electronic authorization.
    #[must_use]
    pub const fn is_fiscal(&self) -> bool {
        matches!(self, Self::SalesInvoice | Self::CreditNote | Self::Withholding)
    }
}

/// One item line of a document, reduced to its posted amounts.
#[derive(Debug, Clone)]
pub struct DocumentItemLine {
    /// Revenue (or expense) account for this item, if configured.
    pub account_id: Option<AccountId>,
    /// Net amount after discount.
    pub net_amount: Decimal,
    /// Optional cost center tag.
    pub cost_center_id: Option<CostCenterId>,
}

/// One tax line of a document.
#[derive(Debug, Clone)]
pub struct DocumentTaxLine {
    /// Tax account (payable for sales, creditable for purchases), if configured.
    pub account_id: Option<AccountId>,
    /// Tax amount.
    pub amount: Decimal,
}

/// Snapshot of a document's read-state gathered for posting:
/// the document header plus its item and tax breakdown.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    /// The document's id (becomes the entry's source id).
    pub document_id: Uuid,
    /// Document kind.
    pub kind: DocumentKind,
    /// Issue date.
    pub date: NaiveDate,
    /// Legal number or human-readable reference.
    pub reference: String,
    /// The counterparty.
    pub person_id: Option<PersonId>,
    /// Counterparty account (receivable for sales-side documents,
    /// payable for purchases), if configured.
    pub counterparty_account: Option<AccountId>,
    /// Document total (what the counterparty leg posts).
    pub total: Decimal,
    /// Item breakdown.
    pub items: Vec<DocumentItemLine>,
    /// Tax breakdown.
    pub taxes: Vec<DocumentTaxLine>,
}

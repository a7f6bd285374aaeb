//! Posting request types for the ledger posting engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use balanza_shared::types::{AccountId, CostCenterId, PersonId};

/// Classification of a journal entry by the business event that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Sales document (invoice, credit note).
    Sale,
    /// Purchase document (vendor bill).
    Purchase,
    /// Cash box movement.
    Cash,
    /// Bank movement.
    Bank,
    /// Tax withholding document.
    Withholding,
    /// Inter-account transfer.
    Transfer,
    /// Manual adjustment.
    Adjustment,
}

/// Kind of source document a journal entry was produced from.
///
/// Together with the source id this forms the back-reference used to
/// find-and-replace an entry when its source document is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    /// A business document (invoice, credit note, withholding).
    Document,
    /// A cash box movement.
    CashMovement,
    /// A bank movement.
    BankMovement,
}

impl SourceKind {
    /// Returns the storage representation of this source kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "DOCUMENT",
            Self::CashMovement => "CASH_MOVEMENT",
            Self::BankMovement => "BANK_MOVEMENT",
        }
    }
}

/// Back-reference from a journal entry to its source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// The kind of source document.
    pub kind: SourceKind,
    /// The source document's id.
    pub id: Uuid,
}

impl SourceRef {
    /// Creates a new source reference.
    #[must_use]
    pub const fn new(kind: SourceKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

/// One leg of a posting request.
///
/// Exactly one of `debit`/`credit` must be nonzero; this is the building
/// block whose aggregate must balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingLine {
    /// The account this leg posts to.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Optional cost center tag.
    pub cost_center_id: Option<CostCenterId>,
    /// Optional counterparty tag.
    pub person_id: Option<PersonId>,
}

impl PostingLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            cost_center_id: None,
            person_id: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            cost_center_id: None,
            person_id: None,
        }
    }

    /// Tags this line with a counterparty.
    #[must_use]
    pub fn with_person(mut self, person_id: PersonId) -> Self {
        self.person_id = Some(person_id);
        self
    }

    /// Tags this line with a cost center.
    #[must_use]
    pub fn with_cost_center(mut self, cost_center_id: CostCenterId) -> Self {
        self.cost_center_id = Some(cost_center_id);
        self
    }
}

/// Structured input to the ledger posting engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingRequest {
    /// Entry date.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Entry classification.
    pub kind: EntryKind,
    /// Optional back-reference to the source document.
    pub source: Option<SourceRef>,
    /// The entry legs.
    pub lines: Vec<PostingLine>,
}

impl PostingRequest {
    /// Returns the debit and credit totals of this request.
    #[must_use]
    pub fn totals(&self) -> (Decimal, Decimal) {
        let debits: Decimal = self.lines.iter().map(|l| l.debit).sum();
        let credits: Decimal = self.lines.iter().map(|l| l.credit).sum();
        (debits, credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_source_kind_storage_representation() {
        assert_eq!(SourceKind::Document.as_str(), "DOCUMENT");
        assert_eq!(SourceKind::CashMovement.as_str(), "CASH_MOVEMENT");
        assert_eq!(SourceKind::BankMovement.as_str(), "BANK_MOVEMENT");
    }

    #[test]
    fn test_line_constructors() {
        let account = AccountId::new();
        let d = PostingLine::debit(account, dec!(50));
        assert_eq!(d.debit, dec!(50));
        assert_eq!(d.credit, Decimal::ZERO);

        let c = PostingLine::credit(account, dec!(50));
        assert_eq!(c.debit, Decimal::ZERO);
        assert_eq!(c.credit, dec!(50));
    }

    #[test]
    fn test_totals() {
        let account = AccountId::new();
        let request = PostingRequest {
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            description: "test".to_string(),
            kind: EntryKind::Adjustment,
            source: None,
            lines: vec![
                PostingLine::debit(account, dec!(30)),
                PostingLine::debit(account, dec!(20)),
                PostingLine::credit(account, dec!(50)),
            ],
        };
        assert_eq!(request.totals(), (dec!(50), dec!(50)));
    }
}

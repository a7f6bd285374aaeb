//! Accountant error types.
//!
//! These are configuration errors: the tenant has not linked the ledger
//! account an accountant needs. They are surfaced with enough detail to
//! identify which configuration item is missing, and are never retried
//! automatically.

use thiserror::Error;
use uuid::Uuid;

use balanza_shared::types::{BankAccountId, CashBoxId, PersonId};

use super::types::MovementDirection;

/// Which counterpart account a movement direction selects.
fn account_role(direction: &MovementDirection) -> &'static str {
    match direction {
        MovementDirection::In => "receivable",
        MovementDirection::Out => "payable",
    }
}

/// Errors raised while translating a domain event into a posting request.
#[derive(Debug, Error)]
pub enum AccountingError {
    /// The cash box has no linked ledger account.
    #[error("Cash box {0} has no linked ledger account")]
    MissingCashBoxAccount(CashBoxId),

    /// The counterparty has no receivable/payable account configured for
    /// this movement direction.
    #[error("Counterparty {person} has no {} account configured", account_role(.direction))]
    MissingCounterpartyAccount {
        /// The person whose configuration is incomplete.
        person: PersonId,
        /// The movement direction that selects which account was needed.
        direction: MovementDirection,
    },

    /// The movement names no counterparty, so no counterpart account can
    /// be derived.
    #[error("Movement {0} has no counterparty to post against")]
    MissingCounterparty(Uuid),

    /// The bank account has no linked ledger account.
    #[error("Bank account {0} has no linked ledger account")]
    MissingBankAccount(BankAccountId),

    /// A bank movement carried no detail splits.
    #[error("Bank movement {0} has no detail lines")]
    EmptyMovement(Uuid),

    /// A document item references no revenue/expense account.
    #[error("Document {document}: item {index} has no account configured")]
    MissingItemAccount {
        /// The owning document.
        document: Uuid,
        /// Zero-based index of the item.
        index: usize,
    },

    /// A document tax line references no tax account.
    #[error("Document {document}: tax line {index} has no account configured")]
    MissingTaxAccount {
        /// The owning document.
        document: Uuid,
        /// Zero-based index of the tax line.
        index: usize,
    },

    /// A document has no counterparty account to post against.
    #[error("Document {0} has no counterparty account configured")]
    MissingDocumentCounterpartyAccount(Uuid),
}

impl AccountingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCashBoxAccount(_) => "MISSING_CASH_BOX_ACCOUNT",
            Self::MissingCounterpartyAccount { .. } => "MISSING_COUNTERPARTY_ACCOUNT",
            Self::MissingCounterparty(_) => "MISSING_COUNTERPARTY",
            Self::MissingBankAccount(_) => "MISSING_BANK_ACCOUNT",
            Self::EmptyMovement(_) => "EMPTY_MOVEMENT",
            Self::MissingItemAccount { .. } => "MISSING_ITEM_ACCOUNT",
            Self::MissingTaxAccount { .. } => "MISSING_TAX_ACCOUNT",
            Self::MissingDocumentCounterpartyAccount(_) => "MISSING_DOCUMENT_COUNTERPARTY_ACCOUNT",
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Configuration errors are caller-fixable setup problems, not bad
    /// request payloads.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        422
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterparty_error_message_names_direction() {
        let person = PersonId::new();
        let income = AccountingError::MissingCounterpartyAccount {
            person,
            direction: MovementDirection::In,
        };
        assert!(income.to_string().contains("receivable"));

        let expense = AccountingError::MissingCounterpartyAccount {
            person,
            direction: MovementDirection::Out,
        };
        assert!(expense.to_string().contains("payable"));
    }

    #[test]
    fn test_error_codes() {
        let cash_box = CashBoxId::new();
        assert_eq!(
            AccountingError::MissingCashBoxAccount(cash_box).error_code(),
            "MISSING_CASH_BOX_ACCOUNT"
        );
        assert_eq!(
            AccountingError::MissingBankAccount(BankAccountId::new()).error_code(),
            "MISSING_BANK_ACCOUNT"
        );
    }
}

//! Document (invoice) accountant.

use super::error::AccountingError;
use super::types::{DocumentKind, DocumentSnapshot};
use crate::ledger::{EntryKind, PostingLine, PostingRequest, SourceKind, SourceRef};

/// Builds the posting request for a business document from its item/tax
/// breakdown.
///
/// The counterparty account takes the document total on one side; every
/// item line (revenue or expense) and every tax line goes on the other:
///
/// - sales invoice: debit receivable, credit revenue + tax payable
/// - credit note: the mirror of a sales invoice
/// - purchase invoice: debit expense + creditable tax, credit payable
/// - withholding: debit the withheld tax lines, credit receivable
///
/// # Errors
///
/// Returns a configuration error naming the missing account link.
pub fn document_posting(snapshot: &DocumentSnapshot) -> Result<PostingRequest, AccountingError> {
    let counterparty_account = snapshot.counterparty_account.ok_or(
        AccountingError::MissingDocumentCounterpartyAccount(snapshot.document_id),
    )?;

    // Which side of the entry the counterparty leg sits on.
    let counterparty_is_debit = matches!(snapshot.kind, DocumentKind::SalesInvoice);

    let mut lines = Vec::with_capacity(snapshot.items.len() + snapshot.taxes.len() + 1);

    let mut counterparty_line = if counterparty_is_debit {
        PostingLine::debit(counterparty_account, snapshot.total)
    } else {
        PostingLine::credit(counterparty_account, snapshot.total)
    };
    counterparty_line.person_id = snapshot.person_id;
    lines.push(counterparty_line);

    for (index, item) in snapshot.items.iter().enumerate() {
        // Zero-amount rows (e.g. a withholding's concept lines) post nothing.
        if item.net_amount.is_zero() {
            continue;
        }
        let account = item.account_id.ok_or(AccountingError::MissingItemAccount {
            document: snapshot.document_id,
            index,
        })?;
        let mut line = if counterparty_is_debit {
            PostingLine::credit(account, item.net_amount)
        } else {
            PostingLine::debit(account, item.net_amount)
        };
        line.cost_center_id = item.cost_center_id;
        lines.push(line);
    }

    for (index, tax) in snapshot.taxes.iter().enumerate() {
        if tax.amount.is_zero() {
            continue;
        }
        let account = tax.account_id.ok_or(AccountingError::MissingTaxAccount {
            document: snapshot.document_id,
            index,
        })?;
        let line = if counterparty_is_debit {
            PostingLine::credit(account, tax.amount)
        } else {
            PostingLine::debit(account, tax.amount)
        };
        lines.push(line);
    }

    let kind = match snapshot.kind {
        DocumentKind::SalesInvoice | DocumentKind::CreditNote => EntryKind::Sale,
        DocumentKind::PurchaseInvoice => EntryKind::Purchase,
        DocumentKind::Withholding => EntryKind::Withholding,
    };

    Ok(PostingRequest {
        date: snapshot.date,
        description: snapshot.reference.clone(),
        kind,
        source: Some(SourceRef::new(SourceKind::Document, snapshot.document_id)),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounting::types::{DocumentItemLine, DocumentTaxLine};
    use crate::ledger::validate_posting;
    use balanza_shared::types::{AccountId, PersonId};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn item(net: Decimal) -> DocumentItemLine {
        DocumentItemLine {
            account_id: Some(AccountId::new()),
            net_amount: net,
            cost_center_id: None,
        }
    }

    fn tax(amount: Decimal) -> DocumentTaxLine {
        DocumentTaxLine {
            account_id: Some(AccountId::new()),
            amount,
        }
    }

    fn invoice() -> DocumentSnapshot {
        DocumentSnapshot {
            document_id: Uuid::new_v4(),
            kind: DocumentKind::SalesInvoice,
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            reference: "001-001-000000042".to_string(),
            person_id: Some(PersonId::new()),
            counterparty_account: Some(AccountId::new()),
            total: dec!(112.00),
            items: vec![item(dec!(60.00)), item(dec!(40.00))],
            taxes: vec![tax(dec!(12.00))],
        }
    }

    #[test]
    fn test_sales_invoice_posting() {
        let snapshot = invoice();
        let request = document_posting(&snapshot).unwrap();

        // receivable + 2 items + 1 tax
        assert_eq!(request.lines.len(), 4);
        assert_eq!(request.lines[0].debit, dec!(112.00));
        assert_eq!(request.lines[1].credit, dec!(60.00));
        assert_eq!(request.lines[2].credit, dec!(40.00));
        assert_eq!(request.lines[3].credit, dec!(12.00));
        assert_eq!(request.kind, EntryKind::Sale);
        assert!(validate_posting(&request).is_ok());
    }

    #[test]
    fn test_credit_note_mirrors_invoice() {
        let mut snapshot = invoice();
        snapshot.kind = DocumentKind::CreditNote;
        let request = document_posting(&snapshot).unwrap();

        assert_eq!(request.lines[0].credit, dec!(112.00));
        assert_eq!(request.lines[1].debit, dec!(60.00));
        assert!(validate_posting(&request).is_ok());
    }

    #[test]
    fn test_purchase_invoice_posting() {
        let mut snapshot = invoice();
        snapshot.kind = DocumentKind::PurchaseInvoice;
        let request = document_posting(&snapshot).unwrap();

        assert_eq!(request.lines[0].credit, dec!(112.00));
        assert_eq!(request.kind, EntryKind::Purchase);
        assert!(validate_posting(&request).is_ok());
    }

    #[test]
    fn test_withholding_posting() {
        let snapshot = DocumentSnapshot {
            document_id: Uuid::new_v4(),
            kind: DocumentKind::Withholding,
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            reference: "001-001-000000007".to_string(),
            person_id: Some(PersonId::new()),
            counterparty_account: Some(AccountId::new()),
            total: dec!(3.50),
            items: vec![],
            taxes: vec![tax(dec!(1.00)), tax(dec!(2.50))],
        };
        let request = document_posting(&snapshot).unwrap();

        assert_eq!(request.lines[0].credit, dec!(3.50));
        assert_eq!(request.lines[1].debit, dec!(1.00));
        assert_eq!(request.lines[2].debit, dec!(2.50));
        assert_eq!(request.kind, EntryKind::Withholding);
        assert!(validate_posting(&request).is_ok());
    }

    #[test]
    fn test_zero_amount_rows_are_skipped() {
        let mut snapshot = invoice();
        snapshot.items.push(DocumentItemLine {
            account_id: None,
            net_amount: Decimal::ZERO,
            cost_center_id: None,
        });
        snapshot.taxes.push(tax(Decimal::ZERO));
        let request = document_posting(&snapshot).unwrap();

        // Still receivable + 2 items + 1 tax; the zero rows post nothing.
        assert_eq!(request.lines.len(), 4);
        assert!(validate_posting(&request).is_ok());
    }

    #[test]
    fn test_missing_counterparty_account() {
        let mut snapshot = invoice();
        snapshot.counterparty_account = None;
        assert!(matches!(
            document_posting(&snapshot),
            Err(AccountingError::MissingDocumentCounterpartyAccount(_))
        ));
    }

    #[test]
    fn test_missing_item_account() {
        let mut snapshot = invoice();
        snapshot.items[1].account_id = None;
        assert!(matches!(
            document_posting(&snapshot),
            Err(AccountingError::MissingItemAccount { index: 1, .. })
        ));
    }

    #[test]
    fn test_missing_tax_account() {
        let mut snapshot = invoice();
        snapshot.taxes[0].account_id = None;
        assert!(matches!(
            document_posting(&snapshot),
            Err(AccountingError::MissingTaxAccount { index: 0, .. })
        ));
    }
}

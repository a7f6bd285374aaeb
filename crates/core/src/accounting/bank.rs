//! Bank movement accountant.

use rust_decimal::Decimal;

use super::error::AccountingError;
use super::types::{BankMovementEvent, MovementDirection};
use crate::ledger::{EntryKind, PostingLine, PostingRequest, SourceKind, SourceRef};

/// Builds the posting request for a bank movement.
///
/// Symmetric to the cash accountant, except a bank movement may carry
/// multiple detail splits: the bank's linked ledger account takes the
/// movement total on one side, and every detail row becomes its own
/// counterpart line on the other.
///
/// # Errors
///
/// - [`AccountingError::MissingBankAccount`] if the bank account has no
///   linked ledger account.
/// - [`AccountingError::EmptyMovement`] if there are no detail splits.
/// - [`AccountingError::MissingItemAccount`] if a split has no account.
pub fn bank_movement_posting(event: &BankMovementEvent) -> Result<PostingRequest, AccountingError> {
    let bank_account = event
        .bank_ledger_account
        .ok_or(AccountingError::MissingBankAccount(event.bank_account_id))?;

    if event.details.is_empty() {
        return Err(AccountingError::EmptyMovement(event.movement_id));
    }

    let total: Decimal = event.details.iter().map(|d| d.amount).sum();

    let mut lines = Vec::with_capacity(event.details.len() + 1);
    match event.direction {
        MovementDirection::In => lines.push(PostingLine::debit(bank_account, total)),
        MovementDirection::Out => lines.push(PostingLine::credit(bank_account, total)),
    }

    for (index, detail) in event.details.iter().enumerate() {
        let account = detail.account_id.ok_or(AccountingError::MissingItemAccount {
            document: event.movement_id,
            index,
        })?;
        let mut line = match event.direction {
            MovementDirection::In => PostingLine::credit(account, detail.amount),
            MovementDirection::Out => PostingLine::debit(account, detail.amount),
        };
        line.person_id = detail.person_id;
        line.cost_center_id = detail.cost_center_id;
        lines.push(line);
    }

    Ok(PostingRequest {
        date: event.date,
        description: event.description.clone(),
        kind: EntryKind::Bank,
        source: Some(SourceRef::new(SourceKind::BankMovement, event.movement_id)),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounting::types::BankDetailSplit;
    use crate::ledger::validate_posting;
    use balanza_shared::types::{AccountId, BankAccountId};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn make_event(splits: Vec<BankDetailSplit>) -> BankMovementEvent {
        BankMovementEvent {
            movement_id: Uuid::new_v4(),
            direction: MovementDirection::Out,
            date: NaiveDate::from_ymd_opt(2026, 2, 12).unwrap(),
            description: "Pago a proveedor".to_string(),
            bank_account_id: BankAccountId::new(),
            bank_ledger_account: Some(AccountId::new()),
            details: splits,
        }
    }

    fn split(amount: Decimal) -> BankDetailSplit {
        BankDetailSplit {
            account_id: Some(AccountId::new()),
            amount,
            person_id: None,
            cost_center_id: None,
        }
    }

    #[test]
    fn test_one_line_per_detail_split() {
        let event = make_event(vec![split(dec!(70.00)), split(dec!(30.00))]);
        let request = bank_movement_posting(&event).unwrap();

        // bank leg + two splits
        assert_eq!(request.lines.len(), 3);
        assert_eq!(request.lines[0].credit, dec!(100.00));
        assert_eq!(request.lines[1].debit, dec!(70.00));
        assert_eq!(request.lines[2].debit, dec!(30.00));
        assert!(validate_posting(&request).is_ok());
    }

    #[test]
    fn test_incoming_movement_debits_bank() {
        let mut event = make_event(vec![split(dec!(25.00))]);
        event.direction = MovementDirection::In;
        let request = bank_movement_posting(&event).unwrap();

        assert_eq!(request.lines[0].debit, dec!(25.00));
        assert_eq!(request.lines[1].credit, dec!(25.00));
        assert!(validate_posting(&request).is_ok());
    }

    #[test]
    fn test_missing_bank_account() {
        let mut event = make_event(vec![split(dec!(10.00))]);
        event.bank_ledger_account = None;
        assert!(matches!(
            bank_movement_posting(&event),
            Err(AccountingError::MissingBankAccount(_))
        ));
    }

    #[test]
    fn test_empty_details_rejected() {
        let event = make_event(vec![]);
        assert!(matches!(
            bank_movement_posting(&event),
            Err(AccountingError::EmptyMovement(_))
        ));
    }

    #[test]
    fn test_split_without_account_rejected() {
        let mut bad = split(dec!(10.00));
        bad.account_id = None;
        let event = make_event(vec![split(dec!(5.00)), bad]);
        assert!(matches!(
            bank_movement_posting(&event),
            Err(AccountingError::MissingItemAccount { index: 1, .. })
        ));
    }
}

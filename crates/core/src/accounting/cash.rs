//! Cash movement accountant.

use super::error::AccountingError;
use super::types::{CashMovementEvent, MovementDirection};
use crate::ledger::{EntryKind, PostingLine, PostingRequest, SourceKind, SourceRef};

/// Builds the posting request for a cash movement.
///
/// A movement of amount `A` against cash box account `C` and counterparty
/// account `P` produces exactly two lines:
///
/// - money in:  debit `C` for `A`, credit `P` for `A`
/// - money out: credit `C` for `A`, debit `P` for `A`
///
/// # Errors
///
/// - [`AccountingError::MissingCashBoxAccount`] if the cash box has no
///   linked ledger account.
/// - [`AccountingError::MissingCounterpartyAccount`] if the person has no
///   receivable/payable account configured for the movement direction.
pub fn cash_movement_posting(event: &CashMovementEvent) -> Result<PostingRequest, AccountingError> {
    let cash_account = event
        .cash_box_account
        .ok_or(AccountingError::MissingCashBoxAccount(event.cash_box_id))?;

    let counterparty_account = match (event.counterparty_account, event.person_id) {
        (Some(account), _) => account,
        (None, Some(person)) => {
            return Err(AccountingError::MissingCounterpartyAccount {
                person,
                direction: event.direction,
            });
        }
        (None, None) => {
            return Err(AccountingError::MissingCounterparty(event.movement_id));
        }
    };

    let (cash_line, counterpart_line) = match event.direction {
        MovementDirection::In => (
            PostingLine::debit(cash_account, event.amount),
            PostingLine::credit(counterparty_account, event.amount),
        ),
        MovementDirection::Out => (
            PostingLine::credit(cash_account, event.amount),
            PostingLine::debit(counterparty_account, event.amount),
        ),
    };

    let mut counterpart_line = counterpart_line;
    counterpart_line.person_id = event.person_id;
    counterpart_line.cost_center_id = event.cost_center_id;

    Ok(PostingRequest {
        date: event.date,
        description: event.description.clone(),
        kind: EntryKind::Cash,
        source: Some(SourceRef::new(SourceKind::CashMovement, event.movement_id)),
        lines: vec![cash_line, counterpart_line],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::validate_posting;
    use balanza_shared::types::{AccountId, CashBoxId, PersonId};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn make_event(direction: MovementDirection) -> CashMovementEvent {
        CashMovementEvent {
            movement_id: Uuid::new_v4(),
            direction,
            amount: dec!(50.00),
            date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            description: "Cobro en efectivo".to_string(),
            cash_box_id: CashBoxId::new(),
            cash_box_account: Some(AccountId::new()),
            counterparty_account: Some(AccountId::new()),
            person_id: Some(PersonId::new()),
            cost_center_id: None,
        }
    }

    /// Cash box linked to account "Caja", person's receivable account,
    /// movement IN of 50.00: debit cash 50, credit receivable 50.
    #[test]
    fn test_income_posting() {
        let event = make_event(MovementDirection::In);
        let request = cash_movement_posting(&event).unwrap();

        assert_eq!(request.lines.len(), 2);
        let cash = &request.lines[0];
        let counterpart = &request.lines[1];

        assert_eq!(cash.account_id, event.cash_box_account.unwrap());
        assert_eq!(cash.debit, dec!(50.00));
        assert_eq!(cash.credit, Decimal::ZERO);

        assert_eq!(counterpart.account_id, event.counterparty_account.unwrap());
        assert_eq!(counterpart.debit, Decimal::ZERO);
        assert_eq!(counterpart.credit, dec!(50.00));

        assert!(validate_posting(&request).is_ok());
    }

    #[test]
    fn test_expense_posting_is_mirrored() {
        let event = make_event(MovementDirection::Out);
        let request = cash_movement_posting(&event).unwrap();

        assert_eq!(request.lines[0].credit, dec!(50.00));
        assert_eq!(request.lines[1].debit, dec!(50.00));
        assert!(validate_posting(&request).is_ok());
    }

    #[test]
    fn test_source_reference_points_at_movement() {
        let event = make_event(MovementDirection::In);
        let request = cash_movement_posting(&event).unwrap();
        let source = request.source.unwrap();
        assert_eq!(source.kind, SourceKind::CashMovement);
        assert_eq!(source.id, event.movement_id);
    }

    #[test]
    fn test_missing_cash_box_account() {
        let mut event = make_event(MovementDirection::In);
        event.cash_box_account = None;
        assert!(matches!(
            cash_movement_posting(&event),
            Err(AccountingError::MissingCashBoxAccount(_))
        ));
    }

    #[test]
    fn test_missing_counterparty_account() {
        let mut event = make_event(MovementDirection::Out);
        event.counterparty_account = None;
        assert!(matches!(
            cash_movement_posting(&event),
            Err(AccountingError::MissingCounterpartyAccount {
                direction: MovementDirection::Out,
                ..
            })
        ));
    }

    #[test]
    fn test_movement_without_counterparty() {
        let mut event = make_event(MovementDirection::In);
        event.person_id = None;
        event.counterparty_account = None;
        assert!(matches!(
            cash_movement_posting(&event),
            Err(AccountingError::MissingCounterparty(_))
        ));
    }

    #[test]
    fn test_counterpart_line_carries_person_tag() {
        let event = make_event(MovementDirection::In);
        let request = cash_movement_posting(&event).unwrap();
        assert_eq!(request.lines[1].person_id, event.person_id);
    }
}

//! Balance validation for posting requests.

use rust_decimal::Decimal;

use super::error::{LedgerError, LineIssue};
use super::types::PostingRequest;

/// Validates a posting request before it is persisted.
///
/// Rules:
/// - the request must have at least one line;
/// - every line must have exactly one of debit/credit nonzero, and no
///   negative amounts;
/// - the debit total must equal the credit total, exactly. Ledger balance
///   is an exact `Decimal` equality, not a tolerance check.
///
/// # Errors
///
/// Returns a [`LedgerError`] describing the first violation found.
pub fn validate_posting(request: &PostingRequest) -> Result<(), LedgerError> {
    if request.lines.is_empty() {
        return Err(LedgerError::EmptyEntry);
    }

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;

    for (index, line) in request.lines.iter().enumerate() {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::InvalidLine {
                index,
                issue: LineIssue::NegativeAmount,
            });
        }
        match (line.debit > Decimal::ZERO, line.credit > Decimal::ZERO) {
            (true, true) => {
                return Err(LedgerError::InvalidLine {
                    index,
                    issue: LineIssue::BothSides,
                });
            }
            (false, false) => {
                return Err(LedgerError::InvalidLine {
                    index,
                    issue: LineIssue::NeitherSide,
                });
            }
            _ => {}
        }
        debits += line.debit;
        credits += line.credit;
    }

    if debits != credits {
        return Err(LedgerError::Unbalanced { debits, credits });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{EntryKind, PostingLine};
    use balanza_shared::types::AccountId;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn make_request(lines: Vec<PostingLine>) -> PostingRequest {
        PostingRequest {
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            description: "Test posting".to_string(),
            kind: EntryKind::Adjustment,
            source: None,
            lines,
        }
    }

    #[test]
    fn test_balanced_request() {
        let account = AccountId::new();
        let request = make_request(vec![
            PostingLine::debit(account, dec!(100.00)),
            PostingLine::credit(account, dec!(100.00)),
        ]);
        assert!(validate_posting(&request).is_ok());
    }

    #[test]
    fn test_unbalanced_request() {
        let account = AccountId::new();
        let request = make_request(vec![
            PostingLine::debit(account, dec!(100.00)),
            PostingLine::credit(account, dec!(50.00)),
        ]);
        assert!(matches!(
            validate_posting(&request),
            Err(LedgerError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_empty_request() {
        let request = make_request(vec![]);
        assert!(matches!(
            validate_posting(&request),
            Err(LedgerError::EmptyEntry)
        ));
    }

    #[test]
    fn test_line_with_both_sides() {
        let account = AccountId::new();
        let mut bad = PostingLine::debit(account, dec!(100.00));
        bad.credit = dec!(100.00);
        let request = make_request(vec![bad, PostingLine::credit(account, dec!(100.00))]);
        assert!(matches!(
            validate_posting(&request),
            Err(LedgerError::InvalidLine {
                index: 0,
                issue: LineIssue::BothSides
            })
        ));
    }

    #[test]
    fn test_line_with_neither_side() {
        let account = AccountId::new();
        let request = make_request(vec![
            PostingLine::debit(account, dec!(100.00)),
            PostingLine::credit(account, Decimal::ZERO),
        ]);
        assert!(matches!(
            validate_posting(&request),
            Err(LedgerError::InvalidLine {
                index: 1,
                issue: LineIssue::NeitherSide
            })
        ));
    }

    #[test]
    fn test_negative_amount() {
        let account = AccountId::new();
        let request = make_request(vec![
            PostingLine::debit(account, dec!(-100.00)),
            PostingLine::credit(account, dec!(100.00)),
        ]);
        assert!(matches!(
            validate_posting(&request),
            Err(LedgerError::InvalidLine {
                index: 0,
                issue: LineIssue::NegativeAmount
            })
        ));
    }

    /// No tolerance: a one-cent difference is unbalanced.
    #[test]
    fn test_exact_equality_no_tolerance() {
        let account = AccountId::new();
        let request = make_request(vec![
            PostingLine::debit(account, dec!(100.00)),
            PostingLine::credit(account, dec!(100.01)),
        ]);
        assert!(matches!(
            validate_posting(&request),
            Err(LedgerError::Unbalanced { .. })
        ));
    }
}

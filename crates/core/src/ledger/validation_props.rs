//! Property-based tests for posting validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryKind, PostingLine, PostingRequest};
use super::validation::validate_posting;
use balanza_shared::types::AccountId;
use chrono::NaiveDate;

/// Strategy to generate a valid positive amount (> 0), two decimal places.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a list of 1..=8 positive amounts.
fn amount_list() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(positive_amount(), 1..=8)
}

fn make_request(lines: Vec<PostingLine>) -> PostingRequest {
    PostingRequest {
        date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        description: "prop".to_string(),
        kind: EntryKind::Adjustment,
        source: None,
        lines,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any set of debit amounts mirrored by a single balancing credit is
    /// accepted, and the computed totals are equal.
    #[test]
    fn prop_balanced_requests_accepted(amounts in amount_list()) {
        let account = AccountId::new();
        let total: Decimal = amounts.iter().copied().sum();

        let mut lines: Vec<PostingLine> = amounts
            .iter()
            .map(|&a| PostingLine::debit(account, a))
            .collect();
        lines.push(PostingLine::credit(account, total));

        let request = make_request(lines);
        prop_assert!(validate_posting(&request).is_ok());

        let (debits, credits) = request.totals();
        prop_assert_eq!(debits, credits);
    }

    /// Perturbing the credit side by any nonzero amount makes the request
    /// unbalanced, no matter how small the perturbation.
    #[test]
    fn prop_unbalanced_requests_rejected(
        amounts in amount_list(),
        skew_cents in 1i64..10_000i64,
    ) {
        let account = AccountId::new();
        let total: Decimal = amounts.iter().copied().sum();
        let skew = Decimal::new(skew_cents, 2);

        let mut lines: Vec<PostingLine> = amounts
            .iter()
            .map(|&a| PostingLine::debit(account, a))
            .collect();
        lines.push(PostingLine::credit(account, total + skew));

        let request = make_request(lines);
        prop_assert!(
            matches!(validate_posting(&request), Err(LedgerError::Unbalanced { .. })),
            "skewed request should be rejected"
        );
    }

    /// A line carrying both a debit and a credit is always rejected, even
    /// when the request as a whole would balance.
    #[test]
    fn prop_two_sided_line_rejected(amount in positive_amount()) {
        let account = AccountId::new();
        let mut two_sided = PostingLine::debit(account, amount);
        two_sided.credit = amount;

        let request = make_request(vec![two_sided]);
        prop_assert!(matches!(
            validate_posting(&request),
            Err(LedgerError::InvalidLine { .. })
        ));
    }

    /// Negative amounts are always rejected.
    #[test]
    fn prop_negative_amount_rejected(amount in positive_amount()) {
        let account = AccountId::new();
        let request = make_request(vec![
            PostingLine::debit(account, -amount),
            PostingLine::credit(account, -amount),
        ]);
        prop_assert!(matches!(
            validate_posting(&request),
            Err(LedgerError::InvalidLine { .. })
        ));
    }
}

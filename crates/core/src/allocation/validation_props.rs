//! Property-based tests for allocation validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::AllocationError;
use super::types::{AllocationLine, DocumentBalance};
use super::validation::validate_allocations;
use balanza_shared::types::DocumentId;

/// Strategy for positive cent amounts up to 1,000,000.00.
fn positive_cents() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A list of positive allocations fully covered by document balances
    /// and summing exactly to the transaction amount always validates.
    #[test]
    fn prop_exact_sum_accepted(cents in prop::collection::vec(positive_cents(), 1..=6)) {
        let allocations: Vec<AllocationLine> = cents
            .iter()
            .map(|&c| AllocationLine {
                document_id: DocumentId::new(),
                amount: Decimal::new(c, 2),
            })
            .collect();
        let balances: Vec<DocumentBalance> = allocations
            .iter()
            .map(|a| DocumentBalance {
                document_id: a.document_id,
                balance: a.amount,
            })
            .collect();
        let total: Decimal = allocations.iter().map(|a| a.amount).sum();

        prop_assert!(validate_allocations(total, &allocations, &balances).is_ok());
    }

    /// Any deviation beyond one cent between the transaction amount and
    /// the allocated total is rejected; one cent or less is accepted.
    #[test]
    fn prop_tolerance_boundary(
        cents in positive_cents(),
        deviation_cents in 0i64..500i64,
    ) {
        let doc = DocumentId::new();
        let amount = Decimal::new(cents, 2);
        let deviation = Decimal::new(deviation_cents, 2);

        let allocations = [AllocationLine { document_id: doc, amount }];
        let balances = [DocumentBalance { document_id: doc, balance: amount }];

        let result = validate_allocations(amount + deviation, &allocations, &balances);
        if deviation_cents <= 1 {
            prop_assert!(result.is_ok(), "deviation {deviation} should be tolerated");
        } else {
            prop_assert!(
                matches!(result, Err(AllocationError::AmountMismatch { .. })),
                "deviation {deviation} should be rejected"
            );
        }
    }

    /// An allocation exceeding its document balance by more than one cent
    /// is always rejected.
    #[test]
    fn prop_balance_cap(
        cents in positive_cents(),
        excess_cents in 2i64..10_000i64,
    ) {
        let doc = DocumentId::new();
        let applied = Decimal::new(cents + excess_cents, 2);

        let allocations = [AllocationLine { document_id: doc, amount: applied }];
        let balances = [DocumentBalance { document_id: doc, balance: Decimal::new(cents, 2) }];

        let result = validate_allocations(applied, &allocations, &balances);
        prop_assert!(matches!(result, Err(AllocationError::ExceedsBalance { .. })));
    }
}

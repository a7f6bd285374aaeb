//! Document balance arithmetic.
//!
//! A document's balance is never incremented in place: it is always
//! recomputed as `total - paid_amount` (clamped at zero), and the paid
//! amount itself is always recomputed as the aggregate over all payment
//! applications. Recompute-from-source keeps repeated edits idempotent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary amounts of a single document item.
#[derive(Debug, Clone, Copy)]
pub struct ItemAmounts {
    /// Net amount before discount and tax.
    pub net: Decimal,
    /// Discount on this item.
    pub discount: Decimal,
    /// Tax on this item.
    pub tax: Decimal,
}

/// Header totals recomputed from a document's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of item nets.
    pub subtotal: Decimal,
    /// Sum of item taxes.
    pub tax_total: Decimal,
    /// Sum of item discounts.
    pub discount: Decimal,
    /// `subtotal - discount + tax_total`.
    pub total: Decimal,
}

impl DocumentTotals {
    /// Recomputes header totals from the item rows.
    #[must_use]
    pub fn from_items(items: &[ItemAmounts]) -> Self {
        let subtotal: Decimal = items.iter().map(|i| i.net).sum();
        let discount: Decimal = items.iter().map(|i| i.discount).sum();
        let tax_total: Decimal = items.iter().map(|i| i.tax).sum();
        Self {
            subtotal,
            tax_total,
            discount,
            total: subtotal - discount + tax_total,
        }
    }
}

/// Recomputes a document's balance from its total and paid amount,
/// clamped at zero.
#[must_use]
pub fn recompute_balance(total: Decimal, paid_amount: Decimal) -> Decimal {
    (total - paid_amount).max(Decimal::ZERO)
}

/// Aggregates the paid amount from all payment applications, floored at
/// zero.
///
/// Used on reallocation and reversal: the paid amount is the sum over all
/// current link rows, never an incremental add, so repeated edits of the
/// same transaction cannot drift it.
#[must_use]
pub fn paid_from_applications(applied: &[Decimal]) -> Decimal {
    let sum: Decimal = applied.iter().copied().sum();
    sum.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_totals_from_items() {
        let items = [
            ItemAmounts {
                net: dec!(60.00),
                discount: dec!(5.00),
                tax: dec!(6.60),
            },
            ItemAmounts {
                net: dec!(40.00),
                discount: dec!(0.00),
                tax: dec!(4.80),
            },
        ];
        let totals = DocumentTotals::from_items(&items);
        assert_eq!(totals.subtotal, dec!(100.00));
        assert_eq!(totals.discount, dec!(5.00));
        assert_eq!(totals.tax_total, dec!(11.40));
        assert_eq!(totals.total, dec!(106.40));
    }

    #[test]
    fn test_totals_of_empty_document_are_zero() {
        let totals = DocumentTotals::from_items(&[]);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_balance_identity() {
        assert_eq!(recompute_balance(dec!(100.00), dec!(30.00)), dec!(70.00));
        assert_eq!(recompute_balance(dec!(100.00), dec!(100.00)), dec!(0.00));
    }

    #[test]
    fn test_balance_clamped_at_zero() {
        assert_eq!(recompute_balance(dec!(100.00), dec!(120.00)), dec!(0.00));
    }

    #[test]
    fn test_paid_aggregation() {
        assert_eq!(
            paid_from_applications(&[dec!(30.00), dec!(20.00)]),
            dec!(50.00)
        );
        assert_eq!(paid_from_applications(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_paid_floored_at_zero() {
        assert_eq!(
            paid_from_applications(&[dec!(30.00), dec!(-40.00)]),
            Decimal::ZERO
        );
    }
}

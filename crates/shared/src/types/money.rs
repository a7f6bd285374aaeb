//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary fields in the system are `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Absolute tolerance used when matching a transaction amount against the
/// sum of its document allocations.
///
/// This is the single place in the system where two monetary amounts are
/// compared with a tolerance instead of exact equality; ledger balance
/// checks are always exact.
pub const ALLOCATION_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds a monetary amount to 2 decimal places using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if two amounts match within [`ALLOCATION_TOLERANCE`].
#[must_use]
pub fn amounts_match(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= ALLOCATION_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_is_one_cent() {
        assert_eq!(ALLOCATION_TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_round_money_bankers() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.00));
        assert_eq!(round_money(dec!(1.015)), dec!(1.02));
        assert_eq!(round_money(dec!(1.014)), dec!(1.01));
    }

    #[test]
    fn test_amounts_match_within_tolerance() {
        assert!(amounts_match(dec!(100.00), dec!(100.00)));
        assert!(amounts_match(dec!(100.00), dec!(100.01)));
        assert!(amounts_match(dec!(100.01), dec!(100.00)));
        assert!(!amounts_match(dec!(100.00), dec!(100.02)));
        assert!(!amounts_match(dec!(100.00), dec!(99.98)));
    }
}

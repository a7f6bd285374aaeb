//! Allocation validation.

use rust_decimal::Decimal;

use balanza_shared::types::money::{ALLOCATION_TOLERANCE, amounts_match};

use super::error::AllocationError;
use super::types::{AllocationLine, DocumentBalance};

/// Validates an allocation list against a transaction amount and the
/// current balances of the target documents.
///
/// Rules:
/// - the list must be non-empty and every amount positive;
/// - the allocation total must match the transaction amount within the
///   0.01 tolerance;
/// - no single allocation may exceed its document's current balance by
///   more than the same tolerance.
///
/// `balances` is the read-state of every referenced document; a document
/// missing from it is reported as not found.
///
/// # Errors
///
/// Returns the first [`AllocationError`] found; nothing is applied on error.
pub fn validate_allocations(
    amount: Decimal,
    allocations: &[AllocationLine],
    balances: &[DocumentBalance],
) -> Result<(), AllocationError> {
    if allocations.is_empty() {
        return Err(AllocationError::EmptyAllocation);
    }

    let mut allocated = Decimal::ZERO;
    for line in allocations {
        if line.amount <= Decimal::ZERO {
            return Err(AllocationError::NonPositiveAllocation(line.document_id));
        }
        allocated += line.amount;
    }

    if !amounts_match(allocated, amount) {
        return Err(AllocationError::AmountMismatch { amount, allocated });
    }

    for line in allocations {
        let balance = balances
            .iter()
            .find(|b| b.document_id == line.document_id)
            .ok_or(AllocationError::DocumentNotFound(line.document_id))?;

        if line.amount > balance.balance + ALLOCATION_TOLERANCE {
            return Err(AllocationError::ExceedsBalance {
                document: line.document_id,
                balance: balance.balance,
                applied: line.amount,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use balanza_shared::types::DocumentId;
    use rust_decimal_macros::dec;

    fn line(document_id: DocumentId, amount: Decimal) -> AllocationLine {
        AllocationLine {
            document_id,
            amount,
        }
    }

    fn balance(document_id: DocumentId, amount: Decimal) -> DocumentBalance {
        DocumentBalance {
            document_id,
            balance: amount,
        }
    }

    #[test]
    fn test_exact_match_accepted() {
        let doc = DocumentId::new();
        let result = validate_allocations(
            dec!(100.00),
            &[line(doc, dec!(100.00))],
            &[balance(doc, dec!(150.00))],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_one_cent_difference_accepted() {
        let doc = DocumentId::new();
        let result = validate_allocations(
            dec!(100.00),
            &[line(doc, dec!(99.99))],
            &[balance(doc, dec!(150.00))],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_two_cent_difference_rejected() {
        let doc = DocumentId::new();
        let result = validate_allocations(
            dec!(100.00),
            &[line(doc, dec!(99.98))],
            &[balance(doc, dec!(150.00))],
        );
        assert!(matches!(
            result,
            Err(AllocationError::AmountMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_allocation_rejected() {
        let result = validate_allocations(dec!(100.00), &[], &[]);
        assert!(matches!(result, Err(AllocationError::EmptyAllocation)));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let doc = DocumentId::new();
        let result = validate_allocations(
            dec!(0.00),
            &[line(doc, dec!(0.00))],
            &[balance(doc, dec!(10.00))],
        );
        assert!(matches!(
            result,
            Err(AllocationError::NonPositiveAllocation(_))
        ));
    }

    #[test]
    fn test_unknown_document_rejected() {
        let doc = DocumentId::new();
        let result = validate_allocations(dec!(50.00), &[line(doc, dec!(50.00))], &[]);
        assert!(matches!(result, Err(AllocationError::DocumentNotFound(_))));
    }

    #[test]
    fn test_over_balance_rejected() {
        let doc = DocumentId::new();
        let result = validate_allocations(
            dec!(50.00),
            &[line(doc, dec!(50.00))],
            &[balance(doc, dec!(49.00))],
        );
        assert!(matches!(result, Err(AllocationError::ExceedsBalance { .. })));
    }

    #[test]
    fn test_over_balance_within_tolerance_accepted() {
        let doc = DocumentId::new();
        let result = validate_allocations(
            dec!(50.00),
            &[line(doc, dec!(50.00))],
            &[balance(doc, dec!(49.99))],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_split_across_documents() {
        let a = DocumentId::new();
        let b = DocumentId::new();
        let result = validate_allocations(
            dec!(100.00),
            &[line(a, dec!(60.00)), line(b, dec!(40.00))],
            &[balance(a, dec!(60.00)), balance(b, dec!(45.00))],
        );
        assert!(result.is_ok());
    }
}

//! Ledger error types for posting validation.

use rust_decimal::Decimal;
use thiserror::Error;

/// What is wrong with a single posting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineIssue {
    /// Both debit and credit are nonzero.
    BothSides,
    /// Neither debit nor credit is nonzero.
    NeitherSide,
    /// A negative amount was supplied.
    NegativeAmount,
}

impl std::fmt::Display for LineIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BothSides => write!(f, "line has both debit and credit set"),
            Self::NeitherSide => write!(f, "line has neither debit nor credit set"),
            Self::NegativeAmount => write!(f, "line has a negative amount"),
        }
    }
}

/// Errors raised by posting validation.
///
/// All of these are detected before any write; a request that fails here
/// is never partially applied.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Posting request has no lines.
    #[error("Journal entry must have at least one line")]
    EmptyEntry,

    /// A line is malformed (both/neither side set, or negative amount).
    #[error("Invalid journal line {index}: {issue}")]
    InvalidLine {
        /// Zero-based index of the offending line.
        index: usize,
        /// What is wrong with it.
        issue: LineIssue,
    },

    /// Debit and credit totals differ.
    #[error("Journal entry is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::InvalidLine { .. } => "INVALID_LINE",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::EmptyEntry.error_code(), "EMPTY_ENTRY");
        assert_eq!(
            LedgerError::InvalidLine {
                index: 0,
                issue: LineIssue::BothSides
            }
            .error_code(),
            "INVALID_LINE"
        );
        assert_eq!(
            LedgerError::Unbalanced {
                debits: dec!(100),
                credits: dec!(50)
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::Unbalanced {
            debits: dec!(100.00),
            credits: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is unbalanced: debits (100.00) != credits (50.00)"
        );

        let err = LedgerError::InvalidLine {
            index: 2,
            issue: LineIssue::NeitherSide,
        };
        assert_eq!(
            err.to_string(),
            "Invalid journal line 2: line has neither debit nor credit set"
        );
    }
}

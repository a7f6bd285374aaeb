//! Fiscal authorization status.

use serde::{Deserialize, Serialize};

/// Authorization state of a fiscal document at the SRI.
///
/// A document starts in `Draft` (signing is folded into `Draft`: the
/// status does not change when the XML is signed, only the access key and
/// signed-XML artifacts appear). It then moves through transmission and
/// polling to one of the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SriStatus {
    /// Not yet transmitted (signed or unsigned).
    Draft,
    /// Transmission attempted but the reply was ambiguous; kept for retry.
    Sent,
    /// Accepted by the authority's reception service.
    Received,
    /// Reception accepted, authorization not yet produced.
    InProcess,
    /// Authorized (terminal, success).
    Authorized,
    /// Rejected (terminal for this cycle; a new cycle needs regeneration).
    Rejected,
}

impl SriStatus {
    /// Returns true for states that end a cycle.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Authorized | Self::Rejected)
    }

    /// Returns the storage representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Received => "received",
            Self::InProcess => "in_process",
            Self::Authorized => "authorized",
            Self::Rejected => "rejected",
        }
    }

    /// Check if a status transition is legal.
    ///
    /// Valid transitions:
    /// - Draft → Sent | Received | Rejected (transmission outcome)
    /// - Sent → Sent | Received | Rejected (retried transmission)
    /// - Received → InProcess | Authorized | Rejected (authorization query)
    /// - InProcess → InProcess | Authorized | Rejected (re-poll)
    /// - Rejected → Draft (explicit regeneration only)
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft | Self::Sent, Self::Sent | Self::Received | Self::Rejected)
                | (
                    Self::Received | Self::InProcess,
                    Self::InProcess | Self::Authorized | Self::Rejected
                )
                | (Self::Rejected, Self::Draft)
        )
    }
}

impl std::fmt::Display for SriStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SriStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "received" => Ok(Self::Received),
            "in_process" => Ok(Self::InProcess),
            "authorized" => Ok(Self::Authorized),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("Unknown fiscal status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn test_terminal_states() {
        assert!(SriStatus::Authorized.is_terminal());
        assert!(SriStatus::Rejected.is_terminal());
        assert!(!SriStatus::Draft.is_terminal());
        assert!(!SriStatus::Sent.is_terminal());
        assert!(!SriStatus::Received.is_terminal());
        assert!(!SriStatus::InProcess.is_terminal());
    }

    #[rstest]
    // Transmission outcomes
    #[case(SriStatus::Draft, SriStatus::Sent, true)]
    #[case(SriStatus::Draft, SriStatus::Received, true)]
    #[case(SriStatus::Draft, SriStatus::Rejected, true)]
    #[case(SriStatus::Draft, SriStatus::Authorized, false)]
    #[case(SriStatus::Sent, SriStatus::Received, true)]
    #[case(SriStatus::Sent, SriStatus::Sent, true)]
    // Authorization-query outcomes
    #[case(SriStatus::Received, SriStatus::Authorized, true)]
    #[case(SriStatus::Received, SriStatus::InProcess, true)]
    #[case(SriStatus::InProcess, SriStatus::Authorized, true)]
    #[case(SriStatus::InProcess, SriStatus::Rejected, true)]
    #[case(SriStatus::InProcess, SriStatus::InProcess, true)]
    #[case(SriStatus::InProcess, SriStatus::Sent, false)]
    // Terminal states only leave via explicit regeneration
    #[case(SriStatus::Rejected, SriStatus::Draft, true)]
    #[case(SriStatus::Rejected, SriStatus::Sent, false)]
    #[case(SriStatus::Authorized, SriStatus::Draft, false)]
    #[case(SriStatus::Authorized, SriStatus::Rejected, false)]
    fn test_transition_matrix(
        #[case] from: SriStatus,
        #[case] to: SriStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn test_roundtrip_through_storage_representation() {
        for status in [
            SriStatus::Draft,
            SriStatus::Sent,
            SriStatus::Received,
            SriStatus::InProcess,
            SriStatus::Authorized,
            SriStatus::Rejected,
        ] {
            assert_eq!(SriStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(SriStatus::from_str("bogus").is_err());
    }
}

//! Authority reply types and parsing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::SriStatus;

/// Raw reply from the authority's reception (transmission) service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmissionReply {
    /// Whether the reception service accepted the document.
    pub accepted: bool,
    /// The authority's status word (e.g. `RECIBIDA`, `DEVUELTA`).
    pub status: String,
    /// Raw response payload, stored for audit and manual retry.
    pub raw: String,
}

/// The authority's decision on an authorization query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityDecision {
    /// Document authorized.
    Authorized,
    /// Document rejected.
    Rejected,
    /// Still being processed.
    InProcess,
    /// No result available yet for this access key.
    NotAvailable,
}

/// Raw reply from the authority's authorization-query service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityReply {
    /// The authority's status word (e.g. `AUTORIZADO`, `NO AUTORIZADO`,
    /// `EN PROCESO`).
    pub status: String,
    /// Authorization number, present when authorized.
    pub authorization_number: Option<String>,
    /// Authorization timestamp, present when authorized.
    pub authorization_date: Option<DateTime<Utc>>,
    /// Raw response payload, stored for audit.
    pub raw: String,
}

/// Result of one `advance` invocation, surfaced to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceOutcome {
    /// Status after the invocation.
    pub status: SriStatus,
    /// Authorization number, once authorized.
    pub authorization_number: Option<String>,
    /// Authorization timestamp, once authorized.
    pub authorization_date: Option<DateTime<Utc>>,
}

/// Maps a reception reply onto the status the document moves to.
///
/// `RECIBIDA` means accepted, `DEVUELTA` means returned/rejected; anything
/// else is ambiguous and the document stays retryable in `Sent`.
#[must_use]
pub fn transmission_status(reply: &TransmissionReply) -> SriStatus {
    let word = reply.status.trim().to_uppercase();
    if reply.accepted || word == "RECIBIDA" {
        SriStatus::Received
    } else if word == "DEVUELTA" {
        SriStatus::Rejected
    } else {
        SriStatus::Sent
    }
}

/// Maps an authorization-query reply onto the authority's decision.
#[must_use]
pub fn authority_decision(reply: &AuthorityReply) -> AuthorityDecision {
    match reply.status.trim().to_uppercase().as_str() {
        "AUTORIZADO" => AuthorityDecision::Authorized,
        "NO AUTORIZADO" | "RECHAZADA" => AuthorityDecision::Rejected,
        "EN PROCESO" | "EN PROCESAMIENTO" | "PPR" => AuthorityDecision::InProcess,
        _ => AuthorityDecision::NotAvailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(accepted: bool, status: &str) -> TransmissionReply {
        TransmissionReply {
            accepted,
            status: status.to_string(),
            raw: format!("<estado>{status}</estado>"),
        }
    }

    fn query(status: &str) -> AuthorityReply {
        AuthorityReply {
            status: status.to_string(),
            authorization_number: None,
            authorization_date: None,
            raw: format!("<estado>{status}</estado>"),
        }
    }

    #[test]
    fn test_accepted_transmission_is_received() {
        assert_eq!(
            transmission_status(&reply(true, "RECIBIDA")),
            SriStatus::Received
        );
        // Some transports only surface the status word.
        assert_eq!(
            transmission_status(&reply(false, "recibida")),
            SriStatus::Received
        );
    }

    #[test]
    fn test_returned_transmission_is_rejected() {
        assert_eq!(
            transmission_status(&reply(false, "DEVUELTA")),
            SriStatus::Rejected
        );
    }

    #[test]
    fn test_ambiguous_transmission_stays_sent() {
        assert_eq!(transmission_status(&reply(false, "")), SriStatus::Sent);
        assert_eq!(
            transmission_status(&reply(false, "TIMEOUT")),
            SriStatus::Sent
        );
    }

    #[test]
    fn test_authorization_decisions() {
        assert_eq!(
            authority_decision(&query("AUTORIZADO")),
            AuthorityDecision::Authorized
        );
        assert_eq!(
            authority_decision(&query("NO AUTORIZADO")),
            AuthorityDecision::Rejected
        );
        assert_eq!(
            authority_decision(&query("RECHAZADA")),
            AuthorityDecision::Rejected
        );
        assert_eq!(
            authority_decision(&query("EN PROCESO")),
            AuthorityDecision::InProcess
        );
        assert_eq!(
            authority_decision(&query("PPR")),
            AuthorityDecision::InProcess
        );
        assert_eq!(
            authority_decision(&query("")),
            AuthorityDecision::NotAvailable
        );
    }
}

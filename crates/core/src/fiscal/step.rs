//! Pipeline step derivation.

use super::status::SriStatus;

/// What the pipeline should do next for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    /// Generate the XML and sign it (produces access key + signed XML).
    Sign,
    /// Transmit the signed XML to the authority's reception service.
    Transmit,
    /// Query the authority for the final authorization.
    QueryAuthorization,
    /// Nothing to do: the document is authorized.
    Finished,
    /// The cycle ended in rejection; an explicit regeneration is required
    /// before anything else can happen.
    RequiresRegeneration,
}

/// The durable facts the next step is derived from.
///
/// The pipeline never plans ahead in memory: after every external call it
/// re-reads this snapshot from storage and derives the next step again,
/// so a crash between steps resumes exactly where the durable state says.
#[derive(Debug, Clone, Copy)]
pub struct FiscalSnapshot {
    /// Current authorization status.
    pub status: SriStatus,
    /// Whether an access key has been extracted and stored.
    pub has_access_key: bool,
    /// Whether the signed XML has been stored.
    pub has_signed_xml: bool,
}

/// Derives the next pipeline step from durable state.
///
/// A step whose output already exists is never selected again: a `Draft`
/// document that already has its access key and signed XML skips signing
/// and goes straight to transmission.
#[must_use]
pub const fn next_step(snapshot: &FiscalSnapshot) -> PipelineStep {
    match snapshot.status {
        SriStatus::Authorized => PipelineStep::Finished,
        SriStatus::Rejected => PipelineStep::RequiresRegeneration,
        SriStatus::Draft | SriStatus::Sent => {
            if snapshot.has_access_key && snapshot.has_signed_xml {
                PipelineStep::Transmit
            } else {
                PipelineStep::Sign
            }
        }
        SriStatus::Received | SriStatus::InProcess => PipelineStep::QueryAuthorization,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn snapshot(status: SriStatus, key: bool, xml: bool) -> FiscalSnapshot {
        FiscalSnapshot {
            status,
            has_access_key: key,
            has_signed_xml: xml,
        }
    }

    #[test]
    fn test_unsigned_draft_signs_first() {
        assert_eq!(
            next_step(&snapshot(SriStatus::Draft, false, false)),
            PipelineStep::Sign
        );
    }

    /// A stored access key with status still Draft means signing already
    /// completed: the sign step is skipped.
    #[test]
    fn test_signed_draft_skips_sign() {
        assert_eq!(
            next_step(&snapshot(SriStatus::Draft, true, true)),
            PipelineStep::Transmit
        );
    }

    /// Access key stored but signed XML missing (partial sign output):
    /// re-run the sign step rather than transmitting garbage.
    #[test]
    fn test_partial_sign_output_re_signs() {
        assert_eq!(
            next_step(&snapshot(SriStatus::Draft, true, false)),
            PipelineStep::Sign
        );
    }

    #[test]
    fn test_ambiguous_sent_retries_transmission() {
        assert_eq!(
            next_step(&snapshot(SriStatus::Sent, true, true)),
            PipelineStep::Transmit
        );
    }

    #[test]
    fn test_received_and_in_process_poll() {
        assert_eq!(
            next_step(&snapshot(SriStatus::Received, true, true)),
            PipelineStep::QueryAuthorization
        );
        assert_eq!(
            next_step(&snapshot(SriStatus::InProcess, true, true)),
            PipelineStep::QueryAuthorization
        );
    }

    #[test]
    fn test_terminal_states() {
        assert_eq!(
            next_step(&snapshot(SriStatus::Authorized, true, true)),
            PipelineStep::Finished
        );
        assert_eq!(
            next_step(&snapshot(SriStatus::Rejected, true, true)),
            PipelineStep::RequiresRegeneration
        );
    }
}

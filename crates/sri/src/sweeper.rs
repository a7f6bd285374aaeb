//! Retry sweeper for in-process documents.
//!
//! The authority can sit on a document for minutes or hours; the sweeper
//! re-polls every record stuck in `in_process`, across all tenants. Each
//! document is an independent unit of work: a failure on one is logged
//! and recorded, never allowed to abort the sweep for the rest.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use balanza_core::fiscal::{AdvanceOutcome, FiscalError, SriStatus};
use balanza_db::repositories::fiscal::{FiscalInfoError, FiscalInfoRepository};

use crate::pipeline::{FiscalPipeline, PipelineError};
use crate::ports::{AuthorityClient, DigitalSigner, XmlBuilder};

/// Result of one document in a sweep.
#[derive(Debug)]
pub struct SweepOutcome {
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// The document.
    pub document_id: Uuid,
    /// Status after the poll, when the poll produced one.
    pub status: Option<SriStatus>,
    /// Error text, when the poll failed (pending counts as still
    /// in-process, not as an error).
    pub error: Option<String>,
}

/// Aggregate result of a sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Per-document outcomes, in processing order.
    pub outcomes: Vec<SweepOutcome>,
    /// How many documents reached `authorized` this sweep.
    pub authorized: usize,
    /// How many documents reached `rejected` this sweep.
    pub rejected: usize,
    /// How many are still pending.
    pub still_pending: usize,
    /// How many failed with a real error.
    pub failed: usize,
}

/// Background sweeper re-polling pending authorizations.
pub struct RetrySweeper<S, A, X> {
    pipeline: Arc<FiscalPipeline<S, A, X>>,
    fiscal: FiscalInfoRepository,
}

impl<S, A, X> RetrySweeper<S, A, X>
where
    S: DigitalSigner,
    A: AuthorityClient,
    X: XmlBuilder,
{
    /// Creates a sweeper over a pipeline and a fiscal repository.
    pub const fn new(pipeline: Arc<FiscalPipeline<S, A, X>>, fiscal: FiscalInfoRepository) -> Self {
        Self { pipeline, fiscal }
    }

    /// Re-polls every in-process document across all tenants.
    ///
    /// Only the authorization-query step runs per document (signing and
    /// transmission already succeeded for anything in `in_process`).
    ///
    /// # Errors
    ///
    /// Returns an error only if the in-process listing itself fails;
    /// per-document failures are isolated into the report.
    pub async fn sweep_pending(&self) -> Result<SweepReport, FiscalInfoError> {
        let records = self.fiscal.list_in_process().await?;
        info!(count = records.len(), "sweeping pending authorizations");

        let items: Vec<(Uuid, Uuid)> = records
            .iter()
            .map(|r| (r.tenant_id, r.document_id))
            .collect();

        let report = sweep_records(items, |tenant_id, document_id| {
            let pipeline = Arc::clone(&self.pipeline);
            async move { pipeline.poll_authorization(tenant_id, document_id).await }
        })
        .await;

        info!(
            authorized = report.authorized,
            rejected = report.rejected,
            still_pending = report.still_pending,
            failed = report.failed,
            "sweep finished"
        );
        Ok(report)
    }
}

/// Runs the poll handler over every record, isolating failures.
///
/// Factored out of [`RetrySweeper`] so the isolate-and-continue behavior
/// is testable without a database.
pub async fn sweep_records<F, Fut>(items: Vec<(Uuid, Uuid)>, handler: F) -> SweepReport
where
    F: Fn(Uuid, Uuid) -> Fut,
    Fut: Future<Output = Result<AdvanceOutcome, PipelineError>>,
{
    let mut report = SweepReport::default();

    for (tenant_id, document_id) in items {
        let outcome = handler(tenant_id, document_id).await;
        match outcome {
            Ok(result) => {
                match result.status {
                    SriStatus::Authorized => report.authorized += 1,
                    SriStatus::Rejected => report.rejected += 1,
                    _ => report.still_pending += 1,
                }
                report.outcomes.push(SweepOutcome {
                    tenant_id,
                    document_id,
                    status: Some(result.status),
                    error: None,
                });
            }
            Err(PipelineError::Fiscal(FiscalError::AuthorizationPending)) => {
                report.still_pending += 1;
                report.outcomes.push(SweepOutcome {
                    tenant_id,
                    document_id,
                    status: Some(SriStatus::InProcess),
                    error: None,
                });
            }
            Err(e) => {
                warn!(
                    tenant_id = %tenant_id,
                    document_id = %document_id,
                    error = %e,
                    "sweep failed for document, continuing"
                );
                report.failed += 1;
                report.outcomes.push(SweepOutcome {
                    tenant_id,
                    document_id,
                    status: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use balanza_db::repositories::fiscal::FiscalInfoError;

    fn outcome(status: SriStatus) -> AdvanceOutcome {
        AdvanceOutcome {
            status,
            authorization_number: None,
            authorization_date: None,
        }
    }

    /// A failing document must not abort processing of later documents.
    #[tokio::test]
    async fn test_failure_is_isolated() {
        let failing = Uuid::new_v4();
        let items: Vec<(Uuid, Uuid)> = vec![
            (Uuid::new_v4(), Uuid::new_v4()),
            (Uuid::new_v4(), failing),
            (Uuid::new_v4(), Uuid::new_v4()),
        ];

        let report = sweep_records(items, |_tenant, document| async move {
            if document == failing {
                Err(PipelineError::FiscalInfo(FiscalInfoError::NotFound(document)))
            } else {
                Ok(outcome(SriStatus::Authorized))
            }
        })
        .await;

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.authorized, 2);
        assert_eq!(report.failed, 1);
        assert!(report.outcomes[1].error.is_some());
        assert!(report.outcomes[2].error.is_none());
    }

    /// Pending authorizations are normal, not failures.
    #[tokio::test]
    async fn test_pending_counts_as_pending() {
        let items = vec![(Uuid::new_v4(), Uuid::new_v4())];
        let report = sweep_records(items, |_t, _d| async {
            Err(PipelineError::Fiscal(FiscalError::AuthorizationPending))
        })
        .await;

        assert_eq!(report.still_pending, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.outcomes[0].status, Some(SriStatus::InProcess));
    }

    #[tokio::test]
    async fn test_mixed_terminal_outcomes() {
        let rejected = Uuid::new_v4();
        let items = vec![
            (Uuid::new_v4(), Uuid::new_v4()),
            (Uuid::new_v4(), rejected),
        ];

        let report = sweep_records(items, |_tenant, document| async move {
            if document == rejected {
                Ok(outcome(SriStatus::Rejected))
            } else {
                Ok(outcome(SriStatus::Authorized))
            }
        })
        .await;

        assert_eq!(report.authorized, 1);
        assert_eq!(report.rejected, 1);
    }
}

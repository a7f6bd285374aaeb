//! The authorization pipeline.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use tracing::{info, warn};
use uuid::Uuid;

use balanza_core::fiscal::{
    AdvanceOutcome, AuthorityDecision, FiscalError, FiscalSnapshot, PipelineStep, SriStatus,
    authority_decision, next_step, transmission_status,
};
use balanza_core::storage::{StorageError, StorageService};
use balanza_db::entities::{document_fiscal_infos, tenants};
use balanza_db::repositories::document::DocumentError;
use balanza_db::repositories::fiscal::{FiscalInfoError, FiscalInfoRepository};
use balanza_db::repositories::DocumentRepository;
use balanza_shared::config::SriConfig;
use balanza_shared::types::TenantId;

use crate::ports::{AuthorityClient, DigitalSigner, DocumentXmlContext, SignerError, XmlBuilder};

/// Errors raised by the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A fiscal-domain failure surfaced to the caller (retryable or
    /// configuration, see [`FiscalError::is_retryable`]).
    #[error(transparent)]
    Fiscal(#[from] FiscalError),

    /// Fiscal record persistence failed.
    #[error(transparent)]
    FiscalInfo(#[from] FiscalInfoError),

    /// Document status update failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Tenant not found.
    #[error("Tenant not found: {0}")]
    TenantNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StorageError> for PipelineError {
    fn from(err: StorageError) -> Self {
        Self::Fiscal(FiscalError::Storage(err.to_string()))
    }
}

/// Fiscal authorization pipeline, generic over the collaborator ports.
pub struct FiscalPipeline<S, A, X> {
    db: DatabaseConnection,
    fiscal: FiscalInfoRepository,
    storage: Arc<StorageService>,
    signer: S,
    authority: A,
    xml_builder: X,
    config: SriConfig,
}

impl<S, A, X> FiscalPipeline<S, A, X>
where
    S: DigitalSigner,
    A: AuthorityClient,
    X: XmlBuilder,
{
    /// Creates a pipeline over the given collaborators.
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<StorageService>,
        signer: S,
        authority: A,
        xml_builder: X,
        config: SriConfig,
    ) -> Self {
        let fiscal = FiscalInfoRepository::new(db.clone());
        Self {
            db,
            fiscal,
            storage,
            signer,
            authority,
            xml_builder,
            config,
        }
    }

    /// Advances a document as far as it can go in one invocation.
    ///
    /// Safe to call repeatedly: the next step is always re-derived from
    /// the durable fiscal record, a step whose output is already stored is
    /// never re-run, and every status transition is persisted before this
    /// function returns, even on failure paths.
    ///
    /// # Errors
    ///
    /// - [`FiscalError::AuthorizationPending`] when the authority has not
    ///   produced a result yet (expected; retry later or let the sweeper).
    /// - [`FiscalError::Rejected`] when called again after a rejection.
    /// - Configuration and external-system errors per [`FiscalError`].
    pub async fn advance(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
    ) -> Result<AdvanceOutcome, PipelineError> {
        loop {
            let info = self.fiscal.find_by_document(tenant_id, document_id).await?;
            let snapshot = FiscalSnapshot {
                status: info.sri_status.clone().into(),
                has_access_key: info.access_key.is_some(),
                has_signed_xml: info.signed_xml_key.is_some(),
            };

            match next_step(&snapshot) {
                PipelineStep::Finished => return Ok(Self::outcome_of(&info)),
                PipelineStep::RequiresRegeneration => {
                    return Err(FiscalError::Rejected.into());
                }
                PipelineStep::Sign => {
                    self.sign_step(tenant_id, &info).await?;
                }
                PipelineStep::Transmit => {
                    if let Some(outcome) = self.transmit_step(tenant_id, &info).await? {
                        return Ok(outcome);
                    }
                }
                PipelineStep::QueryAuthorization => {
                    return self.query_step(tenant_id, document_id, &info).await;
                }
            }
        }
    }

    /// Runs only the authorization-query step (used by the retry sweeper,
    /// which assumes signing and transmission already succeeded).
    ///
    /// # Errors
    ///
    /// Same as the query portion of [`FiscalPipeline::advance`].
    pub async fn poll_authorization(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
    ) -> Result<AdvanceOutcome, PipelineError> {
        let info = self.fiscal.find_by_document(tenant_id, document_id).await?;
        match info.sri_status.clone().into() {
            SriStatus::Authorized => Ok(Self::outcome_of(&info)),
            SriStatus::Rejected => Err(FiscalError::Rejected.into()),
            _ => self.query_step(tenant_id, document_id, &info).await,
        }
    }

    /// Generate, sign, and store the XML; persist the access key.
    async fn sign_step(
        &self,
        tenant_id: Uuid,
        info: &document_fiscal_infos::Model,
    ) -> Result<(), PipelineError> {
        let tenant = tenants::Entity::find_by_id(tenant_id)
            .one(&self.db)
            .await?
            .ok_or(PipelineError::TenantNotFound(tenant_id))?;

        let certificate_key = tenant
            .certificate_key
            .as_deref()
            .ok_or(FiscalError::CertificateNotConfigured)?;
        let password = tenant
            .certificate_password
            .as_deref()
            .ok_or(FiscalError::CertificateNotConfigured)?;

        let context = DocumentXmlContext {
            tenant_id,
            document_id: info.document_id,
        };
        let xml = self
            .xml_builder
            .build(&context)
            .await
            .map_err(|e| FiscalError::XmlGeneration(e.to_string()))?;

        let certificate = self.storage.download(certificate_key).await?;

        let signed = tokio::time::timeout(
            Duration::from_secs(self.config.sign_timeout_secs),
            self.signer.sign(&certificate, password, &xml),
        )
        .await
        .map_err(|_| FiscalError::Signing("signing timed out".to_string()))?
        .map_err(|e| match e {
            SignerError::WrongPassword => FiscalError::WrongCertificatePassword,
            SignerError::Failed(msg) => FiscalError::Signing(msg),
        })?;

        let access_key = extract_access_key(&signed)
            .ok_or_else(|| FiscalError::Signing("signed XML carries no access key".to_string()))?;

        let xml_key = StorageService::signed_xml_key(TenantId::from_uuid(tenant_id), &access_key);
        self.storage.upload(&xml_key, signed.into_bytes()).await?;

        self.fiscal
            .record_signing(info.id, &access_key, &xml_key)
            .await?;

        info!(
            document_id = %info.document_id,
            tenant_id = %tenant_id,
            access_key = %access_key,
            "document signed"
        );
        Ok(())
    }

    /// Transmit the signed XML. Returns `Some(outcome)` when the cycle
    /// ends here (rejection), `None` when the pipeline should continue.
    async fn transmit_step(
        &self,
        tenant_id: Uuid,
        info: &document_fiscal_infos::Model,
    ) -> Result<Option<AdvanceOutcome>, PipelineError> {
        let tenant = tenants::Entity::find_by_id(tenant_id)
            .one(&self.db)
            .await?
            .ok_or(PipelineError::TenantNotFound(tenant_id))?;

        let xml_key = info
            .signed_xml_key
            .as_deref()
            .ok_or_else(|| FiscalError::Transmission("signed XML not stored".to_string()))?;
        let signed_xml = self.storage.download(xml_key).await?;

        let reply = tokio::time::timeout(
            Duration::from_secs(self.config.transmit_timeout_secs),
            self.authority.transmit(&signed_xml, tenant.sri_environment),
        )
        .await;

        let reply = match reply {
            Err(_) => {
                // Ambiguous: the document may or may not have arrived.
                // Stay retryable in `sent`.
                self.fiscal
                    .set_status(info.id, SriStatus::Sent, Some("transmission timed out".into()))
                    .await?;
                return Err(FiscalError::Transmission("transmission timed out".to_string()).into());
            }
            Ok(Err(e)) => {
                self.fiscal
                    .set_status(info.id, SriStatus::Sent, Some(e.to_string()))
                    .await?;
                return Err(FiscalError::Transmission(e.to_string()).into());
            }
            Ok(Ok(reply)) => reply,
        };

        let status = transmission_status(&reply);
        let updated = self
            .fiscal
            .set_status(info.id, status, Some(reply.raw.clone()))
            .await?;

        match status {
            SriStatus::Rejected => {
                warn!(
                    document_id = %info.document_id,
                    status = %reply.status,
                    "document returned by reception"
                );
                Ok(Some(Self::outcome_of(&updated)))
            }
            SriStatus::Received => Ok(None),
            _ => Err(FiscalError::Transmission(reply.status).into()),
        }
    }

    /// Query the authority for the final authorization.
    async fn query_step(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
        info: &document_fiscal_infos::Model,
    ) -> Result<AdvanceOutcome, PipelineError> {
        let tenant = tenants::Entity::find_by_id(tenant_id)
            .one(&self.db)
            .await?
            .ok_or(PipelineError::TenantNotFound(tenant_id))?;

        let access_key = info
            .access_key
            .as_deref()
            .ok_or_else(|| FiscalError::Transmission("no access key stored".to_string()))?;

        let reply = tokio::time::timeout(
            Duration::from_secs(self.config.query_timeout_secs),
            self.authority
                .query_authorization(access_key, tenant.sri_environment),
        )
        .await;

        let reply = match reply {
            Err(_) | Ok(Err(_)) => {
                // Not available yet (or unreachable): durable checkpoint,
                // the sweeper will re-poll.
                self.fiscal
                    .set_status(info.id, SriStatus::InProcess, None)
                    .await?;
                return Err(FiscalError::AuthorizationPending.into());
            }
            Ok(Ok(reply)) => reply,
        };

        match authority_decision(&reply) {
            AuthorityDecision::Authorized => {
                let number = reply.authorization_number.clone().unwrap_or_default();
                let date = reply.authorization_date.unwrap_or_else(chrono::Utc::now);
                let updated = self
                    .fiscal
                    .record_authorization(info.id, &number, date, &reply.raw)
                    .await?;
                DocumentRepository::mark_confirmed(&self.db, tenant_id, document_id).await?;
                info!(document_id = %document_id, authorization = %number, "document authorized");
                Ok(Self::outcome_of(&updated))
            }
            AuthorityDecision::Rejected => {
                let updated = self
                    .fiscal
                    .set_status(info.id, SriStatus::Rejected, Some(reply.raw.clone()))
                    .await?;
                warn!(document_id = %document_id, "authorization rejected");
                Ok(Self::outcome_of(&updated))
            }
            AuthorityDecision::InProcess | AuthorityDecision::NotAvailable => {
                self.fiscal
                    .set_status(info.id, SriStatus::InProcess, Some(reply.raw.clone()))
                    .await?;
                Err(FiscalError::AuthorizationPending.into())
            }
        }
    }

    fn outcome_of(info: &document_fiscal_infos::Model) -> AdvanceOutcome {
        AdvanceOutcome {
            status: info.sri_status.clone().into(),
            authorization_number: info.authorization_number.clone(),
            authorization_date: info.authorization_date.map(Into::into),
        }
    }
}

/// Extracts the 49-digit access key from a signed XML document.
///
/// The key appears as `<claveAcceso>...</claveAcceso>`; template details
/// are owned by the XML builder, so a plain scan is all that is needed
/// here.
#[must_use]
pub fn extract_access_key(signed_xml: &str) -> Option<String> {
    let start = signed_xml.find("<claveAcceso>")? + "<claveAcceso>".len();
    let end = signed_xml[start..].find("</claveAcceso>")? + start;
    let key = signed_xml[start..end].trim();
    if key.len() == 49 && key.bytes().all(|b| b.is_ascii_digit()) {
        Some(key.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0502202601179214673900110010010000000011234567813";

    #[test]
    fn test_extract_access_key() {
        let xml = format!("<factura><claveAcceso>{KEY}</claveAcceso></factura>");
        assert_eq!(extract_access_key(&xml).as_deref(), Some(KEY));
    }

    #[test]
    fn test_extract_access_key_trims_whitespace() {
        let xml = format!("<claveAcceso>\n  {KEY}\n</claveAcceso>");
        assert_eq!(extract_access_key(&xml).as_deref(), Some(KEY));
    }

    #[test]
    fn test_extract_access_key_rejects_malformed() {
        assert!(extract_access_key("<factura/>").is_none());
        assert!(extract_access_key("<claveAcceso>123</claveAcceso>").is_none());
        let bad = format!("<claveAcceso>{}</claveAcceso>", "x".repeat(49));
        assert!(extract_access_key(&bad).is_none());
    }
}

//! Fiscal pipeline error types.
//!
//! These are surfaced to the caller; none of them is fatal to the record.
//! The document's stored status plus its accumulated artifacts remain the
//! durable source of truth, so any of these can be retried once the
//! underlying problem is fixed.

use thiserror::Error;

/// Errors raised while advancing a document through authorization.
#[derive(Debug, Error)]
pub enum FiscalError {
    /// The tenant has no digital certificate configured.
    #[error("No digital certificate configured for this tenant")]
    CertificateNotConfigured,

    /// The certificate password is wrong.
    #[error("Certificate password is incorrect")]
    WrongCertificatePassword,

    /// Signing failed for another reason.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// XML generation failed.
    #[error("XML generation failed: {0}")]
    XmlGeneration(String),

    /// Transmission to the authority failed.
    #[error("Transmission failed: {0}")]
    Transmission(String),

    /// The authority has not produced a result yet; retry later.
    ///
    /// This is expected during normal operation, not a failure.
    #[error("Authorization is still pending at the authority")]
    AuthorizationPending,

    /// The document's cycle ended in rejection; regenerate to start a new one.
    #[error("Document was rejected; regenerate before retrying")]
    Rejected,

    /// Blob storage failure while persisting or fetching artifacts.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FiscalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CertificateNotConfigured => "CERTIFICATE_NOT_CONFIGURED",
            Self::WrongCertificatePassword => "WRONG_CERTIFICATE_PASSWORD",
            Self::Signing(_) => "SIGNING_ERROR",
            Self::XmlGeneration(_) => "XML_GENERATION_ERROR",
            Self::Transmission(_) => "TRANSMISSION_ERROR",
            Self::AuthorizationPending => "AUTHORIZATION_PENDING",
            Self::Rejected => "DOCUMENT_REJECTED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // Configuration problems an admin must fix.
            Self::CertificateNotConfigured | Self::WrongCertificatePassword => 422,
            // Pending is not a failure; surfaced as accepted-for-later.
            Self::AuthorizationPending => 202,
            // Terminal rejection needs document correction.
            Self::Rejected => 409,
            Self::Signing(_) | Self::XmlGeneration(_) | Self::Transmission(_) | Self::Storage(_) => {
                502
            }
        }
    }

    /// Returns true if retrying without any configuration change can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transmission(_) | Self::AuthorizationPending | Self::Storage(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            FiscalError::CertificateNotConfigured.error_code(),
            "CERTIFICATE_NOT_CONFIGURED"
        );
        assert_eq!(
            FiscalError::WrongCertificatePassword.error_code(),
            "WRONG_CERTIFICATE_PASSWORD"
        );
        assert_eq!(
            FiscalError::AuthorizationPending.error_code(),
            "AUTHORIZATION_PENDING"
        );
    }

    #[test]
    fn test_retryability_split() {
        assert!(FiscalError::Transmission("down".into()).is_retryable());
        assert!(FiscalError::AuthorizationPending.is_retryable());
        assert!(!FiscalError::CertificateNotConfigured.is_retryable());
        assert!(!FiscalError::WrongCertificatePassword.is_retryable());
        assert!(!FiscalError::Rejected.is_retryable());
    }

    #[test]
    fn test_pending_is_not_an_http_failure() {
        assert_eq!(FiscalError::AuthorizationPending.http_status_code(), 202);
    }
}

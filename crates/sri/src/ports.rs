//! Collaborator ports consumed by the pipeline.
//!
//! The digital signer, the authority transport, and the XML template
//! renderer are external services; the pipeline only sees these traits.
//! Production implementations live outside this crate (the signer and the
//! authority's SOAP plumbing are deployment concerns); `fakes` provides
//! in-memory implementations for tests.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use balanza_core::fiscal::{AuthorityReply, TransmissionReply};

/// Signing failure.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The certificate password is incorrect.
    #[error("certificate password is incorrect")]
    WrongPassword,

    /// Any other signing failure.
    #[error("{0}")]
    Failed(String),
}

/// Transport-level failure talking to the authority.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// XML rendering failure.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct XmlBuildError(pub String);

/// What the XML builder needs to render a document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentXmlContext {
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// The document to render.
    pub document_id: Uuid,
}

/// Digital signing service.
#[async_trait]
pub trait DigitalSigner: Send + Sync {
    /// Signs an XML document with the tenant's certificate, returning the
    /// signed XML (which embeds the access key).
    async fn sign(
        &self,
        certificate: &[u8],
        password: &str,
        xml: &str,
    ) -> Result<String, SignerError>;
}

/// Tax authority transport.
#[async_trait]
pub trait AuthorityClient: Send + Sync {
    /// Transmits a signed document to the reception service.
    async fn transmit(
        &self,
        signed_xml: &[u8],
        environment: i16,
    ) -> Result<TransmissionReply, TransportError>;

    /// Queries the authorization service for a final result.
    async fn query_authorization(
        &self,
        access_key: &str,
        environment: i16,
    ) -> Result<AuthorityReply, TransportError>;
}

/// Document XML renderer (template logic out of scope, consumed opaquely).
#[async_trait]
pub trait XmlBuilder: Send + Sync {
    /// Renders the unsigned XML for a document.
    async fn build(&self, context: &DocumentXmlContext) -> Result<String, XmlBuildError>;
}

// Delegating impls so ports can be held behind `Arc<dyn ...>`.

#[async_trait]
impl<T: DigitalSigner + ?Sized> DigitalSigner for std::sync::Arc<T> {
    async fn sign(
        &self,
        certificate: &[u8],
        password: &str,
        xml: &str,
    ) -> Result<String, SignerError> {
        (**self).sign(certificate, password, xml).await
    }
}

#[async_trait]
impl<T: AuthorityClient + ?Sized> AuthorityClient for std::sync::Arc<T> {
    async fn transmit(
        &self,
        signed_xml: &[u8],
        environment: i16,
    ) -> Result<TransmissionReply, TransportError> {
        (**self).transmit(signed_xml, environment).await
    }

    async fn query_authorization(
        &self,
        access_key: &str,
        environment: i16,
    ) -> Result<AuthorityReply, TransportError> {
        (**self).query_authorization(access_key, environment).await
    }
}

#[async_trait]
impl<T: XmlBuilder + ?Sized> XmlBuilder for std::sync::Arc<T> {
    async fn build(&self, context: &DocumentXmlContext) -> Result<String, XmlBuildError> {
        (**self).build(context).await
    }
}

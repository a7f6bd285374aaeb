//! In-memory fakes of the collaborator ports.
//!
//! Used by tests (and local development) in place of the real signer and
//! authority transport. The fakes count their invocations so tests can
//! assert that resumed pipelines skip steps whose output already exists.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use balanza_core::fiscal::{AuthorityReply, TransmissionReply};

use crate::ports::{
    AuthorityClient, DigitalSigner, DocumentXmlContext, SignerError, TransportError, XmlBuildError,
    XmlBuilder,
};

/// Signer fake: validates the password and wraps the XML with a fixed
/// access key.
pub struct FakeSigner {
    expected_password: String,
    access_key: String,
    calls: AtomicUsize,
}

impl FakeSigner {
    /// Creates a fake accepting `password` and embedding `access_key`.
    #[must_use]
    pub fn new(password: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            expected_password: password.into(),
            access_key: access_key.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of sign invocations so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DigitalSigner for FakeSigner {
    async fn sign(
        &self,
        _certificate: &[u8],
        password: &str,
        xml: &str,
    ) -> Result<String, SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if password != self.expected_password {
            return Err(SignerError::WrongPassword);
        }
        Ok(format!(
            "<signed>{xml}<claveAcceso>{}</claveAcceso></signed>",
            self.access_key
        ))
    }
}

/// Authority fake: replays scripted replies in order.
#[derive(Default)]
pub struct ScriptedAuthority {
    transmit_replies: Mutex<VecDeque<Result<TransmissionReply, TransportError>>>,
    query_replies: Mutex<VecDeque<Result<AuthorityReply, TransportError>>>,
    transmit_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl ScriptedAuthority {
    /// Creates an authority with no scripted replies (every call fails).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a transmission reply.
    pub fn push_transmit(&self, reply: Result<TransmissionReply, TransportError>) {
        self.transmit_replies.lock().unwrap().push_back(reply);
    }

    /// Queues an authorization-query reply.
    pub fn push_query(&self, reply: Result<AuthorityReply, TransportError>) {
        self.query_replies.lock().unwrap().push_back(reply);
    }

    /// Number of transmit invocations so far.
    #[must_use]
    pub fn transmit_calls(&self) -> usize {
        self.transmit_calls.load(Ordering::SeqCst)
    }

    /// Number of query invocations so far.
    #[must_use]
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorityClient for ScriptedAuthority {
    async fn transmit(
        &self,
        _signed_xml: &[u8],
        _environment: i16,
    ) -> Result<TransmissionReply, TransportError> {
        self.transmit_calls.fetch_add(1, Ordering::SeqCst);
        self.transmit_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted reply".to_string())))
    }

    async fn query_authorization(
        &self,
        _access_key: &str,
        _environment: i16,
    ) -> Result<AuthorityReply, TransportError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.query_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted reply".to_string())))
    }
}

/// XML builder fake returning a constant document.
pub struct StaticXmlBuilder {
    xml: String,
}

impl StaticXmlBuilder {
    /// Creates a builder that always renders `xml`.
    #[must_use]
    pub fn new(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }
}

#[async_trait]
impl XmlBuilder for StaticXmlBuilder {
    async fn build(&self, _context: &DocumentXmlContext) -> Result<String, XmlBuildError> {
        Ok(self.xml.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const KEY: &str = "0502202601179214673900110010010000000011234567813";

    #[tokio::test]
    async fn test_fake_signer_embeds_access_key() {
        let signer = FakeSigner::new("secret", KEY);
        let signed = signer.sign(b"cert", "secret", "<factura/>").await.unwrap();
        assert!(signed.contains(KEY));
        assert_eq!(signer.calls(), 1);
    }

    #[tokio::test]
    async fn test_fake_signer_rejects_wrong_password() {
        let signer = FakeSigner::new("secret", KEY);
        let result = signer.sign(b"cert", "nope", "<factura/>").await;
        assert!(matches!(result, Err(SignerError::WrongPassword)));
    }

    #[tokio::test]
    async fn test_scripted_authority_replays_in_order() {
        let authority = ScriptedAuthority::new();
        authority.push_transmit(Ok(TransmissionReply {
            accepted: true,
            status: "RECIBIDA".to_string(),
            raw: String::new(),
        }));

        let first = authority.transmit(b"<xml/>", 1).await.unwrap();
        assert_eq!(first.status, "RECIBIDA");

        // Queue exhausted: behaves as an unreachable service.
        assert!(authority.transmit(b"<xml/>", 1).await.is_err());
        assert_eq!(authority.transmit_calls(), 2);
    }

    #[tokio::test]
    async fn test_static_xml_builder() {
        let builder = StaticXmlBuilder::new("<factura/>");
        let context = DocumentXmlContext {
            tenant_id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
        };
        assert_eq!(builder.build(&context).await.unwrap(), "<factura/>");
    }
}

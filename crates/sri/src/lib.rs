//! Fiscal document authorization pipeline.
//!
//! Drives revenue documents through the SRI electronic-authorization
//! lifecycle: generate XML, sign, transmit, poll for authorization. The
//! pipeline is a sequence of independent steps with durable checkpoints
//! (the fiscal record's status plus its accumulated artifacts), so it can
//! resume idempotently from any point after a crash or a transient
//! external failure. External calls run outside any database transaction
//! and under finite timeouts.

pub mod fakes;
pub mod pipeline;
pub mod ports;
pub mod sweeper;

pub use pipeline::{FiscalPipeline, PipelineError};
pub use ports::{
    AuthorityClient, DigitalSigner, DocumentXmlContext, SignerError, TransportError, XmlBuildError,
    XmlBuilder,
};
pub use sweeper::{RetrySweeper, SweepOutcome, SweepReport};

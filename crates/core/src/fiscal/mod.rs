//! Electronic-document authorization state machine.
//!
//! Revenue documents are signed, transmitted to the SRI, and polled for
//! authorization. This module holds the pure state machine: the status
//! enum and its legal transitions, the parsing of authority replies, and
//! the derivation of the next pipeline step from durable state. The
//! orchestration that actually calls the signer and the authority lives
//! in the `balanza-sri` crate; everything here is synchronous and
//! side-effect free so a crash can never leave the machine itself in an
//! inconsistent state.

pub mod error;
pub mod status;
pub mod step;
pub mod types;

pub use error::FiscalError;
pub use status::SriStatus;
pub use step::{FiscalSnapshot, PipelineStep, next_step};
pub use types::{
    AdvanceOutcome, AuthorityDecision, AuthorityReply, TransmissionReply, authority_decision,
    transmission_status,
};

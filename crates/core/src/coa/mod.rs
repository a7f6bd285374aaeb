//! Chart-of-accounts template cloning.
//!
//! Every tenant gets its own copy of the account tree, cloned from a
//! template at provisioning time. Because template rows may list children
//! before their parents, the clone is planned in two passes: create every
//! account with a null parent, then resolve parent links by template code.

pub mod clone;

pub use clone::{AccountKind, ClonePlan, CloneError, PlannedAccount, TemplateAccount, plan_clone};

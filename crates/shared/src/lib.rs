//! Shared types and configuration for Balanza.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision
//! - Typed IDs for type-safe entity references
//! - Configuration management
//!
//! Error types live with the domain that raises them (each module carries
//! its own `thiserror` enum); there is deliberately no catch-all
//! application error here.

pub mod config;
pub mod types;

pub use config::AppConfig;

//! Blob storage for fiscal artifacts.
//!
//! Signed XML documents and tenant digital certificates are blobs, not
//! rows: they live in object storage behind an Apache OpenDAL operator so
//! the backing provider (S3-compatible, Azure Blob, local filesystem in
//! development) is a configuration choice.

pub mod config;
pub mod error;
pub mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::StorageService;

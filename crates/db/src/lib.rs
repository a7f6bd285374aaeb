//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Atomicity rules: repositories that implement a whole business operation
//! (document create/update, transaction allocation) open the database
//! transaction; the journal posting engine and the movement writers only
//! accept a `&DatabaseTransaction` and never commit on their own.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, DocumentRepository, FiscalInfoRepository, TransactionRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

//! Journal repository: the ledger posting engine's persistence.
//!
//! Every function here takes a `&DatabaseTransaction` supplied by the
//! caller. The posting engine is always one step inside a larger business
//! operation ("document row changed" + "journal entry posted" must be
//! atomic together), so it never begins or commits a transaction itself.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use balanza_core::ledger::{LedgerError, PostingRequest, SourceKind, validate_posting};

use crate::entities::{journal_entries, journal_entry_lines};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// The posting request failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A persisted journal entry with its lines.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// Entry lines.
    pub lines: Vec<journal_entry_lines::Model>,
}

/// Ledger posting engine persistence.
///
/// Stateless: all methods are associated functions operating on the
/// caller's transaction.
pub struct JournalRepository;

impl JournalRepository {
    /// Posts a validated entry with all its lines.
    ///
    /// The entry and its lines are written inside the caller's
    /// transaction: either everything is persisted together with the rest
    /// of the business operation, or nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Validation`] before any write if the
    /// request is empty, has a malformed line, or does not balance.
    pub async fn post(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        request: &PostingRequest,
    ) -> Result<EntryWithLines, JournalError> {
        validate_posting(request)?;

        let now = Utc::now().into();
        let entry_id = Uuid::new_v4();

        let entry = journal_entries::ActiveModel {
            id: Set(entry_id),
            tenant_id: Set(tenant_id),
            entry_date: Set(request.date),
            description: Set(request.description.clone()),
            kind: Set(request.kind.into()),
            source_kind: Set(request.source.map(|s| s.kind.as_str().to_string())),
            source_id: Set(request.source.map(|s| s.id)),
            created_at: Set(now),
        };
        let entry = entry.insert(txn).await?;

        let mut lines = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            let line = journal_entry_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                journal_entry_id: Set(entry_id),
                account_id: Set(line.account_id.into_inner()),
                debit: Set(line.debit),
                credit: Set(line.credit),
                cost_center_id: Set(line.cost_center_id.map(balanza_shared::types::CostCenterId::into_inner)),
                person_id: Set(line.person_id.map(balanza_shared::types::PersonId::into_inner)),
            };
            lines.push(line.insert(txn).await?);
        }

        Ok(EntryWithLines { entry, lines })
    }

    /// Replaces the entry for a source document: deletes the prior entry
    /// (lines first) if one exists, then posts the new request.
    ///
    /// This is the only sanctioned way to "edit" an entry, and guarantees
    /// no duplicates accumulate across repeated edits of the same source.
    ///
    /// # Errors
    ///
    /// Same as [`JournalRepository::post`].
    pub async fn replace(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        source_kind: SourceKind,
        source_id: Uuid,
        request: &PostingRequest,
    ) -> Result<EntryWithLines, JournalError> {
        Self::delete_for_source(txn, tenant_id, source_kind, source_id).await?;
        Self::post(txn, tenant_id, request).await
    }

    /// Deletes the entry (and its lines) for a source document, if any.
    ///
    /// Returns true if an entry was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn delete_for_source(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        source_kind: SourceKind,
        source_id: Uuid,
    ) -> Result<bool, JournalError> {
        let existing = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .filter(journal_entries::Column::SourceKind.eq(source_kind.as_str()))
            .filter(journal_entries::Column::SourceId.eq(source_id))
            .all(txn)
            .await?;

        if existing.is_empty() {
            return Ok(false);
        }

        for entry in existing {
            journal_entry_lines::Entity::delete_many()
                .filter(journal_entry_lines::Column::JournalEntryId.eq(entry.id))
                .exec(txn)
                .await?;
            journal_entries::Entity::delete_by_id(entry.id)
                .exec(txn)
                .await?;
        }

        Ok(true)
    }

    /// Finds the current entry for a source document.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_source<C: ConnectionTrait>(
        conn: &C,
        tenant_id: Uuid,
        source_kind: SourceKind,
        source_id: Uuid,
    ) -> Result<Option<journal_entries::Model>, JournalError> {
        let entry = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .filter(journal_entries::Column::SourceKind.eq(source_kind.as_str()))
            .filter(journal_entries::Column::SourceId.eq(source_id))
            .one(conn)
            .await?;
        Ok(entry)
    }

    /// Loads an entry's lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn lines_of<C: ConnectionTrait>(
        conn: &C,
        entry_id: Uuid,
    ) -> Result<Vec<journal_entry_lines::Model>, JournalError> {
        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::JournalEntryId.eq(entry_id))
            .all(conn)
            .await?;
        Ok(lines)
    }
}

//! Fiscal record repository.
//!
//! Unlike the ledger repositories, every status transition here is its own
//! short, separately-committed write: the authorization pipeline's
//! external calls must never hold a database transaction open, so the
//! `sri_status` column is the durable checkpoint the pipeline resumes from.
//!
//! Each write runs in a short transaction that first takes a per-record
//! Postgres advisory lock and re-reads the row, then validates the status
//! transition against the state machine. A manual send racing the retry
//! sweeper therefore serializes at every checkpoint instead of
//! interleaving half-applied transitions.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use balanza_core::fiscal::SriStatus;

use crate::entities::{document_fiscal_infos, sea_orm_active_enums};

/// Error types for fiscal record operations.
#[derive(Debug, thiserror::Error)]
pub enum FiscalInfoError {
    /// No fiscal record for this document.
    #[error("No fiscal record for document {0}")]
    NotFound(Uuid),

    /// The requested status transition is illegal.
    #[error("Illegal fiscal status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: SriStatus,
        /// Requested status.
        to: SriStatus,
    },

    /// Regeneration requested for a record that is not rejected.
    #[error("Only rejected documents can be regenerated (current status: {0})")]
    NotRejected(SriStatus),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Fiscal record repository.
#[derive(Debug, Clone)]
pub struct FiscalInfoRepository {
    db: DatabaseConnection,
}

impl FiscalInfoRepository {
    /// Creates a new fiscal record repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the fiscal record of a document.
    ///
    /// # Errors
    ///
    /// Returns [`FiscalInfoError::NotFound`] if the document has none.
    pub async fn find_by_document(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
    ) -> Result<document_fiscal_infos::Model, FiscalInfoError> {
        document_fiscal_infos::Entity::find()
            .filter(document_fiscal_infos::Column::TenantId.eq(tenant_id))
            .filter(document_fiscal_infos::Column::DocumentId.eq(document_id))
            .one(&self.db)
            .await?
            .ok_or(FiscalInfoError::NotFound(document_id))
    }

    /// Persists a status transition in its own short locked write,
    /// together with the authority's raw response when there is one.
    ///
    /// # Errors
    ///
    /// Returns [`FiscalInfoError::InvalidTransition`] if the state machine
    /// does not allow the move (same-status writes are allowed: a re-poll
    /// that stays `in_process` still refreshes `last_response`).
    pub async fn set_status(
        &self,
        fiscal_info_id: Uuid,
        status: SriStatus,
        last_response: Option<String>,
    ) -> Result<document_fiscal_infos::Model, FiscalInfoError> {
        let txn = self.db.begin().await?;
        let info = Self::lock_and_load(&txn, fiscal_info_id).await?;
        let current: SriStatus = info.sri_status.clone().into();

        if current != status && !current.can_transition_to(status) {
            return Err(FiscalInfoError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        let mut active: document_fiscal_infos::ActiveModel = info.into();
        active.sri_status = Set(status.into());
        if let Some(response) = last_response {
            active.last_response = Set(Some(response));
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Stores the signing artifacts (access key + signed XML location).
    /// The status stays `draft`; the presence of the artifacts is what
    /// tells the pipeline the sign step is done.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is missing or the write fails.
    pub async fn record_signing(
        &self,
        fiscal_info_id: Uuid,
        access_key: &str,
        signed_xml_key: &str,
    ) -> Result<document_fiscal_infos::Model, FiscalInfoError> {
        let txn = self.db.begin().await?;
        let info = Self::lock_and_load(&txn, fiscal_info_id).await?;
        let mut active: document_fiscal_infos::ActiveModel = info.into();
        active.access_key = Set(Some(access_key.to_string()));
        active.signed_xml_key = Set(Some(signed_xml_key.to_string()));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Stores the final authorization and moves the record to `authorized`.
    ///
    /// # Errors
    ///
    /// Returns [`FiscalInfoError::InvalidTransition`] if the record is not
    /// in a state the authority can authorize from.
    pub async fn record_authorization(
        &self,
        fiscal_info_id: Uuid,
        authorization_number: &str,
        authorization_date: DateTime<Utc>,
        raw_response: &str,
    ) -> Result<document_fiscal_infos::Model, FiscalInfoError> {
        let txn = self.db.begin().await?;
        let info = Self::lock_and_load(&txn, fiscal_info_id).await?;
        let current: SriStatus = info.sri_status.clone().into();
        if current != SriStatus::Authorized && !current.can_transition_to(SriStatus::Authorized) {
            return Err(FiscalInfoError::InvalidTransition {
                from: current,
                to: SriStatus::Authorized,
            });
        }

        let mut active: document_fiscal_infos::ActiveModel = info.into();
        active.sri_status = Set(sea_orm_active_enums::SriStatus::Authorized);
        active.authorization_number = Set(Some(authorization_number.to_string()));
        active.authorization_date = Set(Some(authorization_date.into()));
        active.last_response = Set(Some(raw_response.to_string()));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Starts a fresh authorization cycle for a rejected document:
    /// clears the access key, signed-XML location, and authorization
    /// fields, and resets the status to `draft`.
    ///
    /// This is the only path out of `rejected`; nothing regenerates
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns [`FiscalInfoError::NotRejected`] unless the record is
    /// currently rejected.
    pub async fn regenerate(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
    ) -> Result<document_fiscal_infos::Model, FiscalInfoError> {
        let info = self.find_by_document(tenant_id, document_id).await?;

        let txn = self.db.begin().await?;
        let info = Self::lock_and_load(&txn, info.id).await?;
        let current: SriStatus = info.sri_status.clone().into();
        if current != SriStatus::Rejected {
            return Err(FiscalInfoError::NotRejected(current));
        }

        let mut active: document_fiscal_infos::ActiveModel = info.into();
        active.sri_status = Set(sea_orm_active_enums::SriStatus::Draft);
        active.access_key = Set(None);
        active.signed_xml_key = Set(None);
        active.authorization_number = Set(None);
        active.authorization_date = Set(None);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Loads every in-process fiscal record across all tenants, oldest
    /// first, for the retry sweeper.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_in_process(
        &self,
    ) -> Result<Vec<document_fiscal_infos::Model>, FiscalInfoError> {
        let records = document_fiscal_infos::Entity::find()
            .filter(
                document_fiscal_infos::Column::SriStatus
                    .eq(sea_orm_active_enums::SriStatus::InProcess),
            )
            .order_by_asc(document_fiscal_infos::Column::UpdatedAt)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    /// Takes the record's transaction-scoped advisory lock, then returns
    /// the freshest row under that lock.
    async fn lock_and_load(
        txn: &DatabaseTransaction,
        fiscal_info_id: Uuid,
    ) -> Result<document_fiscal_infos::Model, FiscalInfoError> {
        let key = Self::advisory_key(fiscal_info_id);
        txn.execute(Statement::from_sql_and_values(
            txn.get_database_backend(),
            "SELECT pg_advisory_xact_lock($1)",
            [key.into()],
        ))
        .await?;

        document_fiscal_infos::Entity::find_by_id(fiscal_info_id)
            .one(txn)
            .await?
            .ok_or(FiscalInfoError::NotFound(fiscal_info_id))
    }

    /// Maps a UUID onto the 64-bit advisory-lock keyspace.
    fn advisory_key(id: Uuid) -> i64 {
        let bytes = id.as_bytes();
        let mut key = [0u8; 8];
        key.copy_from_slice(&bytes[8..16]);
        i64::from_be_bytes(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_key_is_stable() {
        let id = Uuid::new_v4();
        assert_eq!(
            FiscalInfoRepository::advisory_key(id),
            FiscalInfoRepository::advisory_key(id)
        );
    }

    #[test]
    fn test_advisory_key_differs_across_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_ne!(
            FiscalInfoRepository::advisory_key(a),
            FiscalInfoRepository::advisory_key(b)
        );
    }
}

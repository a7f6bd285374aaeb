//! Cash movement repository.
//!
//! Creating or updating a movement and posting its journal entry happen
//! inside one database transaction; the entry is always written through
//! `JournalRepository::replace` so repeated edits never accumulate
//! duplicate entries.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use balanza_core::accounting::{
    AccountingError, CashMovementEvent, MovementDirection, cash_movement_posting,
};
use balanza_core::ledger::SourceKind;
use balanza_shared::types::{AccountId, CashBoxId, PersonId};

use crate::entities::{
    cash_boxes, cash_movements, cash_sessions, people,
    sea_orm_active_enums::CashSessionStatus,
};
use crate::repositories::journal::{JournalError, JournalRepository};

/// Error types for cash movement operations.
#[derive(Debug, thiserror::Error)]
pub enum CashMovementError {
    /// Movement not found.
    #[error("Cash movement not found: {0}")]
    NotFound(Uuid),

    /// Cash session not found.
    #[error("Cash session not found: {0}")]
    SessionNotFound(Uuid),

    /// Cash session is closed.
    #[error("Cash session {0} is closed")]
    SessionClosed(Uuid),

    /// Cash box not found.
    #[error("Cash box not found: {0}")]
    CashBoxNotFound(Uuid),

    /// Person not found.
    #[error("Person not found: {0}")]
    PersonNotFound(Uuid),

    /// Accountant rejected the movement (missing account configuration).
    #[error(transparent)]
    Accounting(#[from] AccountingError),

    /// Posting failed.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a cash movement.
#[derive(Debug, Clone)]
pub struct CreateCashMovementInput {
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// The open session the movement belongs to.
    pub cash_session_id: Uuid,
    /// Movement direction.
    pub direction: MovementDirection,
    /// Amount (positive).
    pub amount: Decimal,
    /// Movement date.
    pub movement_date: NaiveDate,
    /// Free-text concept.
    pub description: String,
    /// Counterparty, if any.
    pub person_id: Option<Uuid>,
    /// Parent transaction, when produced by an allocation.
    pub transaction_id: Option<Uuid>,
}

/// Fields that can change on update.
#[derive(Debug, Clone)]
pub struct UpdateCashMovementInput {
    /// New direction.
    pub direction: MovementDirection,
    /// New amount.
    pub amount: Decimal,
    /// New date.
    pub movement_date: NaiveDate,
    /// New description.
    pub description: String,
    /// New counterparty.
    pub person_id: Option<Uuid>,
}

/// Cash movement repository.
#[derive(Debug, Clone)]
pub struct CashMovementRepository {
    db: DatabaseConnection,
}

impl CashMovementRepository {
    /// Creates a new cash movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a movement and posts its entry in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is missing/closed, the accountant
    /// rejects the movement, or a database operation fails.
    pub async fn create(
        &self,
        input: CreateCashMovementInput,
    ) -> Result<cash_movements::Model, CashMovementError> {
        let txn = self.db.begin().await?;
        let movement = Self::create_in_txn(&txn, input).await?;
        txn.commit().await?;
        Ok(movement)
    }

    /// Creates a movement inside an existing transaction (used by the
    /// transaction allocator).
    ///
    /// # Errors
    ///
    /// Same as [`CashMovementRepository::create`].
    pub async fn create_in_txn(
        txn: &DatabaseTransaction,
        input: CreateCashMovementInput,
    ) -> Result<cash_movements::Model, CashMovementError> {
        let session = cash_sessions::Entity::find_by_id(input.cash_session_id)
            .filter(cash_sessions::Column::TenantId.eq(input.tenant_id))
            .one(txn)
            .await?
            .ok_or(CashMovementError::SessionNotFound(input.cash_session_id))?;

        if session.status != CashSessionStatus::Open {
            return Err(CashMovementError::SessionClosed(session.id));
        }

        let now = Utc::now().into();
        let movement_id = Uuid::new_v4();

        let movement = cash_movements::ActiveModel {
            id: Set(movement_id),
            tenant_id: Set(input.tenant_id),
            cash_session_id: Set(session.id),
            cash_box_id: Set(session.cash_box_id),
            direction: Set(input.direction.into()),
            amount: Set(input.amount),
            movement_date: Set(input.movement_date),
            description: Set(input.description.clone()),
            person_id: Set(input.person_id),
            transaction_id: Set(input.transaction_id),
            journal_entry_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let movement = movement.insert(txn).await?;

        Self::post_entry(txn, &movement).await
    }

    /// Updates a movement and replaces its entry in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is missing, the accountant rejects
    /// the new state, or a database operation fails.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        movement_id: Uuid,
        input: UpdateCashMovementInput,
    ) -> Result<cash_movements::Model, CashMovementError> {
        let txn = self.db.begin().await?;

        let movement = cash_movements::Entity::find_by_id(movement_id)
            .filter(cash_movements::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            .ok_or(CashMovementError::NotFound(movement_id))?;

        let mut active: cash_movements::ActiveModel = movement.into();
        active.direction = Set(input.direction.into());
        active.amount = Set(input.amount);
        active.movement_date = Set(input.movement_date);
        active.description = Set(input.description);
        active.person_id = Set(input.person_id);
        active.updated_at = Set(Utc::now().into());
        let movement = active.update(&txn).await?;

        let movement = Self::post_entry(&txn, &movement).await?;
        txn.commit().await?;
        Ok(movement)
    }

    /// Deletes a movement and its journal entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is missing or a database
    /// operation fails.
    pub async fn delete(&self, tenant_id: Uuid, movement_id: Uuid) -> Result<(), CashMovementError> {
        let txn = self.db.begin().await?;
        Self::delete_in_txn(&txn, tenant_id, movement_id).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Deletes a movement and its entry inside an existing transaction.
    ///
    /// # Errors
    ///
    /// Same as [`CashMovementRepository::delete`].
    pub async fn delete_in_txn(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        movement_id: Uuid,
    ) -> Result<(), CashMovementError> {
        let movement = cash_movements::Entity::find_by_id(movement_id)
            .filter(cash_movements::Column::TenantId.eq(tenant_id))
            .one(txn)
            .await?
            .ok_or(CashMovementError::NotFound(movement_id))?;

        JournalRepository::delete_for_source(txn, tenant_id, SourceKind::CashMovement, movement.id)
            .await?;
        cash_movements::Entity::delete_by_id(movement.id)
            .exec(txn)
            .await?;
        Ok(())
    }

    /// Finds the open cash session for a user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_open_session<C: ConnectionTrait>(
        conn: &C,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<cash_sessions::Model>, CashMovementError> {
        let session = cash_sessions::Entity::find()
            .filter(cash_sessions::Column::TenantId.eq(tenant_id))
            .filter(cash_sessions::Column::UserId.eq(user_id))
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Open))
            .one(conn)
            .await?;
        Ok(session)
    }

    /// Builds the movement's accounting event and replaces its entry,
    /// storing the new entry id back on the movement row.
    async fn post_entry(
        txn: &DatabaseTransaction,
        movement: &cash_movements::Model,
    ) -> Result<cash_movements::Model, CashMovementError> {
        let cash_box = cash_boxes::Entity::find_by_id(movement.cash_box_id)
            .one(txn)
            .await?
            .ok_or(CashMovementError::CashBoxNotFound(movement.cash_box_id))?;

        let direction: MovementDirection = movement.direction.clone().into();

        let counterparty_account = match movement.person_id {
            Some(person_id) => {
                let person = people::Entity::find_by_id(person_id)
                    .one(txn)
                    .await?
                    .ok_or(CashMovementError::PersonNotFound(person_id))?;
                let account = match direction {
                    MovementDirection::In => person.receivable_account_id,
                    MovementDirection::Out => person.payable_account_id,
                };
                account.map(AccountId::from_uuid)
            }
            None => None,
        };

        let event = CashMovementEvent {
            movement_id: movement.id,
            direction,
            amount: movement.amount,
            date: movement.movement_date,
            description: movement.description.clone(),
            cash_box_id: CashBoxId::from_uuid(cash_box.id),
            cash_box_account: cash_box.account_id.map(AccountId::from_uuid),
            counterparty_account,
            person_id: movement.person_id.map(PersonId::from_uuid),
            cost_center_id: None,
        };
        let request = cash_movement_posting(&event)?;

        let posted = JournalRepository::replace(
            txn,
            movement.tenant_id,
            SourceKind::CashMovement,
            movement.id,
            &request,
        )
        .await?;

        let mut active: cash_movements::ActiveModel = movement.clone().into();
        active.journal_entry_id = Set(Some(posted.entry.id));
        let movement = active.update(txn).await?;
        Ok(movement)
    }
}

//! Bank movement repository.
//!
//! Same contract as the cash movement repository: movement row, detail
//! splits, and journal entry are written in one transaction, and the entry
//! goes through `JournalRepository::replace` keyed on the movement id.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use balanza_core::accounting::{
    AccountingError, BankDetailSplit, BankMovementEvent, MovementDirection, bank_movement_posting,
};
use balanza_core::ledger::SourceKind;
use balanza_shared::types::{AccountId, BankAccountId, CostCenterId, PersonId};

use crate::entities::{bank_accounts, bank_movement_details, bank_movements};
use crate::repositories::journal::{JournalError, JournalRepository};

/// Error types for bank movement operations.
#[derive(Debug, thiserror::Error)]
pub enum BankMovementError {
    /// Movement not found.
    #[error("Bank movement not found: {0}")]
    NotFound(Uuid),

    /// Bank account not found.
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(Uuid),

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

/// One detail split of a movement being created.
#[derive(Debug, Clone)]
pub struct BankDetailInput {
    /// Counterpart account.
    pub account_id: Option<Uuid>,
    /// Split amount (positive).
    pub amount: Decimal,
    /// Optional counterparty tag.
    pub person_id: Option<Uuid>,
    /// Optional cost center tag.
    pub cost_center_id: Option<Uuid>,
}

/// Input for creating a bank movement.
#[derive(Debug, Clone)]
pub struct CreateBankMovementInput {
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// The bank account the movement belongs to.
    pub bank_account_id: Uuid,
    /// Movement direction.
    pub direction: MovementDirection,
    /// Movement date.
    pub movement_date: NaiveDate,
    /// Free-text concept.
    pub description: String,
    /// Detail splits (at least one).
    pub details: Vec<BankDetailInput>,
    /// Parent transaction, when produced by an allocation.
    pub transaction_id: Option<Uuid>,
}

/// Bank movement repository.
#[derive(Debug, Clone)]
pub struct BankMovementRepository {
    db: DatabaseConnection,
}

impl BankMovementRepository {
    /// Creates a new bank movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a movement with its splits and posts its entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the bank account is missing, the accountant
    /// rejects the movement, or a database operation fails.
    pub async fn create(
        &self,
        input: CreateBankMovementInput,
    ) -> Result<bank_movements::Model, BankMovementError> {
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
    /// Same as [`BankMovementRepository::create`].
    pub async fn create_in_txn(
        txn: &DatabaseTransaction,
        input: CreateBankMovementInput,
    ) -> Result<bank_movements::Model, BankMovementError> {
        let now = Utc::now().into();
        let movement_id = Uuid::new_v4();

        let movement = bank_movements::ActiveModel {
            id: Set(movement_id),
            tenant_id: Set(input.tenant_id),
            bank_account_id: Set(input.bank_account_id),
            direction: Set(input.direction.into()),
            movement_date: Set(input.movement_date),
            description: Set(input.description.clone()),
            transaction_id: Set(input.transaction_id),
            journal_entry_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let movement = movement.insert(txn).await?;

        for detail in &input.details {
            let row = bank_movement_details::ActiveModel {
                id: Set(Uuid::new_v4()),
                bank_movement_id: Set(movement_id),
                account_id: Set(detail.account_id),
                amount: Set(detail.amount),
                person_id: Set(detail.person_id),
                cost_center_id: Set(detail.cost_center_id),
            };
            row.insert(txn).await?;
        }

        Self::post_entry(txn, &movement).await
    }

    /// Replaces a movement's detail splits wholesale and re-posts its
    /// entry, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is missing, the accountant rejects
    /// the new state, or a database operation fails.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        movement_id: Uuid,
        direction: MovementDirection,
        movement_date: NaiveDate,
        description: String,
        details: Vec<BankDetailInput>,
    ) -> Result<bank_movements::Model, BankMovementError> {
        let txn = self.db.begin().await?;

        let movement = bank_movements::Entity::find_by_id(movement_id)
            .filter(bank_movements::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            .ok_or(BankMovementError::NotFound(movement_id))?;

        let mut active: bank_movements::ActiveModel = movement.into();
        active.direction = Set(direction.into());
        active.movement_date = Set(movement_date);
        active.description = Set(description);
        active.updated_at = Set(Utc::now().into());
        let movement = active.update(&txn).await?;

        // Wholesale replace of the splits.
        bank_movement_details::Entity::delete_many()
            .filter(bank_movement_details::Column::BankMovementId.eq(movement_id))
            .exec(&txn)
            .await?;
        for detail in &details {
            let row = bank_movement_details::ActiveModel {
                id: Set(Uuid::new_v4()),
                bank_movement_id: Set(movement_id),
                account_id: Set(detail.account_id),
                amount: Set(detail.amount),
                person_id: Set(detail.person_id),
                cost_center_id: Set(detail.cost_center_id),
            };
            row.insert(&txn).await?;
        }

        let movement = Self::post_entry(&txn, &movement).await?;
        txn.commit().await?;
        Ok(movement)
    }

    /// Deletes a movement, its splits, and its journal entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is missing or a database
    /// operation fails.
    pub async fn delete(&self, tenant_id: Uuid, movement_id: Uuid) -> Result<(), BankMovementError> {
        let txn = self.db.begin().await?;
        Self::delete_in_txn(&txn, tenant_id, movement_id).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Deletes a movement and its entry inside an existing transaction.
    ///
    /// # Errors
    ///
    /// Same as [`BankMovementRepository::delete`].
    pub async fn delete_in_txn(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        movement_id: Uuid,
    ) -> Result<(), BankMovementError> {
        let movement = bank_movements::Entity::find_by_id(movement_id)
            .filter(bank_movements::Column::TenantId.eq(tenant_id))
            .one(txn)
            .await?
            .ok_or(BankMovementError::NotFound(movement_id))?;

        JournalRepository::delete_for_source(txn, tenant_id, SourceKind::BankMovement, movement.id)
            .await?;
        bank_movement_details::Entity::delete_many()
            .filter(bank_movement_details::Column::BankMovementId.eq(movement.id))
            .exec(txn)
            .await?;
        bank_movements::Entity::delete_by_id(movement.id)
            .exec(txn)
            .await?;
        Ok(())
    }

    /// Builds the movement's accounting event from its stored splits and
    /// replaces its entry.
    async fn post_entry(
        txn: &DatabaseTransaction,
        movement: &bank_movements::Model,
    ) -> Result<bank_movements::Model, BankMovementError> {
        let bank_account = bank_accounts::Entity::find_by_id(movement.bank_account_id)
            .one(txn)
            .await?
            .ok_or(BankMovementError::BankAccountNotFound(movement.bank_account_id))?;

        let details = bank_movement_details::Entity::find()
            .filter(bank_movement_details::Column::BankMovementId.eq(movement.id))
            .all(txn)
            .await?;

        let event = BankMovementEvent {
            movement_id: movement.id,
            direction: movement.direction.clone().into(),
            date: movement.movement_date,
            description: movement.description.clone(),
            bank_account_id: BankAccountId::from_uuid(bank_account.id),
            bank_ledger_account: bank_account.account_id.map(AccountId::from_uuid),
            details: details
                .iter()
                .map(|d| BankDetailSplit {
                    account_id: d.account_id.map(AccountId::from_uuid),
                    amount: d.amount,
                    person_id: d.person_id.map(PersonId::from_uuid),
                    cost_center_id: d.cost_center_id.map(CostCenterId::from_uuid),
                })
                .collect(),
        };
        let request = bank_movement_posting(&event)?;

        let posted = JournalRepository::replace(
            txn,
            movement.tenant_id,
            SourceKind::BankMovement,
            movement.id,
            &request,
        )
        .await?;

        let mut active: bank_movements::ActiveModel = movement.clone().into();
        active.journal_entry_id = Set(Some(posted.entry.id));
        let movement = active.update(txn).await?;
        Ok(movement)
    }
}

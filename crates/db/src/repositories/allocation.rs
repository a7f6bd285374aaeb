//! Transaction allocator.
//!
//! A payment/receipt transaction fans out to N document balance updates
//! and exactly one cash or bank movement, all inside one database
//! transaction. Document paid amounts are always recomputed as the
//! aggregate over link rows (never incrementally), and on reallocation the
//! affected-document set is the union of the old and new linked documents
//! so documents dropped from an allocation are recalculated back down.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use balanza_core::accounting::MovementDirection;
use balanza_core::allocation::{
    AllocationError, AllocationLine, DocumentBalance, PaymentMethod, validate_allocations,
};
use balanza_shared::types::DocumentId;

use crate::entities::{
    bank_movements, cash_movements, documents, people, transaction_documents, transactions,
    sea_orm_active_enums::{self, PaymentMethod as DbPaymentMethod},
};
use crate::repositories::bank_movement::{
    BankDetailInput, BankMovementError, BankMovementRepository, CreateBankMovementInput,
};
use crate::repositories::cash_movement::{
    CashMovementError, CashMovementRepository, CreateCashMovementInput,
};
use crate::repositories::document::{DocumentError, DocumentRepository};

/// Error types for transaction allocation.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Person not found.
    #[error("Person not found: {0}")]
    PersonNotFound(Uuid),

    /// Allocation validation failed.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Cash movement step failed.
    #[error(transparent)]
    CashMovement(#[from] CashMovementError),

    /// Bank movement step failed.
    #[error(transparent)]
    BankMovement(#[from] BankMovementError),

    /// Document balance update failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for allocating a new transaction.
#[derive(Debug, Clone)]
pub struct AllocateTransactionInput {
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// Counterparty.
    pub person_id: Option<Uuid>,
    /// Payment method (selects cash vs bank movement).
    pub method: PaymentMethod,
    /// Receipt (money in) or payment (money out).
    pub direction: MovementDirection,
    /// Transaction amount.
    pub amount: Decimal,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// The recording user (selects the open cash session for cash).
    pub user_id: Uuid,
    /// Target bank account, required for transfers.
    pub bank_account_id: Option<Uuid>,
    /// Free-text description.
    pub description: Option<String>,
    /// Per-document allocation slices.
    pub allocations: Vec<AllocationLine>,
}

/// Input for reallocating an existing transaction.
#[derive(Debug, Clone)]
pub struct ReallocateTransactionInput {
    /// New amount.
    pub amount: Decimal,
    /// New date.
    pub transaction_date: NaiveDate,
    /// New description.
    pub description: Option<String>,
    /// New allocation slices (replace the previous set).
    pub allocations: Vec<AllocationLine>,
}

/// A transaction with its allocation links.
#[derive(Debug, Clone)]
pub struct TransactionWithLinks {
    /// Transaction header.
    pub transaction: transactions::Model,
    /// Allocation link rows.
    pub links: Vec<transaction_documents::Model>,
}

/// Transaction allocator repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Allocates a transaction across documents and creates its movement.
    ///
    /// # Errors
    ///
    /// Returns an error (with no side effects) if validation fails; the
    /// whole operation is one database transaction.
    pub async fn allocate(
        &self,
        input: AllocateTransactionInput,
    ) -> Result<TransactionWithLinks, TransactionError> {
        let txn = self.db.begin().await?;

        Self::validate_against_balances(&txn, input.tenant_id, input.amount, &input.allocations)
            .await?;

        let now = Utc::now().into();
        let transaction_id = Uuid::new_v4();
        let transaction = transactions::ActiveModel {
            id: Set(transaction_id),
            tenant_id: Set(input.tenant_id),
            person_id: Set(input.person_id),
            method: Set(Self::db_method(input.method)),
            direction: Set(input.direction.into()),
            amount: Set(input.amount),
            transaction_date: Set(input.transaction_date),
            user_id: Set(input.user_id),
            bank_account_id: Set(input.bank_account_id),
            description: Set(input.description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let transaction = transaction.insert(&txn).await?;

        let links = Self::insert_links(&txn, transaction_id, &input.allocations).await?;
        for line in &input.allocations {
            DocumentRepository::recompute_paid_in_txn(&txn, line.document_id.into_inner()).await?;
        }

        Self::create_movement(&txn, &transaction).await?;

        txn.commit().await?;
        Ok(TransactionWithLinks { transaction, links })
    }

    /// Reallocates an existing transaction.
    ///
    /// Old links are removed and their documents recalculated before the
    /// new allocation is validated, so validation always sees fresh
    /// balances; the affected-document set is the union of old and new.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing, validation fails,
    /// or a database operation fails.
    pub async fn reallocate(
        &self,
        tenant_id: Uuid,
        transaction_id: Uuid,
        input: ReallocateTransactionInput,
    ) -> Result<TransactionWithLinks, TransactionError> {
        let txn = self.db.begin().await?;

        let transaction = transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))?;

        // Drop the old links and recalculate their documents down first.
        let old_links = transaction_documents::Entity::find()
            .filter(transaction_documents::Column::TransactionId.eq(transaction_id))
            .all(&txn)
            .await?;
        let mut affected: BTreeSet<Uuid> = old_links.iter().map(|l| l.document_id).collect();
        transaction_documents::Entity::delete_many()
            .filter(transaction_documents::Column::TransactionId.eq(transaction_id))
            .exec(&txn)
            .await?;
        for document_id in &affected {
            DocumentRepository::recompute_paid_in_txn(&txn, *document_id).await?;
        }

        Self::validate_against_balances(&txn, tenant_id, input.amount, &input.allocations).await?;

        let mut active: transactions::ActiveModel = transaction.into();
        active.amount = Set(input.amount);
        active.transaction_date = Set(input.transaction_date);
        active.description = Set(input.description.clone());
        active.updated_at = Set(Utc::now().into());
        let transaction = active.update(&txn).await?;

        let links = Self::insert_links(&txn, transaction_id, &input.allocations).await?;
        affected.extend(input.allocations.iter().map(|l| l.document_id.into_inner()));
        for document_id in &affected {
            DocumentRepository::recompute_paid_in_txn(&txn, *document_id).await?;
        }

        // The movement mirrors the transaction; recreate it from the new state.
        Self::delete_movements(&txn, tenant_id, transaction_id).await?;
        Self::create_movement(&txn, &transaction).await?;

        txn.commit().await?;
        Ok(TransactionWithLinks { transaction, links })
    }

    /// Reverses a transaction: documents recalculated down, movement and
    /// its journal entry deleted, links and transaction removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing or a database
    /// operation fails.
    pub async fn reverse(&self, tenant_id: Uuid, transaction_id: Uuid) -> Result<(), TransactionError> {
        let txn = self.db.begin().await?;

        let transaction = transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))?;

        let links = transaction_documents::Entity::find()
            .filter(transaction_documents::Column::TransactionId.eq(transaction_id))
            .all(&txn)
            .await?;
        transaction_documents::Entity::delete_many()
            .filter(transaction_documents::Column::TransactionId.eq(transaction_id))
            .exec(&txn)
            .await?;
        for link in &links {
            DocumentRepository::recompute_paid_in_txn(&txn, link.document_id).await?;
        }

        Self::delete_movements(&txn, tenant_id, transaction_id).await?;
        transactions::Entity::delete_by_id(transaction.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Loads the current document balances and runs the pure validation.
    async fn validate_against_balances(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        amount: Decimal,
        allocations: &[AllocationLine],
    ) -> Result<(), TransactionError> {
        let mut balances = Vec::with_capacity(allocations.len());
        for line in allocations {
            let document = documents::Entity::find_by_id(line.document_id.into_inner())
                .filter(documents::Column::TenantId.eq(tenant_id))
                .one(txn)
                .await?;
            if let Some(document) = document {
                balances.push(DocumentBalance {
                    document_id: DocumentId::from_uuid(document.id),
                    balance: document.balance,
                });
            }
        }
        validate_allocations(amount, allocations, &balances)?;
        Ok(())
    }

    async fn insert_links(
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
        allocations: &[AllocationLine],
    ) -> Result<Vec<transaction_documents::Model>, TransactionError> {
        let mut links = Vec::with_capacity(allocations.len());
        for line in allocations {
            let link = transaction_documents::ActiveModel {
                id: Set(Uuid::new_v4()),
                transaction_id: Set(transaction_id),
                document_id: Set(line.document_id.into_inner()),
                applied_amount: Set(line.amount),
            };
            links.push(link.insert(txn).await?);
        }
        Ok(links)
    }

    /// Creates the single cash or bank movement mirroring the transaction.
    async fn create_movement(
        txn: &DatabaseTransaction,
        transaction: &transactions::Model,
    ) -> Result<(), TransactionError> {
        let direction: MovementDirection = transaction.direction.clone().into();
        let description = transaction.description.clone().unwrap_or_else(|| {
            match direction {
                MovementDirection::In => "Cobro de documentos".to_string(),
                MovementDirection::Out => "Pago de documentos".to_string(),
            }
        });

        match &transaction.method {
            DbPaymentMethod::Cash => {
                let session = CashMovementRepository::find_open_session(
                    txn,
                    transaction.tenant_id,
                    transaction.user_id,
                )
                .await?
                .ok_or(TransactionError::Allocation(AllocationError::NoOpenCashSession))?;

                CashMovementRepository::create_in_txn(
                    txn,
                    CreateCashMovementInput {
                        tenant_id: transaction.tenant_id,
                        cash_session_id: session.id,
                        direction,
                        amount: transaction.amount,
                        movement_date: transaction.transaction_date,
                        description,
                        person_id: transaction.person_id,
                        transaction_id: Some(transaction.id),
                    },
                )
                .await?;
            }
            DbPaymentMethod::Transfer => {
                let bank_account_id = transaction
                    .bank_account_id
                    .ok_or(TransactionError::Allocation(AllocationError::MissingBankAccount))?;

                // The single counterpart split posts against the person's
                // receivable/payable account.
                let split_account = match transaction.person_id {
                    Some(person_id) => {
                        let person = people::Entity::find_by_id(person_id)
                            .one(txn)
                            .await?
                            .ok_or(TransactionError::PersonNotFound(person_id))?;
                        match direction {
                            MovementDirection::In => person.receivable_account_id,
                            MovementDirection::Out => person.payable_account_id,
                        }
                    }
                    None => None,
                };

                BankMovementRepository::create_in_txn(
                    txn,
                    CreateBankMovementInput {
                        tenant_id: transaction.tenant_id,
                        bank_account_id,
                        direction,
                        movement_date: transaction.transaction_date,
                        description,
                        details: vec![BankDetailInput {
                            account_id: split_account,
                            amount: transaction.amount,
                            person_id: transaction.person_id,
                            cost_center_id: None,
                        }],
                        transaction_id: Some(transaction.id),
                    },
                )
                .await?;
            }
        }
        Ok(())
    }

    /// Deletes the movement(s) linked to a transaction together with their
    /// journal entries.
    async fn delete_movements(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), TransactionError> {
        let cash = cash_movements::Entity::find()
            .filter(cash_movements::Column::TransactionId.eq(transaction_id))
            .all(txn)
            .await?;
        for movement in cash {
            CashMovementRepository::delete_in_txn(txn, tenant_id, movement.id).await?;
        }

        let bank = bank_movements::Entity::find()
            .filter(bank_movements::Column::TransactionId.eq(transaction_id))
            .all(txn)
            .await?;
        for movement in bank {
            BankMovementRepository::delete_in_txn(txn, tenant_id, movement.id).await?;
        }
        Ok(())
    }

    const fn db_method(method: PaymentMethod) -> DbPaymentMethod {
        match method {
            PaymentMethod::Cash => DbPaymentMethod::Cash,
            PaymentMethod::Transfer => DbPaymentMethod::Transfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_mapping() {
        assert_eq!(
            TransactionRepository::db_method(PaymentMethod::Cash),
            sea_orm_active_enums::PaymentMethod::Cash
        );
        assert_eq!(
            TransactionRepository::db_method(PaymentMethod::Transfer),
            sea_orm_active_enums::PaymentMethod::Transfer
        );
    }
}

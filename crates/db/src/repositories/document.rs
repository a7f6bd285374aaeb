//! Document repository.
//!
//! A document, its children (items, payment terms), its fiscal record, and
//! its journal entry are one atomic unit: every create/update/delete runs
//! inside a single database transaction. Children are replaced wholesale
//! on edit (delete-all, re-insert) rather than diffed, and header totals
//! are always recomputed from the item rows so they cannot drift.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use balanza_core::accounting::{
    AccountingError, DocumentItemLine, DocumentSnapshot, DocumentTaxLine, document_posting,
};
use balanza_core::document::{DocumentTotals, ItemAmounts, recompute_balance};
use balanza_core::ledger::SourceKind;
use balanza_shared::types::money::round_money;
use balanza_shared::types::{AccountId, PersonId};

use crate::entities::{
    document_fiscal_infos, document_items, document_payments, documents, people, tenants,
    sea_orm_active_enums::{DocumentKind, DocumentStatus, PaymentMethod, SriStatus},
    transaction_documents,
};
use crate::repositories::journal::{JournalError, JournalRepository};

/// Error types for document operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(Uuid),

    /// Tenant not found.
    #[error("Tenant not found: {0}")]
    TenantNotFound(Uuid),

    /// Person not found.
    #[error("Person not found: {0}")]
    PersonNotFound(Uuid),

    /// Voided documents cannot be modified.
    #[error("Cannot modify voided document")]
    CannotModifyVoid,

    /// Accountant rejected the document (missing account configuration).
    #[error(transparent)]
    Accounting(#[from] AccountingError),

    /// Posting failed.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for one document item.
#[derive(Debug, Clone)]
pub struct DocumentItemInput {
    /// Item description.
    pub description: String,
    /// Revenue/expense account.
    pub account_id: Option<Uuid>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Discount on this item.
    pub discount: Decimal,
    /// Tax amount on this item.
    pub tax_amount: Decimal,
    /// Tax account the tax posts to.
    pub tax_account_id: Option<Uuid>,
    /// Optional cost center tag.
    pub cost_center_id: Option<Uuid>,
}

impl DocumentItemInput {
    /// Gross amount before discount, rounded to money precision
    /// (quantity and unit price carry four decimal places).
    #[must_use]
    pub fn gross_amount(&self) -> Decimal {
        round_money(self.quantity * self.unit_price)
    }

    /// Net amount after discount (what the item line posts).
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        self.gross_amount() - self.discount
    }
}

/// Input for one payment-term row.
#[derive(Debug, Clone)]
pub struct DocumentPaymentInput {
    /// Payment method.
    pub method: PaymentMethod,
    /// Amount.
    pub amount: Decimal,
    /// Agreed term in days.
    pub term_days: Option<i32>,
}

/// Input for creating a document.
#[derive(Debug, Clone)]
pub struct CreateDocumentInput {
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// Document kind.
    pub kind: DocumentKind,
    /// Counterparty.
    pub person_id: Uuid,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// External reference (used for non-fiscal documents; fiscal documents
    /// take their legal number from the assigned sequence).
    pub reference: Option<String>,
    /// Item rows.
    pub items: Vec<DocumentItemInput>,
    /// Payment-term rows.
    pub payments: Vec<DocumentPaymentInput>,
}

/// Input for updating a document.
#[derive(Debug, Clone)]
pub struct UpdateDocumentInput {
    /// New issue date.
    pub issue_date: NaiveDate,
    /// New item rows (replace the previous set wholesale).
    pub items: Vec<DocumentItemInput>,
    /// New payment-term rows (replace the previous set wholesale).
    pub payments: Vec<DocumentPaymentInput>,
}

/// A document with its children.
#[derive(Debug, Clone)]
pub struct DocumentWithChildren {
    /// Document header.
    pub document: documents::Model,
    /// Item rows.
    pub items: Vec<document_items::Model>,
    /// Payment-term rows.
    pub payments: Vec<document_payments::Model>,
    /// Fiscal record, for fiscal document kinds.
    pub fiscal_info: Option<document_fiscal_infos::Model>,
}

/// Document repository.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a document with its children, fiscal record, and journal
    /// entry, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant or person is missing, the accountant
    /// rejects the document, or a database operation fails.
    pub async fn create(
        &self,
        input: CreateDocumentInput,
    ) -> Result<DocumentWithChildren, DocumentError> {
        let txn = self.db.begin().await?;

        let tenant = tenants::Entity::find_by_id(input.tenant_id)
            .one(&txn)
            .await?
            .ok_or(DocumentError::TenantNotFound(input.tenant_id))?;

        let totals = Self::totals_of(&input.items);
        let now = Utc::now().into();
        let document_id = Uuid::new_v4();

        // Fiscal documents get their legal number from the next sequence.
        let is_fiscal = balanza_core::accounting::DocumentKind::from(input.kind.clone()).is_fiscal();
        let sequence = if is_fiscal {
            Some(Self::next_sequence(&txn, input.tenant_id, &input.kind).await?)
        } else {
            None
        };

        let reference = sequence.map_or_else(
            || input.reference.clone().unwrap_or_default(),
            |seq| {
                format!(
                    "{}-{}-{:09}",
                    tenant.establishment_code, tenant.emission_point_code, seq
                )
            },
        );

        let document = documents::ActiveModel {
            id: Set(document_id),
            tenant_id: Set(input.tenant_id),
            kind: Set(input.kind.clone()),
            person_id: Set(input.person_id),
            issue_date: Set(input.issue_date),
            reference: Set(reference),
            status: Set(DocumentStatus::Issued),
            subtotal: Set(totals.subtotal),
            tax_total: Set(totals.tax_total),
            discount: Set(totals.discount),
            total: Set(totals.total),
            paid_amount: Set(Decimal::ZERO),
            balance: Set(totals.total),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let document = document.insert(&txn).await?;

        let fiscal_info = if let Some(sequence) = sequence {
            let info = document_fiscal_infos::ActiveModel {
                id: Set(Uuid::new_v4()),
                tenant_id: Set(input.tenant_id),
                document_id: Set(document_id),
                establishment: Set(tenant.establishment_code.clone()),
                emission_point: Set(tenant.emission_point_code.clone()),
                sequence: Set(sequence),
                access_key: Set(None),
                signed_xml_key: Set(None),
                authorization_number: Set(None),
                authorization_date: Set(None),
                sri_status: Set(SriStatus::Draft),
                last_response: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            Some(info.insert(&txn).await?)
        } else {
            None
        };

        let items = Self::insert_children(&txn, document_id, &input.items, &input.payments).await?;
        Self::post_entry(&txn, &document, &items).await?;

        let payments = document_payments::Entity::find()
            .filter(document_payments::Column::DocumentId.eq(document_id))
            .all(&txn)
            .await?;

        txn.commit().await?;

        Ok(DocumentWithChildren {
            document,
            items,
            payments,
            fiscal_info,
        })
    }

    /// Updates a document: children replaced wholesale, totals recomputed,
    /// journal entry replaced, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or void, the accountant
    /// rejects the new state, or a database operation fails.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
        input: UpdateDocumentInput,
    ) -> Result<DocumentWithChildren, DocumentError> {
        let txn = self.db.begin().await?;

        let document = documents::Entity::find_by_id(document_id)
            .filter(documents::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            .ok_or(DocumentError::NotFound(document_id))?;

        if document.status == DocumentStatus::Void {
            return Err(DocumentError::CannotModifyVoid);
        }

        // Wholesale replace of children.
        document_items::Entity::delete_many()
            .filter(document_items::Column::DocumentId.eq(document_id))
            .exec(&txn)
            .await?;
        document_payments::Entity::delete_many()
            .filter(document_payments::Column::DocumentId.eq(document_id))
            .exec(&txn)
            .await?;
        let items = Self::insert_children(&txn, document_id, &input.items, &input.payments).await?;

        let totals = Self::totals_of(&input.items);
        // Paid amount survives the edit; balance follows the new total.
        let paid = document.paid_amount;
        let mut active: documents::ActiveModel = document.into();
        active.issue_date = Set(input.issue_date);
        active.subtotal = Set(totals.subtotal);
        active.tax_total = Set(totals.tax_total);
        active.discount = Set(totals.discount);
        active.total = Set(totals.total);
        active.balance = Set(recompute_balance(totals.total, paid));
        active.updated_at = Set(Utc::now().into());
        let document = active.update(&txn).await?;

        Self::post_entry(&txn, &document, &items).await?;

        let payments = document_payments::Entity::find()
            .filter(document_payments::Column::DocumentId.eq(document_id))
            .all(&txn)
            .await?;
        let fiscal_info = document_fiscal_infos::Entity::find()
            .filter(document_fiscal_infos::Column::DocumentId.eq(document_id))
            .one(&txn)
            .await?;

        txn.commit().await?;

        Ok(DocumentWithChildren {
            document,
            items,
            payments,
            fiscal_info,
        })
    }

    /// Deletes a document with its children, fiscal record, allocation
    /// links, and journal entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or a database operation
    /// fails.
    pub async fn delete(&self, tenant_id: Uuid, document_id: Uuid) -> Result<(), DocumentError> {
        let txn = self.db.begin().await?;

        let document = documents::Entity::find_by_id(document_id)
            .filter(documents::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            .ok_or(DocumentError::NotFound(document_id))?;

        JournalRepository::delete_for_source(&txn, tenant_id, SourceKind::Document, document.id)
            .await?;
        document_items::Entity::delete_many()
            .filter(document_items::Column::DocumentId.eq(document.id))
            .exec(&txn)
            .await?;
        document_payments::Entity::delete_many()
            .filter(document_payments::Column::DocumentId.eq(document.id))
            .exec(&txn)
            .await?;
        document_fiscal_infos::Entity::delete_many()
            .filter(document_fiscal_infos::Column::DocumentId.eq(document.id))
            .exec(&txn)
            .await?;
        transaction_documents::Entity::delete_many()
            .filter(transaction_documents::Column::DocumentId.eq(document.id))
            .exec(&txn)
            .await?;
        documents::Entity::delete_by_id(document.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Loads a document with its children.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or a query fails.
    pub async fn get(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
    ) -> Result<DocumentWithChildren, DocumentError> {
        let document = documents::Entity::find_by_id(document_id)
            .filter(documents::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .ok_or(DocumentError::NotFound(document_id))?;

        let items = document_items::Entity::find()
            .filter(document_items::Column::DocumentId.eq(document_id))
            .all(&self.db)
            .await?;
        let payments = document_payments::Entity::find()
            .filter(document_payments::Column::DocumentId.eq(document_id))
            .all(&self.db)
            .await?;
        let fiscal_info = document_fiscal_infos::Entity::find()
            .filter(document_fiscal_infos::Column::DocumentId.eq(document_id))
            .one(&self.db)
            .await?;

        Ok(DocumentWithChildren {
            document,
            items,
            payments,
            fiscal_info,
        })
    }

    /// Recomputes a document's `paid_amount` as the aggregate over all its
    /// allocation links and refreshes its balance.
    ///
    /// Aggregate recompute (never an incremental add) keeps repeated
    /// reallocations of the same document idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or a database operation
    /// fails.
    pub async fn recompute_paid_in_txn(
        txn: &DatabaseTransaction,
        document_id: Uuid,
    ) -> Result<documents::Model, DocumentError> {
        let document = documents::Entity::find_by_id(document_id)
            .one(txn)
            .await?
            .ok_or(DocumentError::NotFound(document_id))?;

        let links = transaction_documents::Entity::find()
            .filter(transaction_documents::Column::DocumentId.eq(document_id))
            .all(txn)
            .await?;
        let applied: Vec<Decimal> = links.iter().map(|l| l.applied_amount).collect();
        let paid = balanza_core::document::paid_from_applications(&applied);

        let total = document.total;
        let mut active: documents::ActiveModel = document.into();
        active.paid_amount = Set(paid);
        active.balance = Set(recompute_balance(total, paid));
        active.updated_at = Set(Utc::now().into());
        let document = active.update(txn).await?;
        Ok(document)
    }

    /// Flips a document's business status to confirmed (called by the
    /// fiscal pipeline on authorization).
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or the update fails.
    pub async fn mark_confirmed<C: ConnectionTrait>(
        conn: &C,
        tenant_id: Uuid,
        document_id: Uuid,
    ) -> Result<(), DocumentError> {
        let document = documents::Entity::find_by_id(document_id)
            .filter(documents::Column::TenantId.eq(tenant_id))
            .one(conn)
            .await?
            .ok_or(DocumentError::NotFound(document_id))?;

        let mut active: documents::ActiveModel = document.into();
        active.status = Set(DocumentStatus::Confirmed);
        active.updated_at = Set(Utc::now().into());
        active.update(conn).await?;
        Ok(())
    }

    /// Header totals recomputed from item inputs.
    fn totals_of(items: &[DocumentItemInput]) -> DocumentTotals {
        let amounts: Vec<ItemAmounts> = items
            .iter()
            .map(|i| ItemAmounts {
                net: i.gross_amount(),
                discount: i.discount,
                tax: i.tax_amount,
            })
            .collect();
        DocumentTotals::from_items(&amounts)
    }

    /// Next legal sequence for a tenant and document kind.
    async fn next_sequence(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        kind: &DocumentKind,
    ) -> Result<i64, DocumentError> {
        let last = document_fiscal_infos::Entity::find()
            .filter(document_fiscal_infos::Column::TenantId.eq(tenant_id))
            .inner_join(documents::Entity)
            .filter(documents::Column::Kind.eq(kind.clone()))
            .order_by_desc(document_fiscal_infos::Column::Sequence)
            .limit(1)
            .one(txn)
            .await?;
        Ok(last.map_or(1, |info| info.sequence + 1))
    }

    async fn insert_children(
        txn: &DatabaseTransaction,
        document_id: Uuid,
        items: &[DocumentItemInput],
        payments: &[DocumentPaymentInput],
    ) -> Result<Vec<document_items::Model>, DocumentError> {
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let row = document_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                document_id: Set(document_id),
                description: Set(item.description.clone()),
                account_id: Set(item.account_id),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                net_amount: Set(item.net_amount()),
                discount: Set(item.discount),
                tax_amount: Set(item.tax_amount),
                tax_account_id: Set(item.tax_account_id),
                cost_center_id: Set(item.cost_center_id),
            };
            rows.push(row.insert(txn).await?);
        }
        for payment in payments {
            let row = document_payments::ActiveModel {
                id: Set(Uuid::new_v4()),
                document_id: Set(document_id),
                method: Set(payment.method.clone()),
                amount: Set(payment.amount),
                term_days: Set(payment.term_days),
            };
            row.insert(txn).await?;
        }
        Ok(rows)
    }

    /// Gathers the document's read-state and replaces its journal entry.
    async fn post_entry(
        txn: &DatabaseTransaction,
        document: &documents::Model,
        items: &[document_items::Model],
    ) -> Result<(), DocumentError> {
        let person = people::Entity::find_by_id(document.person_id)
            .one(txn)
            .await?
            .ok_or(DocumentError::PersonNotFound(document.person_id))?;

        let kind: balanza_core::accounting::DocumentKind = document.kind.clone().into();
        let counterparty_account = match kind {
            balanza_core::accounting::DocumentKind::PurchaseInvoice => person.payable_account_id,
            _ => person.receivable_account_id,
        };

        // Tax lines aggregated per tax account.
        let mut taxes_by_account: HashMap<Option<Uuid>, Decimal> = HashMap::new();
        for item in items {
            if item.tax_amount > Decimal::ZERO {
                *taxes_by_account.entry(item.tax_account_id).or_default() += item.tax_amount;
            }
        }

        let snapshot = DocumentSnapshot {
            document_id: document.id,
            kind,
            date: document.issue_date,
            reference: document.reference.clone(),
            person_id: Some(PersonId::from_uuid(person.id)),
            counterparty_account: counterparty_account.map(AccountId::from_uuid),
            total: document.total,
            items: items
                .iter()
                .map(|i| DocumentItemLine {
                    account_id: i.account_id.map(AccountId::from_uuid),
                    net_amount: i.net_amount,
                    cost_center_id: i.cost_center_id.map(balanza_shared::types::CostCenterId::from_uuid),
                })
                .collect(),
            taxes: taxes_by_account
                .into_iter()
                .map(|(account_id, amount)| DocumentTaxLine {
                    account_id: account_id.map(AccountId::from_uuid),
                    amount,
                })
                .collect(),
        };
        let request = document_posting(&snapshot)?;

        JournalRepository::replace(txn, document.tenant_id, SourceKind::Document, document.id, &request)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, unit_price: Decimal, discount: Decimal, tax: Decimal) -> DocumentItemInput {
        DocumentItemInput {
            description: "item".to_string(),
            account_id: Some(Uuid::new_v4()),
            quantity,
            unit_price,
            discount,
            tax_amount: tax,
            tax_account_id: Some(Uuid::new_v4()),
            cost_center_id: None,
        }
    }

    #[test]
    fn test_item_amounts() {
        let i = item(dec!(2), dec!(30.00), dec!(5.00), dec!(6.60));
        assert_eq!(i.gross_amount(), dec!(60.00));
        assert_eq!(i.net_amount(), dec!(55.00));
    }

    /// Fractional quantities round to money precision before posting.
    #[test]
    fn test_fractional_quantity_rounds() {
        let i = item(dec!(1.3333), dec!(7.5000), dec!(0.00), dec!(0.00));
        // 1.3333 * 7.5000 = 9.99975 -> 10.00
        assert_eq!(i.gross_amount(), dec!(10.00));
    }

    #[test]
    fn test_header_totals_match_items() {
        let items = vec![
            item(dec!(2), dec!(30.00), dec!(5.00), dec!(6.60)),
            item(dec!(1), dec!(40.00), dec!(0.00), dec!(4.80)),
        ];
        let totals = DocumentRepository::totals_of(&items);
        assert_eq!(totals.subtotal, dec!(100.00));
        assert_eq!(totals.discount, dec!(5.00));
        assert_eq!(totals.tax_total, dec!(11.40));
        assert_eq!(totals.total, dec!(106.40));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;
        use rust_decimal::Decimal;
        use rust_decimal_macros::dec;

        /// Header totals always satisfy `total = subtotal - discount + tax`.
        fn item_strategy() -> impl Strategy<Value = DocumentItemInput> {
            (1i64..100_000i64, 0i64..1_000i64, 0i64..10_000i64).prop_map(
                |(price_cents, discount_cents, tax_cents)| {
                    item(
                        dec!(1),
                        Decimal::new(price_cents, 2),
                        Decimal::new(discount_cents.min(price_cents), 2),
                        Decimal::new(tax_cents, 2),
                    )
                },
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_totals_identity(items in proptest::collection::vec(item_strategy(), 1..6)) {
                let totals = DocumentRepository::totals_of(&items);
                prop_assert_eq!(
                    totals.total,
                    totals.subtotal - totals.discount + totals.tax_total
                );
            }
        }
    }
}

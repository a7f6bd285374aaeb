//! `SeaORM` Entity for business documents table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{DocumentKind, DocumentStatus};

/// A business document (invoice, credit note, withholding, purchase).
/// Invariant: `balance == total - paid_amount`, always recomputed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub kind: DocumentKind,
    pub person_id: Uuid,
    pub issue_date: Date,
    /// Legal number or human-readable reference.
    pub reference: String,
    pub status: DocumentStatus,
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub paid_amount: Decimal,
    pub balance: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id"
    )]
    Tenants,
    #[sea_orm(
        belongs_to = "super::people::Entity",
        from = "Column::PersonId",
        to = "super::people::Column::Id"
    )]
    People,
    #[sea_orm(has_many = "super::document_items::Entity")]
    DocumentItems,
    #[sea_orm(has_many = "super::document_payments::Entity")]
    DocumentPayments,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl Related<super::people::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::People.def()
    }
}

impl Related<super::document_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentItems.def()
    }
}

impl Related<super::document_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

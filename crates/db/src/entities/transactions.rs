//! `SeaORM` Entity for payment/receipt transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{MovementDirection, PaymentMethod};

/// A payment or receipt that fans out to N document balance updates and
/// exactly one of {cash movement, bank movement}. Invariant: the sum of
/// per-document applied amounts equals the transaction amount within the
/// allocation tolerance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub person_id: Option<Uuid>,
    pub method: PaymentMethod,
    /// Receipt (money in) or payment (money out).
    pub direction: MovementDirection,
    pub amount: Decimal,
    pub transaction_date: Date,
    /// The user who recorded the transaction (selects the cash session).
    pub user_id: Uuid,
    /// Target bank account for transfer transactions.
    pub bank_account_id: Option<Uuid>,
    pub description: Option<String>,
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
    #[sea_orm(has_many = "super::transaction_documents::Entity")]
    TransactionDocuments,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl Related<super::transaction_documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

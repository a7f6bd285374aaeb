//! `SeaORM` Entity for document items table.
//!
//! Items are replaced wholesale on document edit (delete-all, re-insert).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "document_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub document_id: Uuid,
    pub description: String,
    /// Revenue/expense account for this item.
    pub account_id: Option<Uuid>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Net amount after discount (`quantity * unit_price - discount`).
    pub net_amount: Decimal,
    pub discount: Decimal,
    pub tax_amount: Decimal,
    /// Tax account the tax amount posts to.
    pub tax_account_id: Option<Uuid>,
    pub cost_center_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::documents::Entity",
        from = "Column::DocumentId",
        to = "super::documents::Column::Id"
    )]
    Documents,
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

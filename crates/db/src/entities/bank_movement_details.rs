//! `SeaORM` Entity for bank movement detail splits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_movement_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bank_movement_id: Uuid,
    /// Counterpart account for this split.
    pub account_id: Option<Uuid>,
    pub amount: Decimal,
    pub person_id: Option<Uuid>,
    pub cost_center_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bank_movements::Entity",
        from = "Column::BankMovementId",
        to = "super::bank_movements::Column::Id"
    )]
    BankMovements,
}

impl Related<super::bank_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for document fiscal authorization records.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::SriStatus;

/// One per fiscal document. The `sri_status` column is the durable source
/// of truth for how far the authorization pipeline has progressed; every
/// transition is persisted in its own short write.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "document_fiscal_infos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub document_id: Uuid,
    /// Establishment code (first segment of the legal number).
    pub establishment: String,
    /// Emission point code (second segment of the legal number).
    pub emission_point: String,
    /// Sequential number (third segment of the legal number).
    pub sequence: i64,
    /// 49-digit access key extracted from the signed XML.
    pub access_key: Option<String>,
    /// Blob-storage key of the signed XML.
    pub signed_xml_key: Option<String>,
    pub authorization_number: Option<String>,
    pub authorization_date: Option<DateTimeWithTimeZone>,
    pub sri_status: SriStatus,
    /// Raw text of the authority's last response, for audit and retry.
    pub last_response: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::documents::Entity",
        from = "Column::DocumentId",
        to = "super::documents::Column::Id"
    )]
    Documents,
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id"
    )]
    Tenants,
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Formats the legal document number
    /// (`establishment-emission_point-sequence`).
    #[must_use]
    pub fn legal_number(&self) -> String {
        format!(
            "{}-{}-{:09}",
            self.establishment, self.emission_point, self.sequence
        )
    }
}

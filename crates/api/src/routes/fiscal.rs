//! Fiscal authorization routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use balanza_core::fiscal::SriStatus;
use balanza_db::repositories::FiscalInfoRepository;

use crate::error::ApiError;
use crate::middleware::Tenant;
use crate::AppState;

/// Creates the fiscal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents/{document_id}/send", post(send_document))
        .route("/documents/{document_id}/regenerate", post(regenerate_document))
        .route("/documents/{document_id}/fiscal", get(get_fiscal_info))
}

/// Response for the fiscal record of a document.
#[derive(Debug, Serialize)]
pub struct FiscalInfoResponse {
    /// Legal document number.
    pub legal_number: String,
    /// Access key, once signed.
    pub access_key: Option<String>,
    /// Authorization status.
    pub sri_status: String,
    /// Authorization number, once authorized.
    pub authorization_number: Option<String>,
    /// Authorization timestamp, once authorized.
    pub authorization_date: Option<String>,
}

/// Drives the document through the authorization pipeline as far as it
/// can go right now.
async fn send_document(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.pipeline.advance(tenant_id, document_id).await?;
    Ok(Json(json!({
        "status": outcome.status.as_str(),
        "authorization_number": outcome.authorization_number,
        "authorization_date": outcome.authorization_date,
    })))
}

/// Starts a fresh authorization cycle for a rejected document.
async fn regenerate_document(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = FiscalInfoRepository::new((*state.db).clone());
    let info = repo.regenerate(tenant_id, document_id).await?;
    let legal_number = info.legal_number();
    Ok(Json(json!({
        "status": SriStatus::from(info.sri_status).as_str(),
        "legal_number": legal_number,
    })))
}

async fn get_fiscal_info(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = FiscalInfoRepository::new((*state.db).clone());
    let info = repo.find_by_document(tenant_id, document_id).await?;
    Ok(Json(FiscalInfoResponse {
        legal_number: info.legal_number(),
        access_key: info.access_key.clone(),
        sri_status: SriStatus::from(info.sri_status).as_str().to_string(),
        authorization_number: info.authorization_number,
        authorization_date: info.authorization_date.map(|d| d.to_rfc3339()),
    }))
}

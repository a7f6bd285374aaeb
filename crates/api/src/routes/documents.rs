//! Document management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use balanza_db::entities::sea_orm_active_enums::{DocumentKind, PaymentMethod};
use balanza_db::repositories::document::{
    CreateDocumentInput, DocumentItemInput, DocumentPaymentInput, DocumentRepository,
    DocumentWithChildren, UpdateDocumentInput,
};

use crate::error::ApiError;
use crate::middleware::Tenant;
use crate::AppState;

/// Creates the document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", post(create_document))
        .route("/documents/{document_id}", get(get_document))
        .route("/documents/{document_id}", patch(update_document))
        .route("/documents/{document_id}", delete(delete_document))
}

/// Request body for one item row.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    /// Item description.
    pub description: String,
    /// Revenue/expense account.
    pub account_id: Option<Uuid>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Discount.
    #[serde(default)]
    pub discount: Decimal,
    /// Tax amount.
    #[serde(default)]
    pub tax_amount: Decimal,
    /// Tax account.
    pub tax_account_id: Option<Uuid>,
    /// Cost center tag.
    pub cost_center_id: Option<Uuid>,
}

/// Request body for one payment-term row.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Payment method: "cash" or "transfer".
    pub method: PaymentMethod,
    /// Amount.
    pub amount: Decimal,
    /// Term in days.
    pub term_days: Option<i32>,
}

/// Request body for creating a document.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    /// Document kind.
    pub kind: DocumentKind,
    /// Counterparty.
    pub person_id: Uuid,
    /// Issue date (YYYY-MM-DD).
    pub issue_date: NaiveDate,
    /// External reference for non-fiscal documents.
    pub reference: Option<String>,
    /// Item rows.
    pub items: Vec<ItemRequest>,
    /// Payment-term rows.
    #[serde(default)]
    pub payments: Vec<PaymentRequest>,
}

/// Request body for updating a document.
#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    /// New issue date.
    pub issue_date: NaiveDate,
    /// New item rows.
    pub items: Vec<ItemRequest>,
    /// New payment-term rows.
    #[serde(default)]
    pub payments: Vec<PaymentRequest>,
}

/// Response for a document.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    /// Document id.
    pub id: Uuid,
    /// Document kind.
    pub kind: DocumentKind,
    /// Legal number or reference.
    pub reference: String,
    /// Business status.
    pub status: String,
    /// Subtotal.
    pub subtotal: Decimal,
    /// Tax total.
    pub tax_total: Decimal,
    /// Discount.
    pub discount: Decimal,
    /// Total.
    pub total: Decimal,
    /// Paid amount.
    pub paid_amount: Decimal,
    /// Open balance.
    pub balance: Decimal,
    /// Fiscal authorization status, for fiscal kinds.
    pub sri_status: Option<String>,
    /// Number of item rows.
    pub item_count: usize,
}

impl DocumentResponse {
    fn from_result(result: &DocumentWithChildren) -> Self {
        Self {
            id: result.document.id,
            kind: result.document.kind.clone(),
            reference: result.document.reference.clone(),
            status: format!("{:?}", result.document.status).to_lowercase(),
            subtotal: result.document.subtotal,
            tax_total: result.document.tax_total,
            discount: result.document.discount,
            total: result.document.total,
            paid_amount: result.document.paid_amount,
            balance: result.document.balance,
            sri_status: result
                .fiscal_info
                .as_ref()
                .map(|f| balanza_core::fiscal::SriStatus::from(f.sri_status.clone()).to_string()),
            item_count: result.items.len(),
        }
    }
}

fn items_of(items: Vec<ItemRequest>) -> Vec<DocumentItemInput> {
    items
        .into_iter()
        .map(|i| DocumentItemInput {
            description: i.description,
            account_id: i.account_id,
            quantity: i.quantity,
            unit_price: i.unit_price,
            discount: i.discount,
            tax_amount: i.tax_amount,
            tax_account_id: i.tax_account_id,
            cost_center_id: i.cost_center_id,
        })
        .collect()
}

fn payments_of(payments: Vec<PaymentRequest>) -> Vec<DocumentPaymentInput> {
    payments
        .into_iter()
        .map(|p| DocumentPaymentInput {
            method: p.method,
            amount: p.amount,
            term_days: p.term_days,
        })
        .collect()
}

async fn create_document(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone());
    let result = repo
        .create(CreateDocumentInput {
            tenant_id,
            kind: request.kind,
            person_id: request.person_id,
            issue_date: request.issue_date,
            reference: request.reference,
            items: items_of(request.items),
            payments: payments_of(request.payments),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse::from_result(&result)),
    ))
}

async fn get_document(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone());
    let result = repo.get(tenant_id, document_id).await?;
    Ok(Json(DocumentResponse::from_result(&result)))
}

async fn update_document(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(document_id): Path<Uuid>,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone());
    let result = repo
        .update(
            tenant_id,
            document_id,
            UpdateDocumentInput {
                issue_date: request.issue_date,
                items: items_of(request.items),
                payments: payments_of(request.payments),
            },
        )
        .await?;
    Ok(Json(DocumentResponse::from_result(&result)))
}

async fn delete_document(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone());
    repo.delete(tenant_id, document_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

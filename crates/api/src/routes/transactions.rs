//! Transaction (payment/receipt) routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use balanza_core::accounting::MovementDirection;
use balanza_core::allocation::{AllocationLine, PaymentMethod};
use balanza_db::repositories::allocation::{
    AllocateTransactionInput, ReallocateTransactionInput, TransactionRepository,
    TransactionWithLinks,
};
use balanza_shared::types::DocumentId;

use crate::error::ApiError;
use crate::middleware::Tenant;
use crate::AppState;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions/{transaction_id}", patch(update_transaction))
        .route("/transactions/{transaction_id}", delete(delete_transaction))
}

/// One allocation slice in a request.
#[derive(Debug, Deserialize)]
pub struct AllocationRequest {
    /// Target document.
    pub document_id: Uuid,
    /// Amount applied to it.
    pub amount: Decimal,
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Counterparty.
    pub person_id: Option<Uuid>,
    /// Payment method: "cash" or "transfer".
    pub method: PaymentMethod,
    /// Direction: "in" (receipt) or "out" (payment).
    pub direction: MovementDirection,
    /// Transaction amount.
    pub amount: Decimal,
    /// Transaction date (YYYY-MM-DD).
    pub transaction_date: NaiveDate,
    /// The recording user.
    pub user_id: Uuid,
    /// Target bank account (transfers only).
    pub bank_account_id: Option<Uuid>,
    /// Free-text description.
    pub description: Option<String>,
    /// Allocation slices.
    pub allocations: Vec<AllocationRequest>,
}

/// Request body for updating a transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New amount.
    pub amount: Decimal,
    /// New date.
    pub transaction_date: NaiveDate,
    /// New description.
    pub description: Option<String>,
    /// New allocation slices.
    pub allocations: Vec<AllocationRequest>,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction id.
    pub id: Uuid,
    /// Amount.
    pub amount: Decimal,
    /// Allocation slices as `(document_id, applied_amount)` pairs.
    pub allocations: Vec<(Uuid, Decimal)>,
}

impl TransactionResponse {
    fn from_result(result: &TransactionWithLinks) -> Self {
        Self {
            id: result.transaction.id,
            amount: result.transaction.amount,
            allocations: result
                .links
                .iter()
                .map(|l| (l.document_id, l.applied_amount))
                .collect(),
        }
    }
}

fn lines_of(allocations: Vec<AllocationRequest>) -> Vec<AllocationLine> {
    allocations
        .into_iter()
        .map(|a| AllocationLine {
            document_id: DocumentId::from_uuid(a.document_id),
            amount: a.amount,
        })
        .collect()
}

async fn create_transaction(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TransactionRepository::new((*state.db).clone());
    let result = repo
        .allocate(AllocateTransactionInput {
            tenant_id,
            person_id: request.person_id,
            method: request.method,
            direction: request.direction,
            amount: request.amount,
            transaction_date: request.transaction_date,
            user_id: request.user_id,
            bank_account_id: request.bank_account_id,
            description: request.description,
            allocations: lines_of(request.allocations),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::from_result(&result)),
    ))
}

async fn update_transaction(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TransactionRepository::new((*state.db).clone());
    let result = repo
        .reallocate(
            tenant_id,
            transaction_id,
            ReallocateTransactionInput {
                amount: request.amount,
                transaction_date: request.transaction_date,
                description: request.description,
                allocations: lines_of(request.allocations),
            },
        )
        .await?;
    Ok(Json(TransactionResponse::from_result(&result)))
}

async fn delete_transaction(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(transaction_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TransactionRepository::new((*state.db).clone());
    repo.reverse(tenant_id, transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

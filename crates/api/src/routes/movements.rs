//! Cash and bank movement routes.

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
use balanza_db::repositories::bank_movement::{
    BankDetailInput, BankMovementRepository, CreateBankMovementInput,
};
use balanza_db::repositories::cash_movement::{
    CashMovementRepository, CreateCashMovementInput, UpdateCashMovementInput,
};

use crate::error::ApiError;
use crate::middleware::Tenant;
use crate::AppState;

/// Creates the movement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cash-movements", post(create_cash_movement))
        .route("/cash-movements/{movement_id}", patch(update_cash_movement))
        .route("/cash-movements/{movement_id}", delete(delete_cash_movement))
        .route("/bank-movements", post(create_bank_movement))
        .route("/bank-movements/{movement_id}", patch(update_bank_movement))
        .route("/bank-movements/{movement_id}", delete(delete_bank_movement))
}

/// Request body for creating a cash movement.
#[derive(Debug, Deserialize)]
pub struct CreateCashMovementRequest {
    /// The open session the movement belongs to.
    pub cash_session_id: Uuid,
    /// Direction: "in" or "out".
    pub direction: MovementDirection,
    /// Amount.
    pub amount: Decimal,
    /// Movement date.
    pub movement_date: NaiveDate,
    /// Free-text concept.
    pub description: String,
    /// Counterparty.
    pub person_id: Option<Uuid>,
}

/// Request body for updating a cash movement.
#[derive(Debug, Deserialize)]
pub struct UpdateCashMovementRequest {
    /// New direction.
    pub direction: MovementDirection,
    /// New amount.
    pub amount: Decimal,
    /// New date.
    pub movement_date: NaiveDate,
    /// New description.
    pub description: String,
    /// New counterparty.
    pub person_id: Option<Uuid>,
}

/// One detail split in a bank movement request.
#[derive(Debug, Deserialize)]
pub struct BankDetailRequest {
    /// Counterpart account.
    pub account_id: Option<Uuid>,
    /// Split amount.
    pub amount: Decimal,
    /// Counterparty tag.
    pub person_id: Option<Uuid>,
    /// Cost center tag.
    pub cost_center_id: Option<Uuid>,
}

/// Request body for creating a bank movement.
#[derive(Debug, Deserialize)]
pub struct CreateBankMovementRequest {
    /// The bank account the movement belongs to.
    pub bank_account_id: Uuid,
    /// Direction: "in" or "out".
    pub direction: MovementDirection,
    /// Movement date.
    pub movement_date: NaiveDate,
    /// Free-text concept.
    pub description: String,
    /// Detail splits.
    pub details: Vec<BankDetailRequest>,
}

/// Request body for updating a bank movement.
#[derive(Debug, Deserialize)]
pub struct UpdateBankMovementRequest {
    /// New direction.
    pub direction: MovementDirection,
    /// New date.
    pub movement_date: NaiveDate,
    /// New description.
    pub description: String,
    /// New detail splits.
    pub details: Vec<BankDetailRequest>,
}

/// Response for a movement.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Movement id.
    pub id: Uuid,
    /// The journal entry it produced.
    pub journal_entry_id: Option<Uuid>,
}

fn details_of(details: Vec<BankDetailRequest>) -> Vec<BankDetailInput> {
    details
        .into_iter()
        .map(|d| BankDetailInput {
            account_id: d.account_id,
            amount: d.amount,
            person_id: d.person_id,
            cost_center_id: d.cost_center_id,
        })
        .collect()
}

async fn create_cash_movement(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Json(request): Json<CreateCashMovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CashMovementRepository::new((*state.db).clone());
    let movement = repo
        .create(CreateCashMovementInput {
            tenant_id,
            cash_session_id: request.cash_session_id,
            direction: request.direction,
            amount: request.amount,
            movement_date: request.movement_date,
            description: request.description,
            person_id: request.person_id,
            transaction_id: None,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MovementResponse {
            id: movement.id,
            journal_entry_id: movement.journal_entry_id,
        }),
    ))
}

async fn update_cash_movement(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(movement_id): Path<Uuid>,
    Json(request): Json<UpdateCashMovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CashMovementRepository::new((*state.db).clone());
    let movement = repo
        .update(
            tenant_id,
            movement_id,
            UpdateCashMovementInput {
                direction: request.direction,
                amount: request.amount,
                movement_date: request.movement_date,
                description: request.description,
                person_id: request.person_id,
            },
        )
        .await?;

    Ok(Json(MovementResponse {
        id: movement.id,
        journal_entry_id: movement.journal_entry_id,
    }))
}

async fn delete_cash_movement(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(movement_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CashMovementRepository::new((*state.db).clone());
    repo.delete(tenant_id, movement_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_bank_movement(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Json(request): Json<CreateBankMovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = BankMovementRepository::new((*state.db).clone());
    let movement = repo
        .create(CreateBankMovementInput {
            tenant_id,
            bank_account_id: request.bank_account_id,
            direction: request.direction,
            movement_date: request.movement_date,
            description: request.description,
            details: details_of(request.details),
            transaction_id: None,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MovementResponse {
            id: movement.id,
            journal_entry_id: movement.journal_entry_id,
        }),
    ))
}

async fn update_bank_movement(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(movement_id): Path<Uuid>,
    Json(request): Json<UpdateBankMovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = BankMovementRepository::new((*state.db).clone());
    let movement = repo
        .update(
            tenant_id,
            movement_id,
            request.direction,
            request.movement_date,
            request.description,
            details_of(request.details),
        )
        .await?;

    Ok(Json(MovementResponse {
        id: movement.id,
        journal_entry_id: movement.journal_entry_id,
    }))
}

async fn delete_bank_movement(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(movement_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = BankMovementRepository::new((*state.db).clone());
    repo.delete(tenant_id, movement_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

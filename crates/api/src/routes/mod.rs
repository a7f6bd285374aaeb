//! REST API routes.

pub mod documents;
pub mod fiscal;
pub mod health;
pub mod movements;
pub mod transactions;

use axum::Router;

use crate::AppState;

/// Assembles all API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(documents::routes())
        .merge(transactions::routes())
        .merge(movements::routes())
        .merge(fiscal::routes())
}

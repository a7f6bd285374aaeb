//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes over the ledger and fiscal repositories
//! - Tenant-scoping extractor
//! - Error-to-response mapping
//!
//! Authentication and session management are handled upstream (reverse
//! proxy / gateway); this layer only consumes the resolved tenant id.

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use balanza_sri::{AuthorityClient, DigitalSigner, FiscalPipeline, XmlBuilder};

/// The pipeline type the API serves: collaborators behind trait objects
/// so deployments can swap implementations without recompiling routes.
pub type DynFiscalPipeline =
    FiscalPipeline<Arc<dyn DigitalSigner>, Arc<dyn AuthorityClient>, Arc<dyn XmlBuilder>>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Fiscal authorization pipeline.
    pub pipeline: Arc<DynFiscalPipeline>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

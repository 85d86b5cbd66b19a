//! HTTP admin API for casebook migrations.

#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod api_error;
mod handlers;
mod response_types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use casebook_service::MigrationService;
use tower_http::cors::CorsLayer;

pub use response_types::VersionResponse;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Runner over the application's database and migrations directory
    pub migration_service: Arc<MigrationService>,
}

impl AppState {
    pub fn new(migration_service: Arc<MigrationService>) -> Self {
        Self { migration_service }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/migrations/status", get(handlers::migrations::migration_status))
        .route("/api/migrations/history", get(handlers::migrations::migration_history))
        .route("/api/migrations/run", post(handlers::migrations::run_migrations))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use casebook_core::{RunSummary, StatusReport};

use crate::AppState;
use crate::api_error::ApiError;
use crate::response_types::HistoryResponse;

pub async fn migration_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusReport>, ApiError> {
    Ok(Json(state.migration_service.status().await?))
}

pub async fn migration_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let migrations = state.migration_service.list_records().await?;
    Ok(Json(HistoryResponse { migrations }))
}

pub async fn run_migrations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RunSummary>, ApiError> {
    let summary = state.migration_service.run().await?;
    tracing::info!(applied = summary.applied, "migrations run via HTTP");
    Ok(Json(summary))
}

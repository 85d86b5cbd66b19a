use std::sync::Arc;

use anyhow::Result;
use casebook_http::{AppState, create_router};
use casebook_service::MigrationService;

pub(crate) async fn run(service: Arc<MigrationService>, port: u16, host: String) -> Result<()> {
    let state = Arc::new(AppState::new(service));
    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

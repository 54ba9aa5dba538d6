use std::sync::Arc;
use axum::{extract::State, Json};
use crate::models::{HealthResponse, ReadyResponse};
use crate::state::AppState;
use tracing::debug;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Readiness check endpoint
pub async fn ready_check(State(app_state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    debug!("Readiness check requested");
    let rooms = app_state.registry.stats().await.rooms;
    Json(ReadyResponse {
        status: "ok".to_string(),
        message: "Relay is accepting connections".to_string(),
        rooms,
    })
}

use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/api/ready",
    responses(
        (status = 200, description = "Relay is accepting connections", body = ReadyResponse)
    )
)]
#[allow(dead_code)]
pub async fn ready_check_doc() {}

/// Room and host statistics
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Current diagnostics", body = DiagnosticsResponse),
        (status = 403, description = "Caller is not authenticated")
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

/// Join a collaboration room
///
/// Upgrades to a binary WebSocket. The server first sends `[0, 0, 1, 0]`, then
/// relays every message to the other clients of the room, except the control
/// messages 123..=127 which it answers itself.
#[utoipa::path(
    get,
    path = "/api/yjs/{room_id}",
    params(
        ("room_id" = String, Path, description = "Room to join; may contain slashes"),
        ("token" = Option<String>, Query, description = "Bearer token when no header can be sent")
    ),
    responses(
        (status = 101, description = "Switched to the WebSocket protocol"),
        (status = 403, description = "Caller is not authenticated")
    )
)]
#[allow(dead_code)]
pub async fn yjs_room_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        ready_check_doc,
        diagnostics_doc,
        yjs_room_doc,
    ),
    components(
        schemas(HealthResponse, ReadyResponse, DiagnosticsResponse)
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;

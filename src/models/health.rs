use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API response for the liveness probe
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// API response for the readiness probe
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ReadyResponse {
    pub status: String,
    pub message: String,
    /// Rooms currently open
    pub rooms: usize,
}

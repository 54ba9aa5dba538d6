use crate::{
    handlers::{diagnostics, health_check, ready_check},
    routes::auth_middleware::auth_middleware,
    state::AppState,
    websocket::handler::websocket_handler,
};
use axum::{routing::get, Router, middleware};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    let protected = Router::<Arc<AppState>>::new()
        .route("/v1/diagnostics", get(diagnostics))
        .route("/yjs/*room_id", get(websocket_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)); // Applies to all routes added above

    Router::<Arc<AppState>>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .merge(protected)
        .with_state(state)
}

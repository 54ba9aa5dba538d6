pub mod api;
pub mod auth_middleware;

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::state::AppState;

pub use api::create_api_routes;

/// Full application router: API, Swagger UI, tracing and CORS.
pub fn create_app(state: Arc<AppState>, cors_origins: Option<&str>) -> Router {
    Router::new()
        // Mount API routes
        .nest("/api", create_api_routes(state))
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
}

fn cors_layer(cors_origins: Option<&str>) -> CorsLayer {
    match cors_origins {
        Some(list) => {
            let origins: Vec<HeaderValue> = list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        // any origin may connect unless restricted
        None => CorsLayer::permissive(),
    }
}

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use yjs_relay::auth::auth::{AllowAnonymous, Authenticator, JwtAuthenticator};
use yjs_relay::config::RelaySettings;
use yjs_relay::routes::create_app;
use yjs_relay::ws::registry::RoomRegistry;
use yjs_relay::AppState;

fn app(authenticator: Box<dyn Authenticator>) -> axum::Router {
    let state = AppState::new(
        Arc::new(RoomRegistry::new()),
        authenticator,
        RelaySettings::default(),
        1024,
    );
    create_app(Arc::new(state), None)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Option<Value>) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).ok())
}

#[tokio::test]
async fn health_and_ready_are_public() {
    let (status, body) = get(app(Box::new(JwtAuthenticator::new(None))), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["status"], "ok");

    let (status, body) = get(app(Box::new(JwtAuthenticator::new(None))), "/api/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["rooms"], 0);
}

#[tokio::test]
async fn diagnostics_require_authentication() {
    let (status, _) = get(app(Box::new(JwtAuthenticator::new(None))), "/api/v1/diagnostics").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = get(app(Box::new(AllowAnonymous)), "/api/v1/diagnostics").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["n_rooms"], 0);
    assert_eq!(body["n_conn"], 0);
    assert_eq!(body["n_locked_rooms"], 0);
}

#[tokio::test]
async fn websocket_route_rejects_before_upgrade() {
    let (status, _) = get(app(Box::new(JwtAuthenticator::new(Some("k".into())))), "/api/yjs/doc").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = get(app(Box::new(AllowAnonymous)), "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap()["paths"]["/api/yjs/{room_id}"].is_object());
}

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::services::auth_service::get_auth_token;
use crate::state::AppState;

/// Authenticated caller, stored in the request extensions.
#[derive(Clone, Debug)]
pub struct Caller(pub String);

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Get the auth token from the request, if any
    let token = get_auth_token(&req).ok();

    // 2. Let the configured authenticator decide
    let subject = match state.authenticator.authenticate(token.as_deref()) {
        Ok(subject) => subject,
        Err(e) => {
            warn!("Rejected request to {}: {}", req.uri().path(), e);
            return Err(StatusCode::FORBIDDEN);
        }
    };
    info!("Authenticated {} for {}", subject, req.uri().path());

    // 3. Make the caller available to downstream handlers
    req.extensions_mut().insert(Caller(subject));

    Ok(next.run(req).await)
}

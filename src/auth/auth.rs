use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::services::auth_service::validate_jwt;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no credentials presented")]
    MissingToken,
    #[error("token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token has no 'sub' claim")]
    MissingSubject,
    #[error("no JWT secret configured")]
    NotConfigured,
}

/// Decides whether a caller may join a room.
pub trait Authenticator: Send + Sync {
    /// Returns the caller's subject when `token` is acceptable.
    fn authenticate(&self, token: Option<&str>) -> Result<String, AuthError>;
}

/// Accepts HS256 tokens signed with the configured secret.
pub struct JwtAuthenticator {
    secret: Option<String>,
}

impl JwtAuthenticator {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, token: Option<&str>) -> Result<String, AuthError> {
        let secret = self.secret.as_deref().ok_or(AuthError::NotConfigured)?;
        let token = token.ok_or(AuthError::MissingToken)?;
        let token_data = validate_jwt(token, secret)?;
        token_data
            .claims
            .get("sub")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or(AuthError::MissingSubject)
    }
}

/// Lets everyone in. Only used for local development.
pub struct AllowAnonymous;

impl Authenticator for AllowAnonymous {
    fn authenticate(&self, token: Option<&str>) -> Result<String, AuthError> {
        Ok(if token.is_some() { "unverified" } else { "anonymous" }.to_string())
    }
}

pub fn authenticator_from_config(config: &Config) -> Box<dyn Authenticator> {
    match &config.auth_jwt_secret {
        Some(secret) => {
            info!("JWT authentication enabled");
            Box::new(JwtAuthenticator::new(Some(secret.clone())))
        }
        None if config.is_development() => {
            warn!("No JWT secret configured - allowing anonymous connections (development only)");
            Box::new(AllowAnonymous)
        }
        None => {
            warn!("No JWT secret configured - all connections will be rejected");
            Box::new(JwtAuthenticator::new(None))
        }
    }
}

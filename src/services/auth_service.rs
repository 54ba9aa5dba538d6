use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{self};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation, TokenData};

/// Name of the cookie that may carry the bearer token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Name of the query parameter that may carry the bearer token. Browsers
/// cannot attach headers to a websocket upgrade, so this is the usual path
/// for collaboration clients.
pub const AUTH_QUERY_PARAM: &str = "token";

// Get the auth token from a request
pub fn get_auth_token<B>(req: &http::Request<B>) -> Result<String, String> {
    // 1. Try to get token from Authorization header
    if let Some(auth_header) = req.headers().get(http::header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| "Invalid Authorization header".to_string())?;
        return Ok(auth_str
            .strip_prefix("Bearer ")
            .unwrap_or(auth_str)
            .to_string());
    }

    // 2. Try to get token from cookies
    if let Some(cookie_header) = req.headers().get(http::header::COOKIE) {
        let cookie_str = cookie_header.to_str().map_err(|_| "Invalid Cookie header".to_string())?;
        for cookie in cookie::Cookie::split_parse(cookie_str).flatten() {
            if cookie.name() == AUTH_COOKIE {
                return Ok(cookie.value().to_string());
            }
        }
    }

    // 3. Try the query string
    Query::<HashMap<String, String>>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(mut params)| params.remove(AUTH_QUERY_PARAM))
        .filter(|value| !value.is_empty())
        .ok_or_else(|| "Missing Authorization header, auth_token cookie or token parameter".to_string())
}

// Validate a JWT token and return the token data
pub fn validate_jwt(token: &str, secret: &str) -> Result<TokenData<serde_json::Value>, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<serde_json::Value>(token, &decoding_key, &validation)
}

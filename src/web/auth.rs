//! Bearer-token extraction for authenticated routes.

use axum::http::HeaderMap;

use crate::web::error::HttpError;
use crate::web::state::AppState;

pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Resolve the request's bearer token to a username, refreshing the
/// session's activity clock. Fails with 401 when the token is missing,
/// unknown, or expired.
pub fn require_user(state: &AppState, headers: &HeaderMap) -> Result<String, HttpError> {
    let token = extract_bearer(headers).ok_or_else(HttpError::unauthorized)?;
    state
        .sessions
        .resolve(&token)
        .ok_or_else(HttpError::unauthorized)
}

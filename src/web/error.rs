//! Maps domain errors onto HTTP responses.
//!
//! Every failure body has the shape `{"success": false, "error": "..."}` so
//! the front-end can branch on `success` without inspecting status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;

use crate::game::errors::GameError;

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Missing, malformed, or expired bearer token.
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Not logged in.")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<GameError> for HttpError {
    fn from(err: GameError) -> Self {
        let status = match &err {
            GameError::Validation(_) | GameError::InsufficientBalance => StatusCode::BAD_REQUEST,
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::Duplicate(_) => StatusCode::CONFLICT,
            GameError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            GameError::CooldownActive { .. } | GameError::AllowanceExhausted => {
                StatusCode::TOO_MANY_REQUESTS
            }
            GameError::StoreBusy => StatusCode::SERVICE_UNAVAILABLE,
            GameError::Sled(_)
            | GameError::Bincode(_)
            | GameError::Io(_)
            | GameError::SchemaMismatch { .. }
            | GameError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match &err {
            GameError::InsufficientBalance => "You don't have enough Lamocoins.".to_string(),
            GameError::StoreBusy => {
                "The server is busy right now. Please try again in a moment.".to_string()
            }
            other if status == StatusCode::INTERNAL_SERVER_ERROR => {
                error!("internal error serving request: {}", other);
                "Something went wrong. Please try again later.".to_string()
            }
            other => other.to_string(),
        };
        Self::new(status, message)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        let cases = [
            (GameError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (GameError::InsufficientBalance, StatusCode::BAD_REQUEST),
            (GameError::NotFound("item".into()), StatusCode::NOT_FOUND),
            (GameError::Duplicate("taken".into()), StatusCode::CONFLICT),
            (
                GameError::PermissionDenied("not yours".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                GameError::CooldownActive {
                    remaining_minutes: 30,
                },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                GameError::AllowanceExhausted,
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (GameError::StoreBusy, StatusCode::SERVICE_UNAVAILABLE),
            (
                GameError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpError::from(err).status, expected);
        }
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let http = HttpError::from(GameError::Internal("argon2 blew up".into()));
        assert!(!http.message.contains("argon2"));
    }

    #[test]
    fn insufficient_balance_uses_site_voice() {
        let http = HttpError::from(GameError::InsufficientBalance);
        assert_eq!(http.message, "You don't have enough Lamocoins.");
    }
}

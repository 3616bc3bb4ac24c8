//! Mapping from domain errors to HTTP responses.
//!
//! Every `ErrorCode` maps to one status. The body is always
//! `{"code": ..., "message": ..., "details": ...}`.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, ValidationError};

/// JSON error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    use ErrorCode::*;
    match code {
        ValidationFailed | EmptyField | OutOfRange | InvalidFormat | InvalidWebhookSignature => {
            StatusCode::BAD_REQUEST
        }
        c if c.is_not_found() => StatusCode::NOT_FOUND,
        InvalidStateTransition | EventNotOpen | EventFull | AlreadyRegistered
        | AlreadyCheckedIn | ScoringClosed | ScoreFinalized | Conflict => StatusCode::CONFLICT,
        RefundExceedsBalance => StatusCode::UNPROCESSABLE_ENTITY,
        Unauthorized | SessionExpired => StatusCode::UNAUTHORIZED,
        Forbidden | JudgeNotAssigned => StatusCode::FORBIDDEN,
        PaymentProviderError | EmailDeliveryFailed | GeocodingFailed => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let code = match err {
            AuthError::SessionExpired => ErrorCode::SessionExpired,
            AuthError::ServiceUnavailable(_) => ErrorCode::InternalError,
            AuthError::InvalidToken | AuthError::TokenExpired => ErrorCode::Unauthorized,
        };
        Self(DomainError::new(code, err.to_string()))
    }
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        Self(DomainError::new(
            ErrorCode::Unauthorized,
            "Authentication required",
        ))
    }

    /// A path or query value that does not parse.
    pub fn bad_param(field: &str, err: impl std::fmt::Display) -> Self {
        Self(DomainError::validation(field, err.to_string()))
    }
}

/// Parses a path segment into a typed id.
pub fn parse_id<T>(field: &str, raw: &str) -> Result<T, ApiError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| ApiError::bad_param(field, e))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let DomainError {
            code,
            message,
            details,
        } = self.0;
        let status = status_for(code);

        let message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!(code = %code, error = %message, "Request failed");
            "Internal server error".to_string()
        } else {
            message
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_family_is_404() {
        for code in [
            ErrorCode::EventNotFound,
            ErrorCode::ListingNotFound,
            ErrorCode::TeamNotFound,
        ] {
            assert_eq!(status_for(code), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn business_rule_conflicts_are_409() {
        assert_eq!(status_for(ErrorCode::EventFull), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorCode::AlreadyRegistered), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorCode::ScoreFinalized), StatusCode::CONFLICT);
    }

    #[test]
    fn session_expiry_is_401() {
        let response = ApiError::from(AuthError::SessionExpired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unparsable_id_is_a_validation_error() {
        let err = parse_id::<crate::domain::foundation::EventId>("event_id", "nope").unwrap_err();
        assert_eq!(err.0.code, ErrorCode::ValidationFailed);
        assert_eq!(err.0.details.get("field"), Some(&"event_id".to_string()));
    }

    #[test]
    fn database_errors_hide_their_message() {
        let err = ApiError(DomainError::database("insert event", "connection reset"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use vergo_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl ApiErrorResponse {
    /// Builds a body from a code and message.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Status code and machine-readable code for an error kind.
pub fn status_and_code(kind: &ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::InvalidPayload => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_payload"),
        ErrorKind::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
        ErrorKind::EmailInUse => (StatusCode::CONFLICT, "email_in_use"),
        ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "missing_bearer"),
        ErrorKind::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
        ErrorKind::InvalidSession => (StatusCode::UNAUTHORIZED, "invalid_session"),
        ErrorKind::MissingTenant => (StatusCode::BAD_REQUEST, "missing_org_id"),
        ErrorKind::Forbidden(reason) => (StatusCode::FORBIDDEN, reason.as_str()),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        ErrorKind::Internal | ErrorKind::Database | ErrorKind::Configuration => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    }
}

/// Wrapper so the orphan rule allows `IntoResponse` for the core error.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, code) = status_and_code(&err.kind);

        let message = if err.kind.is_internal() {
            tracing::error!(
                kind = %err.kind,
                error = %err.message,
                source = ?err.source,
                "Internal server error"
            );
            "Internal server error".to_string()
        } else {
            err.message
        };

        (status, Json(ApiErrorResponse::new(code, message))).into_response()
    }
}

/// Result type returned by handlers and middleware.
pub type ApiResult<T> = Result<T, ApiError>;

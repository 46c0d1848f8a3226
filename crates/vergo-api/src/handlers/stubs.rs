//! Endpoints reserved for surfaces that are not served by this layer.

use axum::Json;
use axum::http::StatusCode;
use axum::http::Uri;

use crate::error::ApiErrorResponse;

/// Answers 501 for reserved routes.
pub async fn not_implemented(uri: Uri) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(ApiErrorResponse::new(
            "not_implemented",
            format!("{} is not implemented", uri.path()),
        )),
    )
}

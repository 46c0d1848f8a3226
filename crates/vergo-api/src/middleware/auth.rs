//! Bearer stage middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Verifies the bearer access token and binds [`AuthUser`] to the request.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let user = AuthUser(state.gate.authenticate(header)?);

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

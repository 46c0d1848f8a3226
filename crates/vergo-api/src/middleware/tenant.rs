//! Tenant stage middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use vergo_core::error::AppError;

use crate::error::ApiResult;
use crate::extractors::{AuthUser, ORG_HEADER, TenantScope};
use crate::state::AppState;

/// Resolves the organization from `X-Org-ID` or the persisted active
/// organization, checks membership and binds [`TenantScope`].
///
/// Must run after [`require_bearer`](super::auth::require_bearer).
pub async fn resolve_tenant(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::internal("Tenant stage reached without a bound user"))?;

    let selector = request
        .headers()
        .get(ORG_HEADER)
        .map(|v| v.to_str().map_err(|_| AppError::invalid_payload("Malformed organization ID")))
        .transpose()?;

    let context = state.gate.resolve_tenant(user.user_id(), selector).await?;
    request.extensions_mut().insert(TenantScope(context));
    Ok(next.run(request).await)
}

//! Caller profile.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::debug;

use crate::dto::response::{ApiResponse, MeResponse, OrgScopeResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ORG_HEADER};
use crate::state::AppState;

/// GET /v1/me
///
/// Includes the organization binding only when `X-Org-ID` resolves to an
/// organization the caller belongs to; any tenant failure just omits it.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<MeResponse>>> {
    let user = state.identity.get_by_id(auth.user_id()).await?;

    let selector = headers
        .get(ORG_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let org = match selector {
        Some(selector) => match state.gate.resolve_tenant(user.id, Some(selector)).await {
            Ok(ctx) => Some(OrgScopeResponse {
                org_id: ctx.org_id,
                role: ctx.role,
            }),
            Err(e) if e.kind.is_internal() => return Err(e.into()),
            Err(e) => {
                debug!(user_id = %user.id, error = %e, "Organization omitted from profile");
                None
            }
        },
        None => None,
    };

    Ok(Json(ApiResponse::ok(MeResponse {
        user: user.into(),
        org,
    })))
}

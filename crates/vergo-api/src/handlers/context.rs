//! Active organization endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::dto::request::SetContextRequest;
use crate::dto::response::{ApiResponse, ContextResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /v1/context
///
/// 204 when the caller has no active organization. The role is looked up
/// fresh and omitted rather than refused when membership has lapsed.
pub async fn get_context(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    let Some(org_id) = state.tenancy.get_active_org(auth.user_id()).await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let role = state.gate.role_in(auth.user_id(), org_id).await?;
    Ok(Json(ApiResponse::ok(ContextResponse { org_id, role })).into_response())
}

/// POST /v1/context
///
/// Persists the active organization after a membership check.
pub async fn set_context(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SetContextRequest>,
) -> ApiResult<StatusCode> {
    let ctx = state
        .gate
        .select_active_org(auth.user_id(), req.org_id)
        .await?;
    state
        .session_manager
        .record_active_org_change(auth.user_id(), ctx.org_id)
        .await;
    Ok(StatusCode::NO_CONTENT)
}

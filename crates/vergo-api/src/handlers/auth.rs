//! Auth handlers: signup, login, refresh, logout, logout-all.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{LoginRequest, RefreshRequest, SignupRequest};
use crate::dto::response::{ApiResponse, AuthResponse, TokenResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let outcome = state
        .session_manager
        .signup(&req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AuthResponse {
            user: outcome.user.into(),
            tokens: outcome.tokens.into(),
        })),
    ))
}

/// POST /v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let outcome = state
        .session_manager
        .login(&req.email, &req.password)
        .await?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        user: outcome.user.into(),
        tokens: outcome.tokens.into(),
    })))
}

/// POST /v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<TokenResponse>>> {
    let tokens = state.session_manager.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens.into())))
}

/// POST /v1/auth/logout
///
/// Answers 204 whether or not the token was usable.
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> ApiResult<StatusCode> {
    state.session_manager.logout(&req.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/auth/logout-all
pub async fn logout_all(State(state): State<AppState>, auth: AuthUser) -> ApiResult<StatusCode> {
    state.session_manager.logout_all(auth.user_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

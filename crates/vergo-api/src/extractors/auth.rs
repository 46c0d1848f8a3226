//! `AuthUser` extractor: the user bound by the bearer stage.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use vergo_core::types::id::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user ID.
///
/// Read from request extensions when the bearer middleware already ran;
/// otherwise the `Authorization` header is verified here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

impl AuthUser {
    /// The authenticated user's ID.
    pub fn user_id(&self) -> UserId {
        self.0
    }

    /// Runs the bearer stage against request headers.
    pub fn from_parts(parts: &Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        Ok(Self(state.gate.authenticate(header)?))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }
        Self::from_parts(parts, state)
    }
}

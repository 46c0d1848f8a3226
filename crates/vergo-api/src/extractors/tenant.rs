//! `TenantScope` extractor: the organization and role bound by the tenant stage.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use vergo_auth::TenantContext;
use vergo_core::error::AppError;

use crate::error::ApiError;

/// Organization and role for a tenant-scoped request.
#[derive(Debug, Clone, Copy)]
pub struct TenantScope(pub TenantContext);

impl std::ops::Deref for TenantScope {
    type Target = TenantContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for TenantScope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantScope>()
            .copied()
            .ok_or_else(|| AppError::internal("Tenant scope requested on an unscoped route").into())
    }
}

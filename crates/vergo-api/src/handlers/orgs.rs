//! Tenant-scoped organization endpoints.

use axum::Json;

use crate::dto::response::{ApiResponse, CurrentOrgResponse};
use crate::extractors::{AuthUser, TenantScope};

/// GET /v1/orgs/current
pub async fn current(auth: AuthUser, scope: TenantScope) -> Json<ApiResponse<CurrentOrgResponse>> {
    Json(ApiResponse::ok(CurrentOrgResponse {
        user_id: auth.user_id(),
        org_id: scope.org_id,
        role: scope.role,
    }))
}

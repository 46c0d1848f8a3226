//! Role stage middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use vergo_auth::RbacEnforcer;
use vergo_entity::membership::OrgRole;

use crate::error::ApiResult;
use crate::extractors::TenantScope;

/// Rejects the request unless the bound role ranks at least `minimum`.
///
/// Attach with `from_fn_with_state(OrgRole::Admin, require_role)` on routes
/// that already pass through the tenant stage. A request with no tenant
/// scope has no role and is refused with `InsufficientRole`.
pub async fn require_role(
    State(minimum): State<OrgRole>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let role = request
        .extensions()
        .get::<TenantScope>()
        .and_then(|scope| scope.role);

    RbacEnforcer::new().require(role, minimum)?;
    Ok(next.run(request).await)
}

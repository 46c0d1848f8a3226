//! Request authorization gate.
//!
//! A protected request moves through three ordered stages:
//!
//! 1. **Bearer**: `Authorization: Bearer <token>` verified as an access token.
//! 2. **Tenant**: explicit selector, else the persisted active organization,
//!    then a membership lookup.
//! 3. **Role**: the bound role compared against the route's minimum.
//!
//! Any stage may reject; later stages never run after a rejection.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use vergo_core::error::{AppError, ForbiddenReason};
use vergo_core::result::AppResult;
use vergo_core::traits::MembershipLookup;
use vergo_core::types::id::{OrgId, UserId};
use vergo_entity::membership::OrgRole;

use crate::jwt::JwtDecoder;
use crate::rbac::RbacEnforcer;
use crate::tenancy::TenancyResolver;

/// Organization and role bound to a request by the tenant stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TenantContext {
    /// The resolved organization.
    pub org_id: OrgId,
    /// The member's role; `None` when the stored role is unrecognized.
    pub role: Option<OrgRole>,
}

/// Applies the bearer, tenant and role stages.
#[derive(Clone)]
pub struct AuthorizationGate {
    decoder: Arc<JwtDecoder>,
    memberships: Arc<dyn MembershipLookup>,
    tenancy: Arc<TenancyResolver>,
    rbac: RbacEnforcer,
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate")
            .field("decoder", &self.decoder)
            .finish()
    }
}

impl AuthorizationGate {
    /// Creates a new gate.
    pub fn new(
        decoder: Arc<JwtDecoder>,
        memberships: Arc<dyn MembershipLookup>,
        tenancy: Arc<TenancyResolver>,
    ) -> Self {
        Self {
            decoder,
            memberships,
            tenancy,
            rbac: RbacEnforcer::new(),
        }
    }

    /// Bearer stage: extracts and verifies the access token in an
    /// `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> AppResult<UserId> {
        let header = header.ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;
        let token = bearer_token(header)
            .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;
        let claims = self.decoder.verify_access(token)?;
        Ok(claims.sub)
    }

    /// Tenant stage: resolves the organization for `user_id` and binds the
    /// member's role.
    ///
    /// A non-empty `selector` wins over the persisted active organization.
    pub async fn resolve_tenant(
        &self,
        user_id: UserId,
        selector: Option<&str>,
    ) -> AppResult<TenantContext> {
        let explicit = match selector.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                raw.parse::<OrgId>()
                    .map_err(|_| AppError::invalid_payload("Malformed organization ID"))?,
            ),
            None => None,
        };

        let org_id = match explicit {
            Some(org_id) => org_id,
            None => self
                .tenancy
                .get_active_org(user_id)
                .await?
                .ok_or_else(AppError::missing_tenant)?,
        };

        let role = self.membership_role(user_id, org_id).await?;
        Ok(TenantContext { org_id, role })
    }

    /// Role stage.
    pub fn authorize(&self, context: &TenantContext, minimum: OrgRole) -> AppResult<()> {
        self.rbac.require(context.role, minimum)
    }

    /// Persists `org_id` as the user's active organization after checking
    /// membership. Non-members are refused with `NotAMember`.
    pub async fn select_active_org(
        &self,
        user_id: UserId,
        org_id: OrgId,
    ) -> AppResult<TenantContext> {
        let role = self.membership_role(user_id, org_id).await?;
        self.tenancy.set_active_org(user_id, org_id).await?;
        Ok(TenantContext { org_id, role })
    }

    /// The user's role in `org_id`, without refusing non-members.
    ///
    /// `None` when the user is not a member or the stored role is
    /// unrecognized.
    pub async fn role_in(&self, user_id: UserId, org_id: OrgId) -> AppResult<Option<OrgRole>> {
        Ok(self.lookup_role(user_id, org_id).await?.flatten())
    }

    /// Looks up membership, mapping "not a member" to `Forbidden(NotAMember)`.
    async fn membership_role(&self, user_id: UserId, org_id: OrgId) -> AppResult<Option<OrgRole>> {
        self.lookup_role(user_id, org_id).await?.ok_or_else(|| {
            debug!(user_id = %user_id, org_id = %org_id, "Not a member");
            AppError::forbidden(ForbiddenReason::NotAMember)
        })
    }

    /// Outer `None`: not a member. Inner `None`: unrecognized role string.
    async fn lookup_role(
        &self,
        user_id: UserId,
        org_id: OrgId,
    ) -> AppResult<Option<Option<OrgRole>>> {
        let Some(raw) = self.memberships.is_member(&org_id, &user_id).await? else {
            return Ok(None);
        };

        match raw.parse::<OrgRole>() {
            Ok(role) => Ok(Some(Some(role))),
            Err(e) => {
                warn!(user_id = %user_id, org_id = %org_id, error = %e, "Unrecognized membership role");
                Ok(Some(None))
            }
        }
    }
}

/// Returns the token from `Bearer <token>`, matching the scheme
/// case-insensitively.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

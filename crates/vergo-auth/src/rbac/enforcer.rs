//! Role-threshold checks for tenant-scoped routes.

use vergo_core::error::{AppError, ForbiddenReason};
use vergo_entity::membership::OrgRole;

/// Compares a bound organization role against a route's minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Passes when `bound` ranks at least `minimum`.
    ///
    /// An absent role (unrecognized membership string) never passes.
    pub fn require(&self, bound: Option<OrgRole>, minimum: OrgRole) -> Result<(), AppError> {
        match bound {
            Some(role) if role.has_at_least(&minimum) => Ok(()),
            _ => Err(AppError::forbidden(ForbiddenReason::InsufficientRole)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vergo_core::error::ErrorKind;

    #[test]
    fn test_thresholds() {
        let rbac = RbacEnforcer::new();
        assert!(rbac.require(Some(OrgRole::Owner), OrgRole::Admin).is_ok());
        assert!(rbac.require(Some(OrgRole::Admin), OrgRole::Admin).is_ok());
        let err = rbac.require(Some(OrgRole::Member), OrgRole::Admin).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::Forbidden(ForbiddenReason::InsufficientRole)
        );
    }

    #[test]
    fn test_missing_role_never_passes() {
        let rbac = RbacEnforcer::new();
        assert!(rbac.require(None, OrgRole::Member).is_err());
    }
}

//! Capability checks performed at the start of every workflow operation.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)

use hemolink_core::{DomainError, DomainResult};

use crate::{Principal, Role};

/// Require an exact role; `Forbidden` otherwise.
pub fn require_role(principal: &Principal, role: Role) -> DomainResult<()> {
    if principal.role == role {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

/// Admin-only operations (approvals, inventory overrides, bank management).
pub fn require_admin(principal: &Principal) -> DomainResult<()> {
    require_role(principal, Role::Admin)
}

/// Donor-only operations (donor dashboard, profile self-service).
pub fn require_donor(principal: &Principal) -> DomainResult<()> {
    require_role(principal, Role::Donor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hemolink_core::UserId;

    fn principal(role: Role) -> Principal {
        Principal::new(UserId::new(), role, "test user")
    }

    #[test]
    fn admin_passes_admin_check() {
        assert!(require_admin(&principal(Role::Admin)).is_ok());
    }

    #[test]
    fn donor_fails_admin_check_with_forbidden() {
        let err = require_admin(&principal(Role::Donor)).unwrap_err();
        assert_eq!(err, DomainError::Forbidden);
    }

    #[test]
    fn admin_fails_donor_check() {
        assert_eq!(
            require_donor(&principal(Role::Admin)).unwrap_err(),
            DomainError::Forbidden
        );
    }
}

use hemolink_auth::Principal;

/// Authenticated actor context for a request.
///
/// Installed by the auth middleware; immutable and present for all domain
/// routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

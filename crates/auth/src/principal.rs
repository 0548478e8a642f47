use serde::{Deserialize, Serialize};

use hemolink_core::UserId;

use crate::Role;

/// A fully resolved authenticated actor.
///
/// Construction is decoupled from transport: the API layer derives this from
/// validated token claims, tests build it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
    /// Display name carried in the token (denormalized onto records the
    /// actor creates, so listings don't need a user lookup).
    pub name: String,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role, name: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            name: name.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

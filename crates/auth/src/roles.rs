use core::str::FromStr;

use serde::{Deserialize, Serialize};

use hemolink_core::DomainError;

/// Role used for RBAC. Fixed, closed set: every authenticated user is either
/// an administrator or a donor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Donor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Donor => "donor",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "donor" => Ok(Role::Donor),
            other => Err(DomainError::validation(format!("unknown role '{other}'"))),
        }
    }
}

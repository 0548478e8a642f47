//! Admin decision token shared by the approval workflows.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Admin decision on a pending request or donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveAction {
    Approve,
    Reject,
}

impl ResolveAction {
    /// Parse the action token from a resolve call body.
    pub fn parse(token: &str) -> DomainResult<Self> {
        match token {
            "approve" => Ok(ResolveAction::Approve),
            "reject" => Ok(ResolveAction::Reject),
            other => Err(DomainError::invalid_action(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tokens() {
        assert_eq!(ResolveAction::parse("approve").unwrap(), ResolveAction::Approve);
        assert_eq!(ResolveAction::parse("reject").unwrap(), ResolveAction::Reject);
    }

    #[test]
    fn unknown_token_is_invalid_action() {
        let err = ResolveAction::parse("cancel").unwrap_err();
        assert_eq!(err, DomainError::invalid_action("cancel"));
    }
}

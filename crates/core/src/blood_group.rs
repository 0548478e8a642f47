//! Blood group enumeration.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// ABO/Rh blood group. Fixed, closed set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APos,
    #[serde(rename = "A-")]
    ANeg,
    #[serde(rename = "B+")]
    BPos,
    #[serde(rename = "B-")]
    BNeg,
    #[serde(rename = "AB+")]
    AbPos,
    #[serde(rename = "AB-")]
    AbNeg,
    #[serde(rename = "O+")]
    OPos,
    #[serde(rename = "O-")]
    ONeg,
}

impl BloodGroup {
    /// All groups, in the conventional listing order.
    ///
    /// Dashboards iterate this so every group appears in rollups even when no
    /// inventory entry exists yet.
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APos,
        BloodGroup::ANeg,
        BloodGroup::BPos,
        BloodGroup::BNeg,
        BloodGroup::AbPos,
        BloodGroup::AbNeg,
        BloodGroup::OPos,
        BloodGroup::ONeg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APos => "A+",
            BloodGroup::ANeg => "A-",
            BloodGroup::BPos => "B+",
            BloodGroup::BNeg => "B-",
            BloodGroup::AbPos => "AB+",
            BloodGroup::AbNeg => "AB-",
            BloodGroup::OPos => "O+",
            BloodGroup::ONeg => "O-",
        }
    }
}

impl ValueObject for BloodGroup {}

impl core::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A+" => Ok(BloodGroup::APos),
            "A-" => Ok(BloodGroup::ANeg),
            "B+" => Ok(BloodGroup::BPos),
            "B-" => Ok(BloodGroup::BNeg),
            "AB+" => Ok(BloodGroup::AbPos),
            "AB-" => Ok(BloodGroup::AbNeg),
            "O+" => Ok(BloodGroup::OPos),
            "O-" => Ok(BloodGroup::ONeg),
            other => Err(DomainError::validation(format!(
                "unknown blood group '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_group_round_trip() {
        for group in BloodGroup::ALL {
            let parsed: BloodGroup = group.as_str().parse().unwrap();
            assert_eq!(parsed, group);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(" ab- ".parse::<BloodGroup>().unwrap(), BloodGroup::AbNeg);
        assert_eq!("o+".parse::<BloodGroup>().unwrap(), BloodGroup::OPos);
    }

    #[test]
    fn rejects_unknown_group() {
        let err = "C+".parse::<BloodGroup>().unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&BloodGroup::AbPos).unwrap();
        assert_eq!(json, "\"AB+\"");
        let back: BloodGroup = serde_json::from_str("\"O-\"").unwrap();
        assert_eq!(back, BloodGroup::ONeg);
    }
}

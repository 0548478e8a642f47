use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use hemolink_core::{BloodGroup, Entity, UserId};

/// Donor-editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub blood_group: Option<BloodGroup>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub is_available: Option<bool>,
}

/// A donor's profile.
///
/// `last_donation_date` is owned by the donation workflow: it is stamped
/// exactly once per donation that reaches `completed`, never by profile
/// self-service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorProfile {
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub blood_group: BloodGroup,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub is_available: bool,
    pub last_donation_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DonorProfile {
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        blood_group: BloodGroup,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            email: None,
            blood_group,
            date_of_birth: None,
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            is_available: true,
            last_donation_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        if let Some(blood_group) = update.blood_group {
            self.blood_group = blood_group;
        }
        if let Some(date_of_birth) = update.date_of_birth {
            self.date_of_birth = Some(date_of_birth);
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(zip_code) = update.zip_code {
            self.zip_code = zip_code;
        }
        if let Some(is_available) = update.is_available {
            self.is_available = is_available;
        }
        self.updated_at = now;
    }

    /// Stamp the profile when a donation completes.
    pub fn record_donation(&mut self, donation_date: NaiveDate, now: DateTime<Utc>) {
        self.last_donation_date = Some(donation_date);
        self.updated_at = now;
    }
}

impl Entity for DonorProfile {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.user_id
    }
}

/// Directory search filter over donor profiles.
///
/// City matching is a case-insensitive substring; the other filters are
/// exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonorFilter {
    pub blood_group: Option<BloodGroup>,
    pub city: Option<String>,
    pub is_available: Option<bool>,
}

impl DonorFilter {
    pub fn matches(&self, profile: &DonorProfile) -> bool {
        if let Some(blood_group) = self.blood_group {
            if profile.blood_group != blood_group {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !profile.city.to_lowercase().contains(&city.to_lowercase()) {
                return false;
            }
        }
        if let Some(is_available) = self.is_available {
            if profile.is_available != is_available {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(blood_group: BloodGroup, city: &str, available: bool) -> DonorProfile {
        let mut p = DonorProfile::new(UserId::new(), "Jordan Vale", blood_group, Utc::now());
        p.city = city.to_string();
        p.is_available = available;
        p
    }

    #[test]
    fn empty_filter_matches_everything() {
        let p = profile(BloodGroup::OPos, "Springfield", true);
        assert!(DonorFilter::default().matches(&p));
    }

    #[test]
    fn city_filter_is_substring_case_insensitive() {
        let p = profile(BloodGroup::OPos, "New Springfield", true);
        let filter = DonorFilter {
            city: Some("spring".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        let miss = DonorFilter {
            city: Some("shelby".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&p));
    }

    #[test]
    fn blood_group_and_availability_are_exact() {
        let p = profile(BloodGroup::ANeg, "Springfield", false);

        let hit = DonorFilter {
            blood_group: Some(BloodGroup::ANeg),
            is_available: Some(false),
            ..Default::default()
        };
        assert!(hit.matches(&p));

        let wrong_group = DonorFilter {
            blood_group: Some(BloodGroup::APos),
            ..Default::default()
        };
        assert!(!wrong_group.matches(&p));

        let wrong_availability = DonorFilter {
            is_available: Some(true),
            ..Default::default()
        };
        assert!(!wrong_availability.matches(&p));
    }

    #[test]
    fn record_donation_stamps_last_donation_date() {
        let mut p = profile(BloodGroup::BPos, "Springfield", true);
        assert!(p.last_donation_date.is_none());

        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        p.record_donation(date, Utc::now());
        assert_eq!(p.last_donation_date, Some(date));
    }

    #[test]
    fn apply_update_leaves_last_donation_date_alone() {
        let mut p = profile(BloodGroup::BPos, "Springfield", true);
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        p.record_donation(date, Utc::now());

        p.apply_update(
            ProfileUpdate {
                city: Some("Shelbyville".to_string()),
                is_available: Some(false),
                ..Default::default()
            },
            Utc::now(),
        );

        assert_eq!(p.city, "Shelbyville");
        assert!(!p.is_available);
        assert_eq!(p.last_donation_date, Some(date));
    }
}

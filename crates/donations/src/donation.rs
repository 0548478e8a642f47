use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use hemolink_core::{BankId, BloodGroup, DomainError, DomainResult, DonationId, Entity, UserId};

/// Donation status lifecycle.
///
/// `pending → {approved, rejected}`, `approved → completed`. Completion is
/// triggered by an approve call that carries a donation date. Rejected and
/// completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl DonationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DonationStatus::Rejected | DonationStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Approved => "approved",
            DonationStatus::Rejected => "rejected",
            DonationStatus::Completed => "completed",
        }
    }
}

impl core::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the blood group a donation will be recorded under.
///
/// The donor's profile group wins when present; otherwise the group supplied
/// with the donation is used. Neither present is a validation failure — the
/// group is a required value from here on, never a nullable field carried
/// forward.
pub fn resolve_blood_group(
    profile_group: Option<BloodGroup>,
    supplied: Option<BloodGroup>,
) -> DomainResult<BloodGroup> {
    profile_group
        .or(supplied)
        .ok_or_else(|| DomainError::validation("blood_group required"))
}

/// Input for creating a donation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDonation {
    /// Used only when the donor has no profile group; see
    /// [`resolve_blood_group`].
    pub blood_group: Option<BloodGroup>,
    pub units_donated: u32,
}

/// An offered donation, created by a donor and resolved by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub id: DonationId,
    pub donor: UserId,
    pub donor_name: String,
    pub blood_group: BloodGroup,
    pub units_donated: u32,
    pub status: DonationStatus,
    pub blood_bank: Option<BankId>,
    pub donation_date: Option<NaiveDate>,
    pub admin_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    pub fn create(
        id: DonationId,
        donor: UserId,
        donor_name: impl Into<String>,
        blood_group: BloodGroup,
        units_donated: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if units_donated == 0 {
            return Err(DomainError::validation("units_donated must be positive"));
        }

        Ok(Self {
            id,
            donor,
            donor_name: donor_name.into(),
            blood_group,
            units_donated,
            status: DonationStatus::Pending,
            blood_bank: None,
            donation_date: None,
            admin_notes: String::new(),
            created_at: now,
            updated_at: now,
        })
    }

    fn ensure_pending(&self) -> DomainResult<()> {
        if self.status != DonationStatus::Pending {
            return Err(DomainError::conflict(format!(
                "donation is {}, expected pending",
                self.status
            )));
        }
        Ok(())
    }

    /// Approve the donation, optionally recording the receiving bank.
    ///
    /// Only accepted from `pending`: a repeated approve call must surface a
    /// conflict instead of double-crediting inventory on completion.
    pub fn approve(&mut self, blood_bank: Option<BankId>, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending()?;
        self.status = DonationStatus::Approved;
        if blood_bank.is_some() {
            self.blood_bank = blood_bank;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn reject(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending()?;
        self.status = DonationStatus::Rejected;
        self.updated_at = now;
        Ok(())
    }

    /// Advance an approved donation to completed, fixing the donation date.
    ///
    /// The inventory credit and the donor-profile stamp are driven by the
    /// workflow exactly when this transition succeeds.
    pub fn complete(&mut self, donation_date: NaiveDate, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != DonationStatus::Approved {
            return Err(DomainError::conflict(format!(
                "donation is {}, expected approved",
                self.status
            )));
        }
        self.status = DonationStatus::Completed;
        self.donation_date = Some(donation_date);
        self.updated_at = now;
        Ok(())
    }

    /// Note amendments are allowed in any status, including terminal ones.
    pub fn amend_notes(&mut self, notes: impl Into<String>, now: DateTime<Utc>) {
        self.admin_notes = notes.into();
        self.updated_at = now;
    }
}

impl Entity for Donation {
    type Id = DonationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Listing filter (`GET /donations`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationFilter {
    pub status: Option<DonationStatus>,
    pub blood_group: Option<BloodGroup>,
    pub donor: Option<UserId>,
}

impl DonationFilter {
    pub fn matches(&self, donation: &Donation) -> bool {
        if let Some(status) = self.status {
            if donation.status != status {
                return false;
            }
        }
        if let Some(blood_group) = self.blood_group {
            if donation.blood_group != blood_group {
                return false;
            }
        }
        if let Some(donor) = self.donor {
            if donation.donor != donor {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_donation() -> Donation {
        Donation::create(
            DonationId::new(),
            UserId::new(),
            "Jordan Vale",
            BloodGroup::BPos,
            1,
            Utc::now(),
        )
        .unwrap()
    }

    fn donation_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn create_starts_pending_without_date_or_bank() {
        let donation = pending_donation();
        assert_eq!(donation.status, DonationStatus::Pending);
        assert!(donation.blood_bank.is_none());
        assert!(donation.donation_date.is_none());
    }

    #[test]
    fn create_rejects_zero_units() {
        let err = Donation::create(
            DonationId::new(),
            UserId::new(),
            "Jordan Vale",
            BloodGroup::BPos,
            0,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn approve_then_complete_fixes_donation_date() {
        let mut donation = pending_donation();
        let bank = BankId::new();

        donation.approve(Some(bank), Utc::now()).unwrap();
        assert_eq!(donation.status, DonationStatus::Approved);

        donation.complete(donation_date(), Utc::now()).unwrap();
        assert_eq!(donation.status, DonationStatus::Completed);
        assert_eq!(donation.donation_date, Some(donation_date()));
        assert_eq!(donation.blood_bank, Some(bank));
    }

    #[test]
    fn complete_requires_approved() {
        let mut donation = pending_donation();
        assert!(matches!(
            donation.complete(donation_date(), Utc::now()),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn second_resolve_on_completed_donation_is_a_conflict() {
        let mut donation = pending_donation();
        donation.approve(None, Utc::now()).unwrap();
        donation.complete(donation_date(), Utc::now()).unwrap();

        assert!(matches!(
            donation.approve(None, Utc::now()),
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            donation.complete(donation_date(), Utc::now()),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn reject_is_terminal() {
        let mut donation = pending_donation();
        donation.reject(Utc::now()).unwrap();
        assert!(donation.status.is_terminal());
        assert!(matches!(
            donation.approve(None, Utc::now()),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn blood_group_resolution_prefers_profile() {
        assert_eq!(
            resolve_blood_group(Some(BloodGroup::ANeg), Some(BloodGroup::OPos)).unwrap(),
            BloodGroup::ANeg
        );
        assert_eq!(
            resolve_blood_group(None, Some(BloodGroup::OPos)).unwrap(),
            BloodGroup::OPos
        );

        let err = resolve_blood_group(None, None).unwrap_err();
        assert_eq!(err, DomainError::validation("blood_group required"));
    }

    #[test]
    fn filter_matches_status_group_and_donor() {
        let donation = pending_donation();

        let hit = DonationFilter {
            status: Some(DonationStatus::Pending),
            blood_group: Some(BloodGroup::BPos),
            donor: Some(donation.donor),
        };
        assert!(hit.matches(&donation));

        let other_donor = DonationFilter {
            donor: Some(UserId::new()),
            ..Default::default()
        };
        assert!(!other_donor.matches(&donation));
    }
}

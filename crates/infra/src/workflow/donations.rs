use chrono::{NaiveDate, Utc};

use hemolink_auth::{Principal, Role, require_admin};
use hemolink_banks::BloodBank;
use hemolink_core::{BankId, DomainError, DomainResult, DonationId, ResolveAction, UserId};
use hemolink_donations::{Donation, DonationFilter, NewDonation, resolve_blood_group};
use hemolink_donors::DonorProfile;
use hemolink_inventory::Ledger;

use crate::repository::Repository;

/// Admin decision on a donation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveDonation {
    pub action: String,
    pub blood_bank_id: Option<BankId>,
    pub donation_date: Option<NaiveDate>,
    pub admin_notes: Option<String>,
}

/// Donation workflow: creation (with explicit blood-group resolution),
/// listing, and admin resolution with the completion side effects.
pub struct DonationWorkflow<S, P, B, L> {
    donations: S,
    profiles: P,
    banks: B,
    ledger: L,
}

impl<S, P, B, L> DonationWorkflow<S, P, B, L>
where
    S: Repository<DonationId, Donation>,
    P: Repository<UserId, DonorProfile>,
    B: Repository<BankId, BloodBank>,
    L: Ledger,
{
    pub fn new(donations: S, profiles: P, banks: B, ledger: L) -> Self {
        Self {
            donations,
            profiles,
            banks,
            ledger,
        }
    }

    /// Create a donation offer on behalf of the calling user.
    ///
    /// The recorded blood group comes from the donor's profile when present,
    /// else from the supplied value; neither is a validation failure.
    pub fn create(&self, principal: &Principal, new: NewDonation) -> DomainResult<Donation> {
        let profile_group = self
            .profiles
            .get(&principal.user_id)
            .map(|p| p.blood_group);
        let blood_group = resolve_blood_group(profile_group, new.blood_group)?;

        let donation = Donation::create(
            DonationId::new(),
            principal.user_id,
            principal.name.clone(),
            blood_group,
            new.units_donated,
            Utc::now(),
        )?;

        self.donations.upsert(donation.id, donation.clone());
        tracing::info!(donation_id = %donation.id, blood_group = %donation.blood_group, "donation created");
        Ok(donation)
    }

    /// List donations visible to the caller, newest first.
    pub fn list(&self, principal: &Principal, mut filter: DonationFilter) -> Vec<Donation> {
        if principal.role == Role::Donor {
            filter.donor = Some(principal.user_id);
        }

        let mut donations: Vec<Donation> = self
            .donations
            .list()
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect();
        donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        donations
    }

    pub fn get(&self, principal: &Principal, id: DonationId) -> DomainResult<Donation> {
        let donation = self.donations.get(&id).ok_or(DomainError::NotFound)?;
        if principal.role == Role::Donor && donation.donor != principal.user_id {
            return Err(DomainError::NotFound);
        }
        Ok(donation)
    }

    /// Resolve a pending donation.
    ///
    /// `approve` with a donation date advances straight to `completed` in the
    /// same call, crediting the receiving bank's inventory and stamping the
    /// donor profile — both exactly once, guarded by the from-pending check.
    pub fn resolve(
        &self,
        principal: &Principal,
        id: DonationId,
        command: ResolveDonation,
    ) -> DomainResult<Donation> {
        require_admin(principal)?;
        let action = ResolveAction::parse(&command.action)?;
        let bank_id = self.checked_bank(command.blood_bank_id)?;

        let now = Utc::now();
        let resolved = self.donations.update(&id, |donation| {
            match action {
                ResolveAction::Reject => donation.reject(now)?,
                ResolveAction::Approve => {
                    donation.approve(bank_id, now)?;
                    if let Some(donation_date) = command.donation_date {
                        donation.complete(donation_date, now)?;
                        self.apply_completion_effects(donation, donation_date)?;
                    }
                }
            }

            if let Some(notes) = &command.admin_notes {
                donation.amend_notes(notes.clone(), now);
            }
            Ok(donation.clone())
        })?;

        tracing::info!(
            donation_id = %id,
            status = %resolved.status,
            admin = %principal.user_id,
            "donation resolved"
        );
        Ok(resolved)
    }

    /// Inventory credit and donor-profile stamp for a completed donation.
    fn apply_completion_effects(
        &self,
        donation: &Donation,
        donation_date: NaiveDate,
    ) -> DomainResult<()> {
        match donation.blood_bank {
            Some(bank_id) => {
                self.ledger
                    .credit(bank_id, donation.blood_group, donation.units_donated)?;
            }
            None => {
                // Inherited gap: a completed donation with no receiving bank
                // is treated as out-of-band and does not enter inventory.
                tracing::warn!(
                    donation_id = %donation.id,
                    "donation completed without a blood bank; inventory not credited"
                );
            }
        }

        // Donors without a stored profile simply skip the stamp.
        match self.profiles.update(&donation.donor, |profile| {
            profile.record_donation(donation_date, Utc::now());
            Ok(())
        }) {
            Ok(()) | Err(DomainError::NotFound) => Ok(()),
            Err(other) => Err(other),
        }
    }

    fn checked_bank(&self, bank_id: Option<BankId>) -> DomainResult<Option<BankId>> {
        let Some(bank_id) = bank_id else {
            return Ok(None);
        };
        let bank = self.banks.get(&bank_id).ok_or(DomainError::NotFound)?;
        if !bank.can_hold_inventory() {
            return Err(DomainError::validation("blood bank is inactive"));
        }
        Ok(Some(bank_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use hemolink_banks::NewBloodBank;
    use hemolink_core::BloodGroup;
    use hemolink_donations::DonationStatus;
    use hemolink_inventory::InventoryFilter;

    use crate::ledger::InMemoryLedger;
    use crate::repository::InMemoryRepository;

    type Workflow = DonationWorkflow<
        Arc<InMemoryRepository<DonationId, Donation>>,
        Arc<InMemoryRepository<UserId, DonorProfile>>,
        Arc<InMemoryRepository<BankId, BloodBank>>,
        Arc<InMemoryLedger>,
    >;

    struct Fixture {
        workflow: Workflow,
        profiles: Arc<InMemoryRepository<UserId, DonorProfile>>,
        banks: Arc<InMemoryRepository<BankId, BloodBank>>,
        ledger: Arc<InMemoryLedger>,
        admin: Principal,
        donor: Principal,
    }

    fn fixture() -> Fixture {
        let donations = Arc::new(InMemoryRepository::new());
        let profiles = Arc::new(InMemoryRepository::new());
        let banks = Arc::new(InMemoryRepository::new());
        let ledger = Arc::new(InMemoryLedger::new());
        Fixture {
            workflow: DonationWorkflow::new(
                donations,
                Arc::clone(&profiles),
                Arc::clone(&banks),
                Arc::clone(&ledger),
            ),
            profiles,
            banks,
            ledger,
            admin: Principal::new(UserId::new(), Role::Admin, "site admin"),
            donor: Principal::new(UserId::new(), Role::Donor, "Jordan Vale"),
        }
    }

    fn seed_bank(f: &Fixture) -> BankId {
        let bank = BloodBank::register(
            BankId::new(),
            NewBloodBank {
                name: "City Central".to_string(),
                address: "12 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                phone: "+15550100".to_string(),
                email: None,
            },
            Utc::now(),
        )
        .unwrap();
        let id = bank.id;
        f.banks.upsert(id, bank);
        id
    }

    fn seed_profile(f: &Fixture, blood_group: BloodGroup) {
        let profile = DonorProfile::new(
            f.donor.user_id,
            f.donor.name.clone(),
            blood_group,
            Utc::now(),
        );
        f.profiles.upsert(f.donor.user_id, profile);
    }

    fn donation_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn create_takes_blood_group_from_profile() {
        let f = fixture();
        seed_profile(&f, BloodGroup::ANeg);

        let donation = f
            .workflow
            .create(
                &f.donor,
                NewDonation {
                    // The supplied group loses to the profile group.
                    blood_group: Some(BloodGroup::OPos),
                    units_donated: 1,
                },
            )
            .unwrap();

        assert_eq!(donation.blood_group, BloodGroup::ANeg);
        assert_eq!(donation.status, DonationStatus::Pending);
    }

    #[test]
    fn create_without_profile_or_group_fails_validation() {
        let f = fixture();
        let err = f
            .workflow
            .create(
                &f.donor,
                NewDonation {
                    blood_group: None,
                    units_donated: 1,
                },
            )
            .unwrap_err();
        assert_eq!(err, DomainError::validation("blood_group required"));
    }

    #[test]
    fn approve_with_date_completes_credits_and_stamps_profile() {
        let f = fixture();
        let bank = seed_bank(&f);
        seed_profile(&f, BloodGroup::BPos);

        let donation = f
            .workflow
            .create(
                &f.donor,
                NewDonation {
                    blood_group: None,
                    units_donated: 2,
                },
            )
            .unwrap();

        let resolved = f
            .workflow
            .resolve(
                &f.admin,
                donation.id,
                ResolveDonation {
                    action: "approve".to_string(),
                    blood_bank_id: Some(bank),
                    donation_date: Some(donation_date()),
                    admin_notes: Some("walk-in".to_string()),
                },
            )
            .unwrap();

        assert_eq!(resolved.status, DonationStatus::Completed);
        assert_eq!(resolved.donation_date, Some(donation_date()));
        assert_eq!(f.ledger.available(bank, BloodGroup::BPos), 2);

        let profile = f.profiles.get(&f.donor.user_id).unwrap();
        assert_eq!(profile.last_donation_date, Some(donation_date()));
    }

    #[test]
    fn approve_without_date_does_not_touch_inventory_or_profile() {
        let f = fixture();
        let bank = seed_bank(&f);
        seed_profile(&f, BloodGroup::BPos);

        let donation = f
            .workflow
            .create(
                &f.donor,
                NewDonation {
                    blood_group: None,
                    units_donated: 2,
                },
            )
            .unwrap();

        let resolved = f
            .workflow
            .resolve(
                &f.admin,
                donation.id,
                ResolveDonation {
                    action: "approve".to_string(),
                    blood_bank_id: Some(bank),
                    donation_date: None,
                    admin_notes: None,
                },
            )
            .unwrap();

        assert_eq!(resolved.status, DonationStatus::Approved);
        assert_eq!(f.ledger.available(bank, BloodGroup::BPos), 0);
        assert!(
            f.profiles
                .get(&f.donor.user_id)
                .unwrap()
                .last_donation_date
                .is_none()
        );
    }

    #[test]
    fn second_resolve_with_date_is_a_conflict_and_credits_once() {
        let f = fixture();
        let bank = seed_bank(&f);
        seed_profile(&f, BloodGroup::BPos);

        let donation = f
            .workflow
            .create(
                &f.donor,
                NewDonation {
                    blood_group: None,
                    units_donated: 2,
                },
            )
            .unwrap();

        let command = ResolveDonation {
            action: "approve".to_string(),
            blood_bank_id: Some(bank),
            donation_date: Some(donation_date()),
            admin_notes: None,
        };
        f.workflow.resolve(&f.admin, donation.id, command.clone()).unwrap();
        let err = f.workflow.resolve(&f.admin, donation.id, command).unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        // Exactly one credit and one profile stamp survived the second call.
        assert_eq!(f.ledger.available(bank, BloodGroup::BPos), 2);
        assert_eq!(
            f.profiles.get(&f.donor.user_id).unwrap().last_donation_date,
            Some(donation_date())
        );
    }

    #[test]
    fn completion_without_bank_skips_inventory_but_stamps_profile() {
        let f = fixture();
        seed_profile(&f, BloodGroup::OPos);

        let donation = f
            .workflow
            .create(
                &f.donor,
                NewDonation {
                    blood_group: None,
                    units_donated: 1,
                },
            )
            .unwrap();

        let resolved = f
            .workflow
            .resolve(
                &f.admin,
                donation.id,
                ResolveDonation {
                    action: "approve".to_string(),
                    blood_bank_id: None,
                    donation_date: Some(donation_date()),
                    admin_notes: None,
                },
            )
            .unwrap();

        assert_eq!(resolved.status, DonationStatus::Completed);
        assert!(f.ledger.snapshot(&InventoryFilter::default()).is_empty());
        assert_eq!(
            f.profiles.get(&f.donor.user_id).unwrap().last_donation_date,
            Some(donation_date())
        );
    }

    #[test]
    fn reject_touches_neither_inventory_nor_profile() {
        let f = fixture();
        let bank = seed_bank(&f);
        seed_profile(&f, BloodGroup::OPos);

        let donation = f
            .workflow
            .create(
                &f.donor,
                NewDonation {
                    blood_group: None,
                    units_donated: 1,
                },
            )
            .unwrap();

        let resolved = f
            .workflow
            .resolve(
                &f.admin,
                donation.id,
                ResolveDonation {
                    action: "reject".to_string(),
                    blood_bank_id: Some(bank),
                    donation_date: None,
                    admin_notes: Some("deferred: low hemoglobin".to_string()),
                },
            )
            .unwrap();

        assert_eq!(resolved.status, DonationStatus::Rejected);
        assert_eq!(f.ledger.available(bank, BloodGroup::OPos), 0);
        assert!(
            f.profiles
                .get(&f.donor.user_id)
                .unwrap()
                .last_donation_date
                .is_none()
        );
    }

    #[test]
    fn non_admin_resolve_is_forbidden() {
        let f = fixture();
        let err = f
            .workflow
            .resolve(
                &f.donor,
                DonationId::new(),
                ResolveDonation {
                    action: "approve".to_string(),
                    blood_bank_id: None,
                    donation_date: None,
                    admin_notes: None,
                },
            )
            .unwrap_err();
        assert_eq!(err, DomainError::Forbidden);
    }

    #[test]
    fn donor_without_stored_profile_can_still_complete() {
        let f = fixture();
        let bank = seed_bank(&f);

        let donation = f
            .workflow
            .create(
                &f.donor,
                NewDonation {
                    blood_group: Some(BloodGroup::AbPos),
                    units_donated: 1,
                },
            )
            .unwrap();

        let resolved = f
            .workflow
            .resolve(
                &f.admin,
                donation.id,
                ResolveDonation {
                    action: "approve".to_string(),
                    blood_bank_id: Some(bank),
                    donation_date: Some(donation_date()),
                    admin_notes: None,
                },
            )
            .unwrap();

        assert_eq!(resolved.status, DonationStatus::Completed);
        assert_eq!(f.ledger.available(bank, BloodGroup::AbPos), 1);
    }
}

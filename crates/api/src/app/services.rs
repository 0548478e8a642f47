//! Application service wiring: in-memory stores, the ledger, workflows, and
//! read-side services shared by all handlers.

use std::sync::Arc;

use chrono::Utc;

use hemolink_auth::{Principal, require_admin, require_donor};
use hemolink_banks::{BankSearch, BankUpdate, BloodBank, NewBloodBank};
use hemolink_core::{BankId, BloodGroup, DomainError, DomainResult, DonationId, RequestId, UserId};
use hemolink_donations::Donation;
use hemolink_donors::{DonorProfile, ProfileUpdate};
use hemolink_infra::{
    InMemoryLedger, InMemoryRepository, Repository,
    read_side::{DashboardService, DonorDirectory},
    workflow::{DonationWorkflow, RequestWorkflow},
};
use hemolink_inventory::{InventoryEntry, InventoryFilter, Ledger};
use hemolink_requests::BloodRequest;

pub type BankStore = Arc<InMemoryRepository<BankId, BloodBank>>;
pub type ProfileStore = Arc<InMemoryRepository<UserId, DonorProfile>>;
pub type RequestStore = Arc<InMemoryRepository<RequestId, BloodRequest>>;
pub type DonationStore = Arc<InMemoryRepository<DonationId, Donation>>;
pub type SharedLedger = Arc<InMemoryLedger>;

pub struct AppServices {
    banks: BankStore,
    profiles: ProfileStore,
    ledger: SharedLedger,
    pub requests: RequestWorkflow<RequestStore, BankStore, SharedLedger>,
    pub donations: DonationWorkflow<DonationStore, ProfileStore, BankStore, SharedLedger>,
    pub dashboards: DashboardService<ProfileStore, RequestStore, DonationStore, SharedLedger>,
    pub directory: DonorDirectory<ProfileStore>,
}

/// Wire up the in-memory record stores and the services over them.
pub fn build_services() -> AppServices {
    let banks: BankStore = Arc::new(InMemoryRepository::new());
    let profiles: ProfileStore = Arc::new(InMemoryRepository::new());
    let request_store: RequestStore = Arc::new(InMemoryRepository::new());
    let donation_store: DonationStore = Arc::new(InMemoryRepository::new());
    let ledger: SharedLedger = Arc::new(InMemoryLedger::new());

    AppServices {
        requests: RequestWorkflow::new(
            Arc::clone(&request_store),
            Arc::clone(&banks),
            Arc::clone(&ledger),
        ),
        donations: DonationWorkflow::new(
            Arc::clone(&donation_store),
            Arc::clone(&profiles),
            Arc::clone(&banks),
            Arc::clone(&ledger),
        ),
        dashboards: DashboardService::new(
            Arc::clone(&profiles),
            Arc::clone(&request_store),
            Arc::clone(&donation_store),
            Arc::clone(&ledger),
        ),
        directory: DonorDirectory::new(Arc::clone(&profiles)),
        banks,
        profiles,
        ledger,
    }
}

// Blood bank directory (admin-managed).
impl AppServices {
    pub fn create_bank(
        &self,
        principal: &Principal,
        new: NewBloodBank,
    ) -> DomainResult<BloodBank> {
        require_admin(principal)?;
        let bank = BloodBank::register(BankId::new(), new, Utc::now())?;
        self.banks.upsert(bank.id, bank.clone());
        tracing::info!(bank_id = %bank.id, name = %bank.name, "blood bank registered");
        Ok(bank)
    }

    pub fn list_banks(
        &self,
        principal: &Principal,
        search: BankSearch,
    ) -> DomainResult<Vec<BloodBank>> {
        require_admin(principal)?;
        let mut banks: Vec<BloodBank> = self
            .banks
            .list()
            .into_iter()
            .filter(|b| search.matches(b))
            .collect();
        banks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(banks)
    }

    pub fn get_bank(&self, principal: &Principal, id: BankId) -> DomainResult<BloodBank> {
        require_admin(principal)?;
        self.banks.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn update_bank(
        &self,
        principal: &Principal,
        id: BankId,
        update: BankUpdate,
    ) -> DomainResult<BloodBank> {
        require_admin(principal)?;
        self.banks.update(&id, |bank| {
            bank.update(update, Utc::now())?;
            Ok(bank.clone())
        })
    }

    pub fn deactivate_bank(&self, principal: &Principal, id: BankId) -> DomainResult<BloodBank> {
        require_admin(principal)?;
        self.banks.update(&id, |bank| {
            bank.deactivate(Utc::now());
            Ok(bank.clone())
        })
    }

    /// Bank display name, for read-model joins on listings.
    pub fn bank_name(&self, id: BankId) -> Option<String> {
        self.banks.get(&id).map(|b| b.name)
    }
}

// Inventory views and the admin override.
impl AppServices {
    pub fn inventory_list(&self, filter: &InventoryFilter) -> Vec<InventoryEntry> {
        self.ledger.snapshot(filter)
    }

    pub fn set_inventory_units(
        &self,
        principal: &Principal,
        bank_id: BankId,
        blood_group: BloodGroup,
        units: u32,
    ) -> DomainResult<InventoryEntry> {
        require_admin(principal)?;
        if self.banks.get(&bank_id).is_none() {
            return Err(DomainError::NotFound);
        }
        let entry = self.ledger.set_units(bank_id, blood_group, units)?;
        tracing::info!(
            bank_id = %bank_id,
            blood_group = %blood_group,
            units,
            admin = %principal.user_id,
            "inventory override applied"
        );
        Ok(entry)
    }
}

// Donor profile self-service.
impl AppServices {
    pub fn get_own_profile(&self, principal: &Principal) -> DomainResult<Option<DonorProfile>> {
        require_donor(principal)?;
        Ok(self.profiles.get(&principal.user_id))
    }

    /// Create-or-update the caller's profile.
    ///
    /// First-time creation needs a blood group — there is no meaningful
    /// profile without one.
    pub fn upsert_own_profile(
        &self,
        principal: &Principal,
        update: ProfileUpdate,
    ) -> DomainResult<DonorProfile> {
        require_donor(principal)?;

        let now = Utc::now();
        let mut profile = match self.profiles.get(&principal.user_id) {
            Some(existing) => existing,
            None => {
                let blood_group = update
                    .blood_group
                    .ok_or_else(|| DomainError::validation("blood_group required"))?;
                DonorProfile::new(principal.user_id, principal.name.clone(), blood_group, now)
            }
        };

        profile.apply_update(update, now);
        self.profiles.upsert(principal.user_id, profile.clone());
        Ok(profile)
    }
}

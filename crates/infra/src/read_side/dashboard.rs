use serde::Serialize;

use hemolink_auth::{Principal, require_admin, require_donor};
use hemolink_core::{BloodGroup, DomainResult, DonationId, RequestId, UserId};
use hemolink_donations::Donation;
use hemolink_donors::DonorProfile;
use hemolink_inventory::{InventoryFilter, Ledger};
use hemolink_requests::BloodRequest;

use crate::repository::Repository;

/// Summed availability of one blood group across all banks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupAvailability {
    pub blood_group: BloodGroup,
    pub units: u32,
}

/// Admin rollup: headline counts, per-group availability, recent activity.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub total_donors: usize,
    pub total_blood_requests: usize,
    pub pending_requests: usize,
    pub total_donations: usize,
    pub blood_availability: Vec<GroupAvailability>,
    pub recent_requests: Vec<BloodRequest>,
    pub recent_donations: Vec<Donation>,
}

/// Donor rollup: own profile, global availability, own activity.
#[derive(Debug, Clone, Serialize)]
pub struct DonorDashboard {
    pub donor_profile: Option<DonorProfile>,
    pub blood_availability: Vec<GroupAvailability>,
    pub my_requests: Vec<BloodRequest>,
    pub my_donations: Vec<Donation>,
}

/// How many recent records the admin dashboard lists per activity feed.
const RECENT_LIMIT: usize = 5;

/// Read-side aggregation over the ledger and workflow stores.
pub struct DashboardService<P, R, D, L> {
    profiles: P,
    requests: R,
    donations: D,
    ledger: L,
}

impl<P, R, D, L> DashboardService<P, R, D, L>
where
    P: Repository<UserId, DonorProfile>,
    R: Repository<RequestId, BloodRequest>,
    D: Repository<DonationId, Donation>,
    L: Ledger,
{
    pub fn new(profiles: P, requests: R, donations: D, ledger: L) -> Self {
        Self {
            profiles,
            requests,
            donations,
            ledger,
        }
    }

    /// Per-group availability summed across all banks.
    ///
    /// Every group appears, zero-filled when no bank holds it yet.
    pub fn blood_availability(&self) -> Vec<GroupAvailability> {
        let entries = self.ledger.snapshot(&InventoryFilter::default());

        BloodGroup::ALL
            .iter()
            .map(|&blood_group| GroupAvailability {
                blood_group,
                units: entries
                    .iter()
                    .filter(|e| e.blood_group == blood_group)
                    .map(|e| e.units_available)
                    .sum(),
            })
            .collect()
    }

    pub fn admin_dashboard(&self, principal: &Principal) -> DomainResult<AdminDashboard> {
        require_admin(principal)?;

        let requests = self.requests.list();
        let donations = self.donations.list();

        let pending_requests = requests
            .iter()
            .filter(|r| r.status == hemolink_requests::RequestStatus::Pending)
            .count();

        Ok(AdminDashboard {
            total_donors: self.profiles.list().len(),
            total_blood_requests: requests.len(),
            pending_requests,
            total_donations: donations.len(),
            blood_availability: self.blood_availability(),
            recent_requests: newest_first(requests, Some(RECENT_LIMIT), |r: &BloodRequest| {
                r.created_at
            }),
            recent_donations: newest_first(donations, Some(RECENT_LIMIT), |d: &Donation| {
                d.created_at
            }),
        })
    }

    pub fn donor_dashboard(&self, principal: &Principal) -> DomainResult<DonorDashboard> {
        require_donor(principal)?;

        let my_requests: Vec<BloodRequest> = self
            .requests
            .list()
            .into_iter()
            .filter(|r| r.requester == principal.user_id)
            .collect();
        let my_donations: Vec<Donation> = self
            .donations
            .list()
            .into_iter()
            .filter(|d| d.donor == principal.user_id)
            .collect();

        Ok(DonorDashboard {
            donor_profile: self.profiles.get(&principal.user_id),
            blood_availability: self.blood_availability(),
            my_requests: newest_first(my_requests, None, |r: &BloodRequest| r.created_at),
            my_donations: newest_first(my_donations, None, |d: &Donation| d.created_at),
        })
    }
}

fn newest_first<T, F>(mut records: Vec<T>, limit: Option<usize>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    records.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    records
}

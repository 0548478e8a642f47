use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hemolink_core::{BankId, BloodGroup, DomainError, DomainResult, Entity, RequestId, UserId};

/// Urgency of a request. Ordered low < medium < high < critical; purely
/// informational — it has no scheduling effect.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Request status lifecycle.
///
/// `pending → {approved, rejected}`, `approved → fulfilled`. Rejected and
/// fulfilled are terminal; approved is quasi-terminal (no admin action beyond
/// the initial resolve is exposed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Fulfilled,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Fulfilled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Fulfilled => "fulfilled",
        }
    }
}

impl core::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a blood request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBloodRequest {
    pub blood_group: BloodGroup,
    pub units_required: u32,
    pub reason: String,
    #[serde(default)]
    pub urgency: Urgency,
}

/// A request for blood units, created by a requester and resolved by an
/// admin. Mutable only through the transition methods below; terminal
/// statuses accept nothing further except note amendments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodRequest {
    pub id: RequestId,
    pub requester: UserId,
    pub requester_name: String,
    pub blood_group: BloodGroup,
    pub units_required: u32,
    pub reason: String,
    pub urgency: Urgency,
    pub status: RequestStatus,
    pub blood_bank: Option<BankId>,
    pub admin_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BloodRequest {
    pub fn create(
        id: RequestId,
        requester: UserId,
        requester_name: impl Into<String>,
        new: NewBloodRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if new.units_required == 0 {
            return Err(DomainError::validation("units_required must be positive"));
        }
        if new.reason.trim().is_empty() {
            return Err(DomainError::validation("reason cannot be empty"));
        }

        Ok(Self {
            id,
            requester,
            requester_name: requester_name.into(),
            blood_group: new.blood_group,
            units_required: new.units_required,
            reason: new.reason,
            urgency: new.urgency,
            status: RequestStatus::Pending,
            blood_bank: None,
            admin_notes: String::new(),
            created_at: now,
            updated_at: now,
        })
    }

    fn ensure_pending(&self) -> DomainResult<()> {
        if self.status != RequestStatus::Pending {
            return Err(DomainError::conflict(format!(
                "request is {}, expected pending",
                self.status
            )));
        }
        Ok(())
    }

    /// Approve the request, optionally assigning the fulfilling bank.
    ///
    /// Only accepted from `pending`: a repeated approve call must surface a
    /// conflict instead of double-debiting inventory.
    pub fn approve(&mut self, blood_bank: Option<BankId>, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending()?;
        self.status = RequestStatus::Approved;
        if blood_bank.is_some() {
            self.blood_bank = blood_bank;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn reject(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending()?;
        self.status = RequestStatus::Rejected;
        self.updated_at = now;
        Ok(())
    }

    /// Mark an approved request as handed out.
    pub fn fulfill(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != RequestStatus::Approved {
            return Err(DomainError::conflict(format!(
                "request is {}, expected approved",
                self.status
            )));
        }
        self.status = RequestStatus::Fulfilled;
        self.updated_at = now;
        Ok(())
    }

    /// Note amendments are allowed in any status, including terminal ones.
    pub fn amend_notes(&mut self, notes: impl Into<String>, now: DateTime<Utc>) {
        self.admin_notes = notes.into();
        self.updated_at = now;
    }
}

impl Entity for BloodRequest {
    type Id = RequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Listing filter (`GET /blood-requests`).
///
/// `requester` is set by the API layer for donor callers so they only see
/// their own requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub blood_group: Option<BloodGroup>,
    pub requester: Option<UserId>,
}

impl RequestFilter {
    pub fn matches(&self, request: &BloodRequest) -> bool {
        if let Some(status) = self.status {
            if request.status != status {
                return false;
            }
        }
        if let Some(blood_group) = self.blood_group {
            if request.blood_group != blood_group {
                return false;
            }
        }
        if let Some(requester) = self.requester {
            if request.requester != requester {
                return false;
            }
        }
        true
    }
}

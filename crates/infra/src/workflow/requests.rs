use chrono::Utc;

use hemolink_auth::{Principal, Role, require_admin};
use hemolink_banks::BloodBank;
use hemolink_core::{BankId, DomainError, DomainResult, RequestId, ResolveAction};
use hemolink_inventory::Ledger;
use hemolink_requests::{BloodRequest, NewBloodRequest, RequestFilter};

use crate::repository::Repository;

/// Admin decision on a blood request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub action: String,
    pub blood_bank_id: Option<BankId>,
    pub admin_notes: Option<String>,
}

/// Blood request workflow: creation, listing, and admin resolution with its
/// inventory debit.
pub struct RequestWorkflow<S, B, L> {
    requests: S,
    banks: B,
    ledger: L,
}

impl<S, B, L> RequestWorkflow<S, B, L>
where
    S: Repository<RequestId, BloodRequest>,
    B: Repository<BankId, BloodBank>,
    L: Ledger,
{
    pub fn new(requests: S, banks: B, ledger: L) -> Self {
        Self {
            requests,
            banks,
            ledger,
        }
    }

    /// Create a request on behalf of the calling user.
    pub fn create(
        &self,
        principal: &Principal,
        new: NewBloodRequest,
    ) -> DomainResult<BloodRequest> {
        let request = BloodRequest::create(
            RequestId::new(),
            principal.user_id,
            principal.name.clone(),
            new,
            Utc::now(),
        )?;

        self.requests.upsert(request.id, request.clone());
        tracing::info!(request_id = %request.id, blood_group = %request.blood_group, "blood request created");
        Ok(request)
    }

    /// List requests visible to the caller, newest first.
    ///
    /// Donors only ever see their own requests; the filter's `requester`
    /// field is forced accordingly.
    pub fn list(&self, principal: &Principal, mut filter: RequestFilter) -> Vec<BloodRequest> {
        if principal.role == Role::Donor {
            filter.requester = Some(principal.user_id);
        }

        let mut requests: Vec<BloodRequest> = self
            .requests
            .list()
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        requests
    }

    pub fn get(&self, principal: &Principal, id: RequestId) -> DomainResult<BloodRequest> {
        let request = self.requests.get(&id).ok_or(DomainError::NotFound)?;
        if principal.role == Role::Donor && request.requester != principal.user_id {
            // Donors must not learn whether someone else's request exists.
            return Err(DomainError::NotFound);
        }
        Ok(request)
    }

    /// Resolve a pending request: approve (optionally against a bank, which
    /// debits its inventory) or reject.
    pub fn resolve(
        &self,
        principal: &Principal,
        id: RequestId,
        command: ResolveRequest,
    ) -> DomainResult<BloodRequest> {
        require_admin(principal)?;
        let action = ResolveAction::parse(&command.action)?;
        let bank_id = self.checked_bank(command.blood_bank_id)?;

        let now = Utc::now();
        let resolved = self.requests.update(&id, |request| {
            match action {
                ResolveAction::Reject => request.reject(now)?,
                ResolveAction::Approve => {
                    request.approve(bank_id, now)?;
                    if let Some(bank_id) = bank_id {
                        // Debit failure aborts the whole transition: the
                        // draft is discarded and the request stays pending.
                        self.ledger
                            .debit(bank_id, request.blood_group, request.units_required)
                            .map_err(|e| match e {
                                DomainError::NotFound => DomainError::validation(format!(
                                    "no inventory for {} at selected blood bank",
                                    request.blood_group
                                )),
                                other => other,
                            })?;
                    }
                }
            }

            if let Some(notes) = &command.admin_notes {
                request.amend_notes(notes.clone(), now);
            }
            Ok(request.clone())
        })?;

        tracing::info!(
            request_id = %id,
            status = %resolved.status,
            admin = %principal.user_id,
            "blood request resolved"
        );
        Ok(resolved)
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

use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use hemolink_banks::BloodBank;
use hemolink_donations::{Donation, DonationStatus};
use hemolink_donors::DonorProfile;
use hemolink_infra::read_side::{AdminDashboard, DonorDashboard, GroupAvailability};
use hemolink_inventory::InventoryEntry;
use hemolink_requests::{BloodRequest, RequestStatus};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateBankRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BankListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetInventoryRequest {
    pub units_available: u32,
}

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub blood_bank: Option<String>,
    pub blood_group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequestBody {
    pub action: String,
    pub admin_notes: Option<String>,
    pub blood_bank_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveDonationBody {
    pub action: String,
    pub admin_notes: Option<String>,
    pub blood_bank_id: Option<String>,
    pub donation_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct WorkflowListQuery {
    pub status: Option<String>,
    pub blood_group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchDonorsQuery {
    pub blood_group: Option<String>,
    pub city: Option<String>,
    pub is_available: Option<String>,
}

pub fn parse_request_status(s: &str) -> Result<RequestStatus, axum::response::Response> {
    match s {
        "pending" => Ok(RequestStatus::Pending),
        "approved" => Ok(RequestStatus::Approved),
        "rejected" => Ok(RequestStatus::Rejected),
        "fulfilled" => Ok(RequestStatus::Fulfilled),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "status must be one of: pending, approved, rejected, fulfilled",
        )),
    }
}

pub fn parse_donation_status(s: &str) -> Result<DonationStatus, axum::response::Response> {
    match s {
        "pending" => Ok(DonationStatus::Pending),
        "approved" => Ok(DonationStatus::Approved),
        "rejected" => Ok(DonationStatus::Rejected),
        "completed" => Ok(DonationStatus::Completed),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "status must be one of: pending, approved, rejected, completed",
        )),
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn bank_to_json(bank: BloodBank) -> Value {
    json!({
        "id": bank.id.to_string(),
        "name": bank.name,
        "address": bank.address,
        "city": bank.city,
        "state": bank.state,
        "phone": bank.phone,
        "email": bank.email,
        "is_active": bank.is_active,
        "created_at": bank.created_at,
        "updated_at": bank.updated_at,
    })
}

pub fn inventory_to_json(entry: InventoryEntry, bank_name: Option<String>) -> Value {
    json!({
        "blood_bank_id": entry.bank_id.to_string(),
        "blood_bank_name": bank_name,
        "blood_group": entry.blood_group,
        "units_available": entry.units_available,
        "last_updated": entry.last_updated,
    })
}

pub fn request_to_json(request: BloodRequest, bank_name: Option<String>) -> Value {
    json!({
        "id": request.id.to_string(),
        "requester": request.requester.to_string(),
        "requester_name": request.requester_name,
        "blood_group": request.blood_group,
        "units_required": request.units_required,
        "reason": request.reason,
        "urgency": request.urgency,
        "status": request.status,
        "blood_bank_id": request.blood_bank.map(|id| id.to_string()),
        "blood_bank_name": bank_name,
        "admin_notes": request.admin_notes,
        "created_at": request.created_at,
        "updated_at": request.updated_at,
    })
}

pub fn donation_to_json(donation: Donation, bank_name: Option<String>) -> Value {
    json!({
        "id": donation.id.to_string(),
        "donor": donation.donor.to_string(),
        "donor_name": donation.donor_name,
        "blood_group": donation.blood_group,
        "units_donated": donation.units_donated,
        "status": donation.status,
        "blood_bank_id": donation.blood_bank.map(|id| id.to_string()),
        "blood_bank_name": bank_name,
        "donation_date": donation.donation_date,
        "admin_notes": donation.admin_notes,
        "created_at": donation.created_at,
        "updated_at": donation.updated_at,
    })
}

pub fn profile_to_json(profile: DonorProfile) -> Value {
    json!({
        "user_id": profile.user_id.to_string(),
        "name": profile.name,
        "email": profile.email,
        "blood_group": profile.blood_group,
        "date_of_birth": profile.date_of_birth,
        "address": profile.address,
        "city": profile.city,
        "state": profile.state,
        "zip_code": profile.zip_code,
        "is_available": profile.is_available,
        "last_donation_date": profile.last_donation_date,
        "created_at": profile.created_at,
        "updated_at": profile.updated_at,
    })
}

/// `{"A+": 3, "A-": 0, ...}` — one key per group, zero-filled.
pub fn availability_to_json(availability: &[GroupAvailability]) -> Value {
    let mut map = Map::new();
    for group in availability {
        map.insert(
            group.blood_group.as_str().to_string(),
            Value::from(group.units),
        );
    }
    Value::Object(map)
}

pub fn admin_dashboard_to_json<F>(dashboard: AdminDashboard, bank_name: F) -> Value
where
    F: Fn(hemolink_core::BankId) -> Option<String>,
{
    json!({
        "total_donors": dashboard.total_donors,
        "total_blood_requests": dashboard.total_blood_requests,
        "pending_requests": dashboard.pending_requests,
        "total_donations": dashboard.total_donations,
        "blood_availability": availability_to_json(&dashboard.blood_availability),
        "recent_requests": dashboard
            .recent_requests
            .into_iter()
            .map(|r| {
                let name = r.blood_bank.and_then(&bank_name);
                request_to_json(r, name)
            })
            .collect::<Vec<_>>(),
        "recent_donations": dashboard
            .recent_donations
            .into_iter()
            .map(|d| {
                let name = d.blood_bank.and_then(&bank_name);
                donation_to_json(d, name)
            })
            .collect::<Vec<_>>(),
    })
}

pub fn donor_dashboard_to_json<F>(dashboard: DonorDashboard, bank_name: F) -> Value
where
    F: Fn(hemolink_core::BankId) -> Option<String>,
{
    json!({
        "donor_profile": dashboard.donor_profile.map(profile_to_json),
        "blood_availability": availability_to_json(&dashboard.blood_availability),
        "my_requests": dashboard
            .my_requests
            .into_iter()
            .map(|r| {
                let name = r.blood_bank.and_then(&bank_name);
                request_to_json(r, name)
            })
            .collect::<Vec<_>>(),
        "my_donations": dashboard
            .my_donations
            .into_iter()
            .map(|d| {
                let name = d.blood_bank.and_then(&bank_name);
                donation_to_json(d, name)
            })
            .collect::<Vec<_>>(),
    })
}

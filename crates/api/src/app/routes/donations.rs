use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};

use hemolink_core::{BankId, DonationId};
use hemolink_donations::{DonationFilter, NewDonation};
use hemolink_infra::workflow::ResolveDonation;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_donation).get(list_donations))
        .route("/:id", get(get_donation))
        .route("/:id/approve-reject", patch(resolve_donation))
}

pub async fn create_donation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<NewDonation>,
) -> axum::response::Response {
    match services.donations.create(principal.principal(), body) {
        Ok(donation) => {
            (StatusCode::CREATED, Json(dto::donation_to_json(donation, None))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_donations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::WorkflowListQuery>,
) -> axum::response::Response {
    let mut filter = DonationFilter::default();

    if let Some(status) = &query.status {
        match dto::parse_donation_status(status) {
            Ok(s) => filter.status = Some(s),
            Err(response) => return response,
        }
    }
    if let Some(group) = &query.blood_group {
        match errors::parse_blood_group(group) {
            Ok(g) => filter.blood_group = Some(g),
            Err(response) => return response,
        }
    }

    let items: Vec<_> = services
        .donations
        .list(principal.principal(), filter)
        .into_iter()
        .map(|donation| {
            let bank_name = donation.blood_bank.and_then(|id| services.bank_name(id));
            dto::donation_to_json(donation, bank_name)
        })
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_donation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: DonationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid donation id");
        }
    };

    match services.donations.get(principal.principal(), id) {
        Ok(donation) => {
            let bank_name = donation.blood_bank.and_then(|id| services.bank_name(id));
            (StatusCode::OK, Json(dto::donation_to_json(donation, bank_name))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn resolve_donation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ResolveDonationBody>,
) -> axum::response::Response {
    let id: DonationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid donation id");
        }
    };

    let blood_bank_id = match body.blood_bank_id.as_deref().map(str::parse::<BankId>) {
        None => None,
        Some(Ok(bank_id)) => Some(bank_id),
        Some(Err(_)) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid bank id");
        }
    };

    let command = ResolveDonation {
        action: body.action,
        blood_bank_id,
        donation_date: body.donation_date,
        admin_notes: body.admin_notes,
    };

    match services.donations.resolve(principal.principal(), id, command) {
        Ok(donation) => {
            let bank_name = donation.blood_bank.and_then(|id| services.bank_name(id));
            (StatusCode::OK, Json(dto::donation_to_json(donation, bank_name))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

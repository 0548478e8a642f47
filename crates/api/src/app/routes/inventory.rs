use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use hemolink_core::BankId;
use hemolink_inventory::InventoryFilter;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_inventory))
        .route(
            "/:bank_id/:blood_group",
            axum::routing::patch(set_inventory),
        )
}

pub async fn list_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::InventoryQuery>,
) -> axum::response::Response {
    let mut filter = InventoryFilter::default();

    if let Some(bank) = &query.blood_bank {
        match bank.parse::<BankId>() {
            Ok(id) => filter.bank_id = Some(id),
            Err(_) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid bank id");
            }
        }
    }
    if let Some(group) = &query.blood_group {
        match errors::parse_blood_group(group) {
            Ok(g) => filter.blood_group = Some(g),
            Err(response) => return response,
        }
    }

    let items: Vec<_> = services
        .inventory_list(&filter)
        .into_iter()
        .map(|entry| {
            let bank_name = services.bank_name(entry.bank_id);
            dto::inventory_to_json(entry, bank_name)
        })
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn set_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((bank_id, blood_group)): Path<(String, String)>,
    Json(body): Json<dto::SetInventoryRequest>,
) -> axum::response::Response {
    let bank_id: BankId = match bank_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid bank id"),
    };
    let blood_group = match errors::parse_blood_group(&blood_group) {
        Ok(g) => g,
        Err(response) => return response,
    };

    match services.set_inventory_units(
        principal.principal(),
        bank_id,
        blood_group,
        body.units_available,
    ) {
        Ok(entry) => {
            let bank_name = services.bank_name(entry.bank_id);
            (StatusCode::OK, Json(dto::inventory_to_json(entry, bank_name))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

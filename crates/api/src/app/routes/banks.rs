use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use hemolink_banks::{BankSearch, BankUpdate, NewBloodBank};
use hemolink_core::BankId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_bank).get(list_banks))
        .route(
            "/:id",
            get(get_bank).patch(update_bank).delete(deactivate_bank),
        )
}

pub async fn create_bank(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateBankRequest>,
) -> axum::response::Response {
    let new = NewBloodBank {
        name: body.name,
        address: body.address,
        city: body.city,
        state: body.state,
        phone: body.phone,
        email: body.email,
    };

    match services.create_bank(principal.principal(), new) {
        Ok(bank) => (StatusCode::CREATED, Json(dto::bank_to_json(bank))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_banks(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::BankListQuery>,
) -> axum::response::Response {
    let search = BankSearch { term: query.search };

    match services.list_banks(principal.principal(), search) {
        Ok(banks) => {
            let items: Vec<_> = banks.into_iter().map(dto::bank_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_bank(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BankId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid bank id"),
    };

    match services.get_bank(principal.principal(), id) {
        Ok(bank) => (StatusCode::OK, Json(dto::bank_to_json(bank))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_bank(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<BankUpdate>,
) -> axum::response::Response {
    let id: BankId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid bank id"),
    };

    match services.update_bank(principal.principal(), id, body) {
        Ok(bank) => (StatusCode::OK, Json(dto::bank_to_json(bank))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn deactivate_bank(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BankId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid bank id"),
    };

    match services.deactivate_bank(principal.principal(), id) {
        Ok(bank) => (StatusCode::OK, Json(dto::bank_to_json(bank))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

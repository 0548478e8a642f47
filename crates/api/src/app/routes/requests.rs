use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};

use hemolink_core::{BankId, RequestId};
use hemolink_infra::workflow::ResolveRequest;
use hemolink_requests::{NewBloodRequest, RequestFilter};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_request).get(list_requests))
        .route("/:id", get(get_request))
        .route("/:id/approve-reject", patch(resolve_request))
}

pub async fn create_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<NewBloodRequest>,
) -> axum::response::Response {
    match services.requests.create(principal.principal(), body) {
        Ok(request) => {
            (StatusCode::CREATED, Json(dto::request_to_json(request, None))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_requests(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::WorkflowListQuery>,
) -> axum::response::Response {
    let mut filter = RequestFilter::default();

    if let Some(status) = &query.status {
        match dto::parse_request_status(status) {
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
        .requests
        .list(principal.principal(), filter)
        .into_iter()
        .map(|request| {
            let bank_name = request.blood_bank.and_then(|id| services.bank_name(id));
            dto::request_to_json(request, bank_name)
        })
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RequestId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid request id");
        }
    };

    match services.requests.get(principal.principal(), id) {
        Ok(request) => {
            let bank_name = request.blood_bank.and_then(|id| services.bank_name(id));
            (StatusCode::OK, Json(dto::request_to_json(request, bank_name))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn resolve_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ResolveRequestBody>,
) -> axum::response::Response {
    let id: RequestId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid request id");
        }
    };

    let blood_bank_id = match body.blood_bank_id.as_deref().map(str::parse::<BankId>) {
        None => None,
        Some(Ok(bank_id)) => Some(bank_id),
        Some(Err(_)) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid bank id");
        }
    };

    let command = ResolveRequest {
        action: body.action,
        blood_bank_id,
        admin_notes: body.admin_notes,
    };

    match services.requests.resolve(principal.principal(), id, command) {
        Ok(request) => {
            let bank_name = request.blood_bank.and_then(|id| services.bank_name(id));
            (StatusCode::OK, Json(dto::request_to_json(request, bank_name))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

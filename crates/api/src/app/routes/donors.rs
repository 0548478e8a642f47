use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use hemolink_donors::{DonorFilter, ProfileUpdate};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/search-donors", get(search_donors))
        .route("/donor-profile", get(get_profile).put(upsert_profile))
}

pub async fn search_donors(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::SearchDonorsQuery>,
) -> axum::response::Response {
    let mut filter = DonorFilter {
        city: query.city,
        ..Default::default()
    };

    if let Some(group) = &query.blood_group {
        match errors::parse_blood_group(group) {
            Ok(g) => filter.blood_group = Some(g),
            Err(response) => return response,
        }
    }
    if let Some(is_available) = &query.is_available {
        filter.is_available = Some(is_available.eq_ignore_ascii_case("true"));
    }

    let items: Vec<_> = services
        .directory
        .search(&filter)
        .into_iter()
        .map(dto::profile_to_json)
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.get_own_profile(principal.principal()) {
        Ok(Some(profile)) => (StatusCode::OK, Json(dto::profile_to_json(profile))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "no profile yet"),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn upsert_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<ProfileUpdate>,
) -> axum::response::Response {
    match services.upsert_own_profile(principal.principal(), body) {
        Ok(profile) => (StatusCode::OK, Json(dto::profile_to_json(profile))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

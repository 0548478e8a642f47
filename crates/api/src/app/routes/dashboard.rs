use std::sync::Arc;

use axum::{
    Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::get,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/admin", get(admin_dashboard))
        .route("/donor", get(donor_dashboard))
}

pub async fn admin_dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.dashboards.admin_dashboard(principal.principal()) {
        Ok(dashboard) => {
            let json = dto::admin_dashboard_to_json(dashboard, |id| services.bank_name(id));
            (StatusCode::OK, Json(json)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn donor_dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.dashboards.donor_dashboard(principal.principal()) {
        Ok(dashboard) => {
            let json = dto::donor_dashboard_to_json(dashboard, |id| services.bank_name(id));
            (StatusCode::OK, Json(json)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

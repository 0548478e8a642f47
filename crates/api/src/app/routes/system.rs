use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::context::PrincipalContext;

pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response()
}

pub async fn whoami(
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let principal = principal.principal();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "user_id": principal.user_id.to_string(),
            "role": principal.role,
            "name": principal.name,
        })),
    )
        .into_response()
}

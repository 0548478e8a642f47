use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use hemolink_core::{BloodGroup, DomainError};

/// Map a domain error onto the wire contract.
///
/// Validation and business-rule failures are 400s; `insufficient_units`
/// additionally carries the quantities so the caller can self-correct.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        DomainError::InvalidId(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string())
        }
        DomainError::InvalidAction(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_action", err.to_string())
        }
        DomainError::InsufficientUnits {
            available,
            required,
        } => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "insufficient_units",
                "message": err.to_string(),
                "available": available,
                "required": required,
            })),
        )
            .into_response(),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
        DomainError::Conflict(_) => {
            json_error(StatusCode::CONFLICT, "conflict", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_blood_group(s: &str) -> Result<BloodGroup, axum::response::Response> {
    s.parse::<BloodGroup>().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_blood_group",
            "blood_group must be one of: A+, A-, B+, B-, AB+, AB-, O+, O-",
        )
    })
}

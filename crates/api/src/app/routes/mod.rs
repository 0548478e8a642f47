use axum::{Router, routing::get};

pub mod banks;
pub mod dashboard;
pub mod donations;
pub mod donors;
pub mod inventory;
pub mod requests;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/blood-banks", banks::router())
        .nest("/blood-inventory", inventory::router())
        .nest("/blood-requests", requests::router())
        .nest("/donations", donations::router())
        .nest("/dashboard", dashboard::router())
        .merge(donors::router())
}

//! `hemolink-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. Token
//! *issuance* (registration, login, password handling) lives outside this
//! system; here we only validate bearer tokens and answer capability checks.

pub mod authorize;
pub mod claims;
pub mod principal;
pub mod roles;

pub use authorize::{require_admin, require_donor, require_role};
pub use claims::{
    Hs256JwtValidator, JwtClaims, JwtValidator, TokenValidationError, validate_claims,
};
pub use principal::Principal;
pub use roles::Role;

//! Blood request domain module.
//!
//! The request approval state machine, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage). Inventory effects of an
//! approval are orchestrated by the workflow layer through the ledger.

pub mod request;

pub use request::{BloodRequest, NewBloodRequest, RequestFilter, RequestStatus, Urgency};

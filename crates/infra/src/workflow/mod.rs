//! Admin-driven approval workflows.
//!
//! Each operation starts with a capability check (`Forbidden` before any
//! record is touched), then runs the status transition and its inventory
//! effect atomically inside the record store's `update` closure: a losing
//! concurrent resolve observes the non-pending status and gets `Conflict`,
//! and a failed debit aborts the whole transition.

pub mod donations;
pub mod requests;

pub use donations::{DonationWorkflow, ResolveDonation};
pub use requests::{RequestWorkflow, ResolveRequest};

//! Read-only rollups over the ledger and workflow records.
//!
//! Nothing here mutates state; the only failure modes are authorization and
//! data access. Reads are point-in-time and tolerate staleness.

pub mod dashboard;
pub mod directory;

pub use dashboard::{AdminDashboard, DashboardService, DonorDashboard, GroupAvailability};
pub use directory::DonorDirectory;

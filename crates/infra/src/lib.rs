//! Infrastructure layer: record stores, the ledger implementation, and the
//! application services that orchestrate workflow transitions and read-side
//! aggregation.

pub mod ledger;
pub mod read_side;
pub mod repository;
pub mod workflow;

pub use ledger::InMemoryLedger;
pub use repository::{InMemoryRepository, Repository};

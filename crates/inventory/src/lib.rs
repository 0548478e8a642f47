//! Inventory domain module.
//!
//! Per-(blood bank, blood group) unit counters and the `Ledger` contract that
//! owns their mutation. Business rules live here as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod entry;
pub mod ledger;

pub use entry::{InventoryEntry, InventoryFilter, StockKey};
pub use ledger::Ledger;

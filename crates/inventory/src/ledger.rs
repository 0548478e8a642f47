//! Ledger contract: the only component allowed to mutate inventory entries.
//!
//! Ownership of `InventoryEntry` mutation is enforced by this interface, not
//! by convention — workflows and the API never touch counters directly.

use std::sync::Arc;

use hemolink_core::{BankId, BloodGroup, DomainResult};

use crate::entry::{InventoryEntry, InventoryFilter};

/// Per-(bank, blood group) unit accounting.
///
/// Implementations must serialize `debit`/`credit`/`set_units` per key:
/// two concurrent debits against the same key must not both pass the
/// sufficiency check. `available` and `snapshot` are point-in-time reads;
/// dashboards tolerate staleness.
pub trait Ledger: Send + Sync {
    /// Atomically decrement; fails with `InsufficientUnits` on shortfall and
    /// `NotFound` when the key has never been credited.
    fn debit(&self, bank_id: BankId, blood_group: BloodGroup, units: u32)
    -> DomainResult<InventoryEntry>;

    /// Atomically increment, creating the entry at a zero baseline if absent.
    fn credit(
        &self,
        bank_id: BankId,
        blood_group: BloodGroup,
        units: u32,
    ) -> DomainResult<InventoryEntry>;

    /// Direct admin override; creates the entry if absent.
    fn set_units(
        &self,
        bank_id: BankId,
        blood_group: BloodGroup,
        units: u32,
    ) -> DomainResult<InventoryEntry>;

    /// Point-in-time read; 0 when the key has never been credited.
    fn available(&self, bank_id: BankId, blood_group: BloodGroup) -> u32;

    /// Filtered scan over all entries.
    fn snapshot(&self, filter: &InventoryFilter) -> Vec<InventoryEntry>;
}

impl<L> Ledger for Arc<L>
where
    L: Ledger + ?Sized,
{
    fn debit(
        &self,
        bank_id: BankId,
        blood_group: BloodGroup,
        units: u32,
    ) -> DomainResult<InventoryEntry> {
        (**self).debit(bank_id, blood_group, units)
    }

    fn credit(
        &self,
        bank_id: BankId,
        blood_group: BloodGroup,
        units: u32,
    ) -> DomainResult<InventoryEntry> {
        (**self).credit(bank_id, blood_group, units)
    }

    fn set_units(
        &self,
        bank_id: BankId,
        blood_group: BloodGroup,
        units: u32,
    ) -> DomainResult<InventoryEntry> {
        (**self).set_units(bank_id, blood_group, units)
    }

    fn available(&self, bank_id: BankId, blood_group: BloodGroup) -> u32 {
        (**self).available(bank_id, blood_group)
    }

    fn snapshot(&self, filter: &InventoryFilter) -> Vec<InventoryEntry> {
        (**self).snapshot(filter)
    }
}

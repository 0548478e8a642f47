//! In-memory ledger: per-(bank, blood group) counters under per-key locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;

use hemolink_core::{BankId, BloodGroup, DomainError, DomainResult};
use hemolink_inventory::{InventoryEntry, InventoryFilter, Ledger, StockKey};

/// Ledger over in-memory counters.
///
/// The outer map is only held long enough to fetch (or lazily insert) the
/// per-key cell; the cell's mutex then serializes the read-modify-write, so
/// concurrent debits on one key cannot jointly overdraw while distinct keys
/// do not contend.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<HashMap<StockKey, Arc<Mutex<InventoryEntry>>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, key: StockKey) -> DomainResult<Option<Arc<Mutex<InventoryEntry>>>> {
        let map = self
            .entries
            .read()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))?;
        Ok(map.get(&key).cloned())
    }

    fn cell_or_create(&self, key: StockKey) -> DomainResult<Arc<Mutex<InventoryEntry>>> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))?;
        Ok(map
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(InventoryEntry::empty(key, Utc::now()))))
            .clone())
    }
}

impl Ledger for InMemoryLedger {
    fn debit(
        &self,
        bank_id: BankId,
        blood_group: BloodGroup,
        units: u32,
    ) -> DomainResult<InventoryEntry> {
        let key = StockKey::new(bank_id, blood_group);
        let cell = self.cell(key)?.ok_or(DomainError::NotFound)?;

        let mut entry = cell
            .lock()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))?;
        entry.debit(units, Utc::now())?;
        Ok(entry.clone())
    }

    fn credit(
        &self,
        bank_id: BankId,
        blood_group: BloodGroup,
        units: u32,
    ) -> DomainResult<InventoryEntry> {
        let key = StockKey::new(bank_id, blood_group);
        let cell = self.cell_or_create(key)?;

        let mut entry = cell
            .lock()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))?;
        entry.credit(units, Utc::now())?;
        Ok(entry.clone())
    }

    fn set_units(
        &self,
        bank_id: BankId,
        blood_group: BloodGroup,
        units: u32,
    ) -> DomainResult<InventoryEntry> {
        let key = StockKey::new(bank_id, blood_group);
        let cell = self.cell_or_create(key)?;

        let mut entry = cell
            .lock()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))?;
        entry.set_units(units, Utc::now());
        Ok(entry.clone())
    }

    fn available(&self, bank_id: BankId, blood_group: BloodGroup) -> u32 {
        let key = StockKey::new(bank_id, blood_group);
        match self.cell(key) {
            Ok(Some(cell)) => cell.lock().map(|e| e.units_available).unwrap_or(0),
            _ => 0,
        }
    }

    fn snapshot(&self, filter: &InventoryFilter) -> Vec<InventoryEntry> {
        let map = match self.entries.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut entries: Vec<InventoryEntry> = map
            .values()
            .filter_map(|cell| cell.lock().ok().map(|e| e.clone()))
            .filter(|e| filter.matches(e))
            .collect();

        // Deterministic scan order: bank, then group listing order.
        entries.sort_by_key(|e| {
            (
                *e.bank_id.as_uuid(),
                BloodGroup::ALL.iter().position(|g| *g == e.blood_group),
            )
        });
        entries
    }
}

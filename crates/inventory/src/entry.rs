use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hemolink_core::{BankId, BloodGroup, DomainError, DomainResult};

/// Identity of an inventory counter: one per (bank, blood group) pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockKey {
    pub bank_id: BankId,
    pub blood_group: BloodGroup,
}

impl StockKey {
    pub fn new(bank_id: BankId, blood_group: BloodGroup) -> Self {
        Self {
            bank_id,
            blood_group,
        }
    }
}

impl core::fmt::Display for StockKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.bank_id, self.blood_group)
    }
}

/// Available units for one (bank, blood group) pair.
///
/// `units_available` is unsigned by construction; `debit` checks sufficiency
/// before subtracting, so the counter can never go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub bank_id: BankId,
    pub blood_group: BloodGroup,
    pub units_available: u32,
    pub last_updated: DateTime<Utc>,
}

impl InventoryEntry {
    /// Zero-unit baseline, used when an entry is created lazily on first
    /// credit.
    pub fn empty(key: StockKey, now: DateTime<Utc>) -> Self {
        Self {
            bank_id: key.bank_id,
            blood_group: key.blood_group,
            units_available: 0,
            last_updated: now,
        }
    }

    pub fn key(&self) -> StockKey {
        StockKey::new(self.bank_id, self.blood_group)
    }

    pub fn credit(&mut self, units: u32, now: DateTime<Utc>) -> DomainResult<()> {
        if units == 0 {
            return Err(DomainError::validation("units must be positive"));
        }
        self.units_available = self
            .units_available
            .checked_add(units)
            .ok_or_else(|| DomainError::validation("unit counter overflow"))?;
        self.last_updated = now;
        Ok(())
    }

    pub fn debit(&mut self, units: u32, now: DateTime<Utc>) -> DomainResult<()> {
        if units == 0 {
            return Err(DomainError::validation("units must be positive"));
        }
        if self.units_available < units {
            return Err(DomainError::InsufficientUnits {
                available: self.units_available,
                required: units,
            });
        }
        self.units_available -= units;
        self.last_updated = now;
        Ok(())
    }

    /// Direct admin override of the counter.
    pub fn set_units(&mut self, units: u32, now: DateTime<Utc>) {
        self.units_available = units;
        self.last_updated = now;
    }
}

/// Filter for inventory scans (`GET /blood-inventory`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub bank_id: Option<BankId>,
    pub blood_group: Option<BloodGroup>,
}

impl InventoryFilter {
    pub fn matches(&self, entry: &InventoryEntry) -> bool {
        if let Some(bank_id) = self.bank_id {
            if entry.bank_id != bank_id {
                return false;
            }
        }
        if let Some(blood_group) = self.blood_group {
            if entry.blood_group != blood_group {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(units: u32) -> InventoryEntry {
        let mut e = InventoryEntry::empty(
            StockKey::new(BankId::new(), BloodGroup::OPos),
            Utc::now(),
        );
        e.units_available = units;
        e
    }

    #[test]
    fn credit_adds_units() {
        let mut e = entry(0);
        e.credit(3, Utc::now()).unwrap();
        assert_eq!(e.units_available, 3);
    }

    #[test]
    fn debit_subtracts_when_sufficient() {
        let mut e = entry(5);
        e.debit(2, Utc::now()).unwrap();
        assert_eq!(e.units_available, 3);
    }

    #[test]
    fn debit_fails_with_quantities_when_insufficient() {
        let mut e = entry(1);
        let err = e.debit(2, Utc::now()).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientUnits {
                available: 1,
                required: 2
            }
        );
        // Failed debit leaves the counter untouched.
        assert_eq!(e.units_available, 1);
    }

    #[test]
    fn zero_units_is_rejected_on_both_ops() {
        let mut e = entry(5);
        assert!(matches!(
            e.credit(0, Utc::now()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            e.debit(0, Utc::now()),
            Err(DomainError::Validation(_))
        ));
    }

    proptest! {
        /// For any sequence of credits and debits, successful debits never
        /// exceed prior credits and the counter never underflows.
        #[test]
        fn units_never_go_negative(ops in proptest::collection::vec((any::<bool>(), 1u32..50), 0..64)) {
            let mut e = entry(0);
            let mut credited: u64 = 0;
            let mut debited: u64 = 0;

            for (is_credit, units) in ops {
                if is_credit {
                    if e.credit(units, Utc::now()).is_ok() {
                        credited += u64::from(units);
                    }
                } else if e.debit(units, Utc::now()).is_ok() {
                    debited += u64::from(units);
                }
            }

            prop_assert!(debited <= credited);
            prop_assert_eq!(u64::from(e.units_available), credited - debited);
        }

        /// A debit either succeeds exactly when covered, or reports the
        /// correct shortfall quantities.
        #[test]
        fn debit_reports_exact_shortfall(start in 0u32..100, amount in 1u32..100) {
            let mut e = entry(start);
            match e.debit(amount, Utc::now()) {
                Ok(()) => {
                    prop_assert!(start >= amount);
                    prop_assert_eq!(e.units_available, start - amount);
                }
                Err(DomainError::InsufficientUnits { available, required }) => {
                    prop_assert!(start < amount);
                    prop_assert_eq!(available, start);
                    prop_assert_eq!(required, amount);
                }
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
        }
    }
}

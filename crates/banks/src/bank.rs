use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hemolink_core::{BankId, DomainError, DomainResult, Entity};

/// Input for registering a blood bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBloodBank {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Partial update applied by an admin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A physical blood bank location holding inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodBank {
    pub id: BankId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BloodBank {
    pub fn register(id: BankId, new: NewBloodBank, now: DateTime<Utc>) -> DomainResult<Self> {
        if new.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if new.city.trim().is_empty() {
            return Err(DomainError::validation("city cannot be empty"));
        }
        if new.phone.trim().is_empty() {
            return Err(DomainError::validation("phone cannot be empty"));
        }

        Ok(Self {
            id,
            name: new.name,
            address: new.address,
            city: new.city,
            state: new.state,
            phone: new.phone,
            email: new.email,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Invariant helper: whether workflows may point inventory at this bank.
    pub fn can_hold_inventory(&self) -> bool {
        self.is_active
    }

    pub fn update(&mut self, update: BankUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Soft delete: banks with history are never removed, only deactivated.
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}

impl Entity for BloodBank {
    type Id = BankId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Directory search over name, city, and state (case-insensitive substring).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankSearch {
    pub term: Option<String>,
}

impl BankSearch {
    pub fn matches(&self, bank: &BloodBank) -> bool {
        match &self.term {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                bank.name.to_lowercase().contains(&term)
                    || bank.city.to_lowercase().contains(&term)
                    || bank.state.to_lowercase().contains(&term)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_bank(name: &str, city: &str, state: &str) -> NewBloodBank {
        NewBloodBank {
            name: name.to_string(),
            address: "12 Main St".to_string(),
            city: city.to_string(),
            state: state.to_string(),
            phone: "+15550100".to_string(),
            email: None,
        }
    }

    #[test]
    fn register_creates_active_bank() {
        let bank =
            BloodBank::register(BankId::new(), new_bank("City Central", "Springfield", "IL"), Utc::now())
                .unwrap();
        assert!(bank.is_active);
        assert!(bank.can_hold_inventory());
    }

    #[test]
    fn register_rejects_blank_name() {
        let err = BloodBank::register(BankId::new(), new_bank("   ", "Springfield", "IL"), Utc::now())
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn deactivate_blocks_inventory() {
        let mut bank =
            BloodBank::register(BankId::new(), new_bank("City Central", "Springfield", "IL"), Utc::now())
                .unwrap();
        bank.deactivate(Utc::now());
        assert!(!bank.can_hold_inventory());
    }

    #[test]
    fn search_matches_name_city_state_case_insensitive() {
        let bank =
            BloodBank::register(BankId::new(), new_bank("City Central", "Springfield", "IL"), Utc::now())
                .unwrap();

        for term in ["central", "SPRING", "il"] {
            let search = BankSearch {
                term: Some(term.to_string()),
            };
            assert!(search.matches(&bank), "term '{term}' should match");
        }

        let miss = BankSearch {
            term: Some("shelbyville".to_string()),
        };
        assert!(!miss.matches(&bank));
    }
}

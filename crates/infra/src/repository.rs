//! Keyed record store abstractions.
//!
//! Every entity collection lives behind [`Repository`]: keyed lookup,
//! filtered scan (via `list` + domain filters), and a transactional `update`
//! that runs a closure under the store's write lock — workflow transitions
//! use it so the expected-source-state check and the mutation are one atomic
//! step.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use hemolink_core::{DomainError, DomainResult};

/// Keyed record store.
pub trait Repository<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;

    fn upsert(&self, key: K, value: V);

    fn list(&self) -> Vec<V>;

    /// Run `f` against the stored value atomically.
    ///
    /// The closure works on a draft: when it returns an error, the stored
    /// value is left untouched (no partial transition is ever visible).
    /// Missing keys fail with `NotFound`.
    fn update<R>(&self, key: &K, f: impl FnOnce(&mut V) -> DomainResult<R>) -> DomainResult<R>
    where
        Self: Sized;
}

impl<K, V, S> Repository<K, V> for Arc<S>
where
    S: Repository<K, V>,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) {
        (**self).upsert(key, value)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }

    fn update<R>(&self, key: &K, f: impl FnOnce(&mut V) -> DomainResult<R>) -> DomainResult<R> {
        (**self).update(key, f)
    }
}

/// In-memory record store.
#[derive(Debug)]
pub struct InMemoryRepository<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryRepository<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryRepository<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Repository<K, V> for InMemoryRepository<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn upsert(&self, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key, value);
        }
    }

    fn list(&self) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values().cloned().collect()
    }

    fn update<R>(&self, key: &K, f: impl FnOnce(&mut V) -> DomainResult<R>) -> DomainResult<R> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("record store lock poisoned"))?;

        let stored = map.get_mut(key).ok_or(DomainError::NotFound)?;

        let mut draft = stored.clone();
        let out = f(&mut draft)?;
        *stored = draft;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_upsert_round_trip() {
        let repo: InMemoryRepository<u32, String> = InMemoryRepository::new();
        assert!(repo.get(&1).is_none());

        repo.upsert(1, "one".to_string());
        assert_eq!(repo.get(&1).unwrap(), "one");
    }

    #[test]
    fn update_applies_closure_result() {
        let repo: InMemoryRepository<u32, String> = InMemoryRepository::new();
        repo.upsert(1, "one".to_string());

        let len = repo
            .update(&1, |v| {
                v.push_str("!");
                Ok(v.len())
            })
            .unwrap();

        assert_eq!(len, 4);
        assert_eq!(repo.get(&1).unwrap(), "one!");
    }

    #[test]
    fn update_on_missing_key_is_not_found() {
        let repo: InMemoryRepository<u32, String> = InMemoryRepository::new();
        let err = repo.update(&42, |_v| Ok(())).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn failed_update_leaves_value_untouched() {
        let repo: InMemoryRepository<u32, String> = InMemoryRepository::new();
        repo.upsert(1, "one".to_string());

        let err = repo
            .update(&1, |v| {
                v.push_str(" mutated");
                Err::<(), _>(DomainError::conflict("abort"))
            })
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(repo.get(&1).unwrap(), "one");
    }
}

//! Key-value persistence collaborator.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Internal lock poisoning (in-memory stores).
    #[error("store lock poisoned")]
    Poisoned,

    /// The backing storage refused the operation (quota, permissions, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be decoded.
    #[error("corrupt value under key {key:?}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for key {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage with get/set/remove and nothing more.
///
/// No transactions: each call stands alone, and `set` is last-writer-wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory key-value store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("token").unwrap(), None);

        store.set("token", "abc".to_string()).unwrap();
        store.set("token", "def".to_string()).unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("def"));

        store.remove("token").unwrap();
        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }
}

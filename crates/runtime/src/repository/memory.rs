//! In-memory KeyValueStore implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, RepositoryError, Result};

/// Volatile store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .items
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        items.remove(key);
        Ok(())
    }
}

//! In-memory ConfigStore implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{ConfigStore, Result, StoreError};

/// In-memory implementation of [`ConfigStore`].
///
/// Stores entries keyed by `(group, key)` for testing and local
/// development.
pub struct InMemoryConfigStore {
    entries: RwLock<HashMap<(String, String), String>>,
}

impl InMemoryConfigStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn get(&self, group: &str, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(&(group.to_owned(), key.to_owned())).cloned())
    }

    fn set(&self, group: &str, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        entries.insert((group.to_owned(), key.to_owned()), value.to_owned());
        Ok(())
    }

    fn unset(&self, group: &str, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        entries.remove(&(group.to_owned(), key.to_owned()));
        Ok(())
    }
}

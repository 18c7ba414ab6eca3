//! Persisted Storage
//!
//! A string key-value capability. The browser build backs it with
//! `localStorage`; tests use [`MemoryStorage`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{GuideError, Result};

/// Key-value store for the persisted transcript
pub trait Storage {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` (no-op if absent)
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory storage (for development/testing)
///
/// Clones share the same map, so a test can hand one clone to a session and
/// inspect the other.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut entries) = storage.entries.write() {
            entries.insert(key.into(), value.into());
        }
        storage
    }

    /// Whether `key` is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .is_ok_and(|entries| entries.contains_key(key))
    }
}

fn poisoned() -> GuideError {
    GuideError::Storage("memory storage lock poisoned".into())
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

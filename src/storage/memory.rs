use std::sync::Mutex;

use super::{StorageBackend, DEFAULT_STORAGE_KEY};
use crate::errors::Result;

/// Volatile slot, handy for tests and for embedding without a disk.
#[derive(Debug)]
pub struct MemoryStorage {
    key: String,
    slot: Mutex<Option<String>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            slot: Mutex::new(None),
        }
    }

    pub fn with_contents(raw: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.replace(Some(raw.into()));
        storage
    }

    pub fn contents(&self) -> Option<String> {
        self.slot
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn replace(&self, value: Option<String>) {
        match self.slot.lock() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn key(&self) -> &str {
        &self.key
    }

    fn read_slot(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write_slot(&self, data: &str) -> Result<()> {
        self.replace(Some(data.to_string()));
        Ok(())
    }
}

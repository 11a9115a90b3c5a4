use std::{collections::HashMap, sync::RwLock};

use crate::errors::ServiceError;
use super::KeyValueStorage;

/// In-process storage area.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }

    /// Storage area pre-seeded with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = HashMap::new();
        map.insert(key.into(), value.into());
        Self { inner: RwLock::new(map) }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| ServiceError::Storage("memory storage lock poisoned".into()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

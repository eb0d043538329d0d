//! Volatile key/value backend.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::StorageError;
use crate::port::outbound::storage::{Durability, StorageBackend};

/// Process-lifetime map. Accepted writes do not count as durable.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    name: String,
    values: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: RwLock::new(HashMap::new()),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn durability(&self) -> Durability {
        Durability::Volatile
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.write().remove(key);
        Ok(())
    }
}

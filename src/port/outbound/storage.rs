//! Key/value backend port used by the preference cache.

use crate::error::StorageError;

/// Key written by the availability probe.
pub const PROBE_KEY: &str = "__storage_test__";

/// Value written by the availability probe.
pub const PROBE_VALUE: &str = "test";

/// Whether a backend survives a process restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
    Durable,
    Volatile,
}

/// A string key/value store that may fail at any time.
///
/// Implementations report failures as [`StorageError`]; the caller decides
/// whether to keep using the backend.
pub trait StorageBackend: Send + Sync {
    /// Short name used in logs and status reports.
    fn name(&self) -> &str;

    fn durability(&self) -> Durability;

    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Round-trip self-test: write the sentinel, read it back, delete it.
    ///
    /// # Errors
    /// Any operation failure, or [`StorageError::Mismatch`] if the value read
    /// back differs from the one written.
    fn probe(&self) -> Result<(), StorageError> {
        self.set(PROBE_KEY, PROBE_VALUE)?;
        // The sentinel is removed even when the read-back fails.
        let read = self.get(PROBE_KEY);
        let removed = self.remove(PROBE_KEY);
        let read = read?;
        removed?;

        match read {
            Some(value) if value == PROBE_VALUE => Ok(()),
            actual => Err(StorageError::Mismatch {
                expected: PROBE_VALUE.to_string(),
                actual,
            }),
        }
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn durability(&self) -> Durability {
        (**self).durability()
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn probe(&self) -> Result<(), StorageError> {
        (**self).probe()
    }
}

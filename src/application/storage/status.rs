//! Diagnostic snapshot of the preference cache.

use serde::Serialize;

use crate::port::outbound::storage::Durability;

/// What the facade currently believes about one backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Availability {
    /// Not probed yet.
    Unknown,
    /// Probe passed and no operation has failed since.
    Available,
    /// Probe or a later operation failed.
    Unavailable { reason: String },
}

impl Availability {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub name: String,
    pub durability: Durability,
    pub availability: Availability,
}

/// Snapshot returned by [`SafeStorage::status`](super::SafeStorage::status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStatus {
    /// Backends in priority order.
    pub backends: Vec<BackendStatus>,
    /// Keys written this process whose latest value reached no durable
    /// backend, sorted.
    pub memory_keys: Vec<String>,
}

impl StorageStatus {
    /// True when no durable backend is known to be available.
    #[must_use]
    pub fn is_memory_only(&self) -> bool {
        !self
            .backends
            .iter()
            .any(|b| b.durability == Durability::Durable && b.availability.is_available())
    }

    #[must_use]
    pub fn backend(&self, name: &str) -> Option<&BackendStatus> {
        self.backends.iter().find(|b| b.name == name)
    }

    #[must_use]
    pub fn is_memory_key(&self, key: &str) -> bool {
        self.memory_keys.iter().any(|k| k == key)
    }
}

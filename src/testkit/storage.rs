//! Scripted [`StorageBackend`] for exercising the preference cache.
//!
//! [`ScriptedBackend`] keeps its map, failure mode and call counters behind
//! an `Arc`, so a clone handed to [`SafeStorage`](crate::application::storage::SafeStorage)
//! can still be inspected and reconfigured by the test.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::StorageError;
use crate::port::outbound::storage::{Durability, StorageBackend};

/// How a [`ScriptedBackend`] misbehaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureMode {
    /// Every operation fails with the error.
    Always(StorageError),
    /// The first `ops` operations succeed, every later one fails.
    AfterOps { ops: u32, error: StorageError },
    /// Writes succeed but reads return a different value.
    CorruptReads,
}

impl FailureMode {
    pub fn always(error: StorageError) -> Self {
        Self::Always(error)
    }

    pub fn after_ops(ops: u32, error: StorageError) -> Self {
        Self::AfterOps { ops, error }
    }
}

/// Snapshot of how often each operation was invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub get: u32,
    pub set: u32,
    pub remove: u32,
}

impl CallCounts {
    pub fn total(&self) -> u32 {
        self.get + self.set + self.remove
    }
}

#[derive(Default)]
struct Shared {
    values: Mutex<HashMap<String, String>>,
    failure: Mutex<Option<FailureMode>>,
    ops: AtomicU32,
    gets: AtomicU32,
    sets: AtomicU32,
    removes: AtomicU32,
}

/// In-memory backend with injectable failures and shared call counters.
#[derive(Clone)]
pub struct ScriptedBackend {
    name: String,
    durability: Durability,
    shared: Arc<Shared>,
}

impl ScriptedBackend {
    /// A well-behaved durable backend.
    pub fn durable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            durability: Durability::Durable,
            shared: Arc::new(Shared::default()),
        }
    }

    /// A well-behaved volatile backend.
    pub fn volatile(name: &str) -> Self {
        Self {
            durability: Durability::Volatile,
            ..Self::durable(name)
        }
    }

    /// A durable backend that misbehaves according to `mode`.
    pub fn failing(name: &str, mode: FailureMode) -> Self {
        let backend = Self::durable(name);
        backend.set_failure(Some(mode));
        backend
    }

    /// Replace the failure mode; `None` makes the backend healthy again.
    pub fn set_failure(&self, mode: Option<FailureMode>) {
        *self.shared.failure.lock() = mode;
    }

    /// Seed a value as if an earlier process had written it.
    pub fn preload(&self, key: &str, value: &str) {
        self.shared
            .values
            .lock()
            .insert(key.to_string(), value.to_string());
    }

    /// Value currently held, bypassing failure injection and counters.
    pub fn stored(&self, key: &str) -> Option<String> {
        self.shared.values.lock().get(key).cloned()
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            get: self.shared.gets.load(Ordering::SeqCst),
            set: self.shared.sets.load(Ordering::SeqCst),
            remove: self.shared.removes.load(Ordering::SeqCst),
        }
    }

    /// Count the operation and return the injected error, if any.
    fn check(&self, counter: &AtomicU32) -> Result<(), StorageError> {
        counter.fetch_add(1, Ordering::SeqCst);
        let op = self.shared.ops.fetch_add(1, Ordering::SeqCst) + 1;

        match &*self.shared.failure.lock() {
            Some(FailureMode::Always(error)) => Err(error.clone()),
            Some(FailureMode::AfterOps { ops, error }) if op > *ops => Err(error.clone()),
            _ => Ok(()),
        }
    }

    fn corrupts_reads(&self) -> bool {
        matches!(*self.shared.failure.lock(), Some(FailureMode::CorruptReads))
    }
}

impl StorageBackend for ScriptedBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn durability(&self) -> Durability {
        self.durability
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check(&self.shared.gets)?;
        let value = self.shared.values.lock().get(key).cloned();
        if self.corrupts_reads() {
            return Ok(value.map(|v| format!("{v}~corrupt")));
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check(&self.shared.sets)?;
        self.shared
            .values
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(&self.shared.removes)?;
        self.shared.values.lock().remove(key);
        Ok(())
    }
}

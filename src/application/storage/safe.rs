//! Resilient key/value facade over a prioritized list of backends.
//!
//! Reads and writes never fail. Each backend is probed lazily on first use;
//! a backend that fails its probe or any later operation is marked
//! unavailable and not invoked again (unless a re-probe interval is
//! configured). An in-memory map always receives every write, so values set
//! during this process stay readable even when no backend works.
//!
//! # Example
//!
//! ```
//! use propdesk::application::storage::SafeStorage;
//!
//! let storage = SafeStorage::memory_only();
//! assert!(!storage.set("language", "en"));
//! assert_eq!(storage.get("language", "pt"), "en");
//! assert_eq!(storage.get("darkMode", "false"), "false");
//! ```

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::status::{Availability, BackendStatus, StorageStatus};
use crate::error::StorageError;
use crate::port::outbound::storage::{Durability, StorageBackend};

/// When an unavailable backend may be tried again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReprobePolicy {
    /// Unavailable for the rest of the process.
    #[default]
    Never,
    /// Probe again once this long has passed since the failure.
    AfterInterval(Duration),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageOptions {
    pub reprobe: ReprobePolicy,
}

enum SlotState {
    Unknown,
    Available,
    Unavailable { reason: String, since: Instant },
}

struct Slot {
    backend: Box<dyn StorageBackend>,
    state: SlotState,
    /// Keys removed while this backend was unavailable.
    pending_removals: BTreeSet<String>,
}

/// Where the latest value of a key written this process lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Backend(usize),
    Memory,
    Removed,
}

struct Inner {
    slots: Vec<Slot>,
    memory: HashMap<String, String>,
    placement: HashMap<String, Placement>,
}

impl Inner {
    /// Probe if needed; returns whether the backend may be used.
    fn ensure_available(&mut self, index: usize, reprobe: ReprobePolicy) -> bool {
        let slot = &mut self.slots[index];
        match &slot.state {
            SlotState::Available => return true,
            SlotState::Unknown => {}
            SlotState::Unavailable { since, .. } => match reprobe {
                ReprobePolicy::Never => return false,
                ReprobePolicy::AfterInterval(interval) if since.elapsed() < interval => {
                    return false
                }
                ReprobePolicy::AfterInterval(_) => {
                    debug!(backend = %slot.backend.name(), "Re-probing storage backend");
                }
            },
        }

        match slot.backend.probe() {
            Ok(()) => {
                debug!(backend = %slot.backend.name(), "Storage backend available");
                slot.state = SlotState::Available;
                self.flush_pending_removals(index)
            }
            Err(error) => {
                self.mark_unavailable(index, "probe", &error);
                false
            }
        }
    }

    /// Apply deletes that were issued while the backend was unavailable.
    fn flush_pending_removals(&mut self, index: usize) -> bool {
        let pending: Vec<String> = self.slots[index].pending_removals.iter().cloned().collect();
        for key in pending {
            match self.slots[index].backend.remove(&key) {
                Ok(()) => {
                    self.slots[index].pending_removals.remove(&key);
                }
                Err(error) => {
                    self.mark_unavailable(index, "remove", &error);
                    return false;
                }
            }
        }
        true
    }

    fn mark_unavailable(&mut self, index: usize, operation: &'static str, error: &StorageError) {
        let slot = &mut self.slots[index];
        warn!(
            backend = %slot.backend.name(),
            operation,
            kind = error.kind().as_str(),
            error = %error,
            "Storage backend unavailable, falling back"
        );
        slot.state = SlotState::Unavailable {
            reason: error.to_string(),
            since: Instant::now(),
        };
    }

    fn read_backend(&mut self, index: usize, key: &str, reprobe: ReprobePolicy) -> Option<String> {
        if !self.ensure_available(index, reprobe) {
            return None;
        }
        match self.slots[index].backend.get(key) {
            Ok(value) => value,
            Err(error) => {
                self.mark_unavailable(index, "get", &error);
                None
            }
        }
    }
}

/// Preference cache that degrades to memory instead of failing.
///
/// Construct one per application context and share it via `Arc`.
pub struct SafeStorage {
    inner: Mutex<Inner>,
    options: StorageOptions,
}

impl SafeStorage {
    /// Build a facade over `backends`, highest priority first.
    #[must_use]
    pub fn new(backends: Vec<Box<dyn StorageBackend>>, options: StorageOptions) -> Self {
        let slots = backends
            .into_iter()
            .map(|backend| Slot {
                backend,
                state: SlotState::Unknown,
                pending_removals: BTreeSet::new(),
            })
            .collect();
        Self {
            inner: Mutex::new(Inner {
                slots,
                memory: HashMap::new(),
                placement: HashMap::new(),
            }),
            options,
        }
    }

    /// Facade with no backends; every value lives in memory.
    #[must_use]
    pub fn memory_only() -> Self {
        Self::new(Vec::new(), StorageOptions::default())
    }

    /// Latest value for `key`, or `fallback` if it is set nowhere.
    #[must_use]
    pub fn get(&self, key: &str, fallback: &str) -> String {
        self.get_opt(key).unwrap_or_else(|| fallback.to_string())
    }

    /// Latest value for `key`, if any.
    #[must_use]
    pub fn get_opt(&self, key: &str) -> Option<String> {
        let reprobe = self.options.reprobe;
        let mut inner = self.inner.lock();

        match inner.placement.get(key).copied() {
            Some(Placement::Memory) => return inner.memory.get(key).cloned(),
            Some(Placement::Removed) => return None,
            Some(Placement::Backend(index)) => {
                return inner
                    .read_backend(index, key, reprobe)
                    .or_else(|| inner.memory.get(key).cloned());
            }
            None => {}
        }

        for index in 0..inner.slots.len() {
            if let Some(value) = inner.read_backend(index, key, reprobe) {
                return Some(value);
            }
        }
        inner.memory.get(key).cloned()
    }

    /// Store `value` under `key`.
    ///
    /// Returns true when a durable backend accepted the value. The value is
    /// readable for the rest of the process either way.
    pub fn set(&self, key: &str, value: &str) -> bool {
        let reprobe = self.options.reprobe;
        let mut inner = self.inner.lock();

        let mut placed = None;
        for index in 0..inner.slots.len() {
            if !inner.ensure_available(index, reprobe) {
                continue;
            }
            match inner.slots[index].backend.set(key, value) {
                Ok(()) => {
                    placed = Some(index);
                    break;
                }
                Err(error) => inner.mark_unavailable(index, "set", &error),
            }
        }

        inner.memory.insert(key.to_string(), value.to_string());
        inner.placement.insert(
            key.to_string(),
            placed.map_or(Placement::Memory, Placement::Backend),
        );

        placed.is_some_and(|index| inner.slots[index].backend.durability() == Durability::Durable)
    }

    /// Best-effort delete from every backend and from memory.
    ///
    /// Returns true if at least one backend confirmed the delete.
    pub fn remove(&self, key: &str) -> bool {
        let reprobe = self.options.reprobe;
        let mut inner = self.inner.lock();

        let mut removed = false;
        for index in 0..inner.slots.len() {
            if inner.ensure_available(index, reprobe) {
                match inner.slots[index].backend.remove(key) {
                    Ok(()) => {
                        removed = true;
                        continue;
                    }
                    Err(error) => inner.mark_unavailable(index, "remove", &error),
                }
            }
            inner.slots[index].pending_removals.insert(key.to_string());
        }

        inner.memory.remove(key);
        inner.placement.insert(key.to_string(), Placement::Removed);
        removed
    }

    /// Current availability of each backend and the memory-only keys.
    ///
    /// Does not probe; backends never touched report `Unknown`.
    #[must_use]
    pub fn status(&self) -> StorageStatus {
        let inner = self.inner.lock();

        let backends = inner
            .slots
            .iter()
            .map(|slot| BackendStatus {
                name: slot.backend.name().to_string(),
                durability: slot.backend.durability(),
                availability: match &slot.state {
                    SlotState::Unknown => Availability::Unknown,
                    SlotState::Available => Availability::Available,
                    SlotState::Unavailable { reason, .. } => Availability::Unavailable {
                        reason: reason.clone(),
                    },
                },
            })
            .collect();

        let mut memory_keys: Vec<String> = inner
            .placement
            .iter()
            .filter(|(_, placement)| match placement {
                Placement::Memory => true,
                Placement::Removed => false,
                Placement::Backend(index) => {
                    inner.slots[*index].backend.durability() != Durability::Durable
                }
            })
            .map(|(key, _)| key.clone())
            .collect();
        memory_keys.sort();

        StorageStatus {
            backends,
            memory_keys,
        }
    }

    /// Probe every backend now instead of waiting for the first operation.
    ///
    /// Follows the re-probe policy, so a backend already marked unavailable
    /// stays that way unless its interval has elapsed.
    pub fn probe_all(&self) {
        let reprobe = self.options.reprobe;
        let mut inner = self.inner.lock();
        for index in 0..inner.slots.len() {
            inner.ensure_available(index, reprobe);
        }
    }

    /// Forget every probe result so the next operation probes again.
    pub fn reset_availability(&self) {
        let mut inner = self.inner.lock();
        for slot in &mut inner.slots {
            slot.state = SlotState::Unknown;
        }
    }
}

impl std::fmt::Debug for SafeStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeStorage")
            .field("status", &self.status())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::storage::{FailureMode, ScriptedBackend};

    fn facade(backends: Vec<Box<dyn StorageBackend>>) -> SafeStorage {
        SafeStorage::new(backends, StorageOptions::default())
    }

    #[test]
    fn set_then_get_round_trips_in_memory_only_mode() {
        let storage = SafeStorage::memory_only();
        assert!(!storage.set("language", "en"));
        assert_eq!(storage.get("language", "pt"), "en");
        assert!(storage.status().is_memory_key("language"));
    }

    #[test]
    fn unknown_key_returns_fallback() {
        let storage = facade(vec![Box::new(ScriptedBackend::durable("disk"))]);
        assert_eq!(storage.get("never-set", "fallback"), "fallback");
        assert_eq!(storage.get_opt("never-set"), None);
    }

    #[test]
    fn remove_then_get_returns_fallback() {
        let storage = facade(vec![Box::new(ScriptedBackend::durable("disk"))]);
        storage.set("k", "v");
        assert!(storage.remove("k"));
        assert_eq!(storage.get("k", "fb"), "fb");
    }

    #[test]
    fn remove_while_backend_down_stays_removed_after_recovery() {
        let disk = ScriptedBackend::durable("disk");
        disk.preload("language", "en");
        disk.set_failure(Some(FailureMode::always(StorageError::Unavailable(
            "locked".into(),
        ))));
        let storage = SafeStorage::new(
            vec![Box::new(disk.clone())],
            StorageOptions {
                reprobe: ReprobePolicy::AfterInterval(Duration::ZERO),
            },
        );

        assert!(!storage.remove("language"));
        disk.set_failure(None);

        assert_eq!(storage.get("language", "pt"), "pt");
        assert!(!storage.status().is_memory_key("language"));

        // The recovered backend receives the delete it missed.
        storage.probe_all();
        assert_eq!(disk.stored("language"), None);
        assert!(storage.set("darkMode", "true"));
    }

    #[test]
    fn set_after_remove_is_readable_again() {
        let storage = facade(vec![Box::new(ScriptedBackend::durable("disk"))]);
        storage.set("k", "v1");
        storage.remove("k");
        assert!(storage.set("k", "v2"));
        assert_eq!(storage.get("k", ""), "v2");
    }

    #[test]
    fn durable_write_reports_success() {
        let disk = ScriptedBackend::durable("disk");
        let storage = facade(vec![Box::new(disk.clone())]);

        assert!(storage.set("language", "en"));
        assert_eq!(disk.stored("language").as_deref(), Some("en"));
        assert!(storage.status().memory_keys.is_empty());
        assert!(storage.status().backend("disk").unwrap().availability.is_available());
    }

    #[test]
    fn failed_probe_is_never_retried() {
        let disk = ScriptedBackend::failing("disk", FailureMode::always(StorageError::SecurityDenied(
            "sandboxed".into(),
        )));
        let storage = facade(vec![Box::new(disk.clone())]);

        for i in 0..10 {
            storage.set(&format!("k{i}"), "v");
            let _ = storage.get(&format!("k{i}"), "");
            storage.remove(&format!("k{i}"));
        }

        // Only the single probe write ever reached the backend.
        assert_eq!(disk.calls().total(), 1);
    }

    #[test]
    fn falls_through_to_secondary_backend() {
        let disk = ScriptedBackend::failing("disk", FailureMode::always(StorageError::QuotaExceeded(
            "full".into(),
        )));
        let session = ScriptedBackend::durable("session");
        let storage = facade(vec![Box::new(disk), Box::new(session.clone())]);

        assert!(storage.set("theme", "dark"));
        assert_eq!(session.stored("theme").as_deref(), Some("dark"));
        assert_eq!(storage.get("theme", ""), "dark");
    }

    #[test]
    fn volatile_secondary_is_not_durable_success() {
        let storage = facade(vec![Box::new(ScriptedBackend::volatile("session"))]);
        assert!(!storage.set("k", "v"));
        assert_eq!(storage.get("k", ""), "v");
        assert!(storage.status().is_memory_key("k"));
    }

    #[test]
    fn mid_session_failure_keeps_latest_value() {
        let disk = ScriptedBackend::failing("disk", FailureMode::after_ops(
            4,
            StorageError::Io("disk gone".into()),
        ));
        let storage = facade(vec![Box::new(disk.clone())]);

        // probe (3 ops) + first set (1 op) succeed
        assert!(storage.set("k", "v1"));
        assert!(!storage.set("k", "v2"));
        assert_eq!(storage.get("k", ""), "v2");

        let status = storage.status();
        assert!(status.is_memory_only());
        assert!(status.is_memory_key("k"));
        assert!(matches!(
            status.backend("disk").unwrap().availability,
            Availability::Unavailable { .. }
        ));
    }

    #[test]
    fn probe_mismatch_marks_unavailable() {
        let disk = ScriptedBackend::failing("disk", FailureMode::CorruptReads);
        let storage = facade(vec![Box::new(disk)]);
        assert!(!storage.set("k", "v"));
        assert_eq!(storage.get("k", ""), "v");
        assert!(storage.status().is_memory_only());
    }

    #[test]
    fn reads_values_persisted_by_an_earlier_process() {
        let disk = ScriptedBackend::durable("disk");
        disk.preload("language", "en");
        let storage = facade(vec![Box::new(disk)]);
        assert_eq!(storage.get("language", "pt"), "en");
    }

    #[test]
    fn status_does_not_probe() {
        let disk = ScriptedBackend::durable("disk");
        let storage = facade(vec![Box::new(disk.clone())]);
        let status = storage.status();
        assert_eq!(status.backends[0].availability, Availability::Unknown);
        assert_eq!(disk.calls().total(), 0);
    }

    #[test]
    fn probe_all_reports_each_backend() {
        let disk = ScriptedBackend::failing(
            "disk",
            FailureMode::always(StorageError::SecurityDenied("sandbox".into())),
        );
        let cache = ScriptedBackend::volatile("cache");
        let storage = facade(vec![Box::new(disk), Box::new(cache.clone())]);

        storage.probe_all();

        let status = storage.status();
        assert!(matches!(
            status.backends[0].availability,
            Availability::Unavailable { .. }
        ));
        assert_eq!(status.backends[1].availability, Availability::Available);
        assert_eq!(cache.calls().total(), 3);
    }

    #[test]
    fn reset_availability_probes_again() {
        let disk = ScriptedBackend::failing("disk", FailureMode::always(StorageError::Unavailable(
            "off".into(),
        )));
        let storage = facade(vec![Box::new(disk.clone())]);
        storage.set("k", "v");
        storage.reset_availability();
        storage.set("k", "v");
        assert_eq!(disk.calls().total(), 2);
    }

    #[test]
    fn reprobe_after_interval_recovers_and_prefers_memory_value() {
        let disk = ScriptedBackend::durable("disk");
        disk.preload("k", "stale");
        disk.set_failure(Some(FailureMode::always(StorageError::SecurityDenied(
            "handshake".into(),
        ))));
        let storage = SafeStorage::new(
            vec![Box::new(disk.clone())],
            StorageOptions {
                reprobe: ReprobePolicy::AfterInterval(Duration::ZERO),
            },
        );

        assert!(!storage.set("k", "fresh"));
        disk.set_failure(None);

        assert_eq!(storage.get("k", ""), "fresh");
        assert!(storage.set("other", "x"));
        assert!(storage.status().backend("disk").unwrap().availability.is_available());
    }
}

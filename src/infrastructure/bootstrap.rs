//! Composition root: builds the preference cache from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::storage::{FileBackend, MemoryBackend, SqliteBackend};
use crate::application::preferences::Preferences;
use crate::application::storage::SafeStorage;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::storage::BackendConfig;
use crate::infrastructure::paths;
use crate::port::outbound::storage::StorageBackend;

/// Backends used when the config names none: a SQLite file in the data
/// directory, then a volatile per-process map.
pub fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig::Sqlite {
            path: paths::default_database(),
        },
        BackendConfig::Memory,
    ]
}

/// Open one configured backend.
///
/// # Errors
/// Returns an error if a SQLite database cannot be opened.
pub fn open_backend(config: &BackendConfig) -> crate::error::Result<Box<dyn StorageBackend>> {
    Ok(match config {
        BackendConfig::Sqlite { path } => Box::new(SqliteBackend::open(paths::resolve(path))?),
        BackendConfig::File { path } => Box::new(FileBackend::new(paths::resolve(path))),
        BackendConfig::Memory => Box::new(MemoryBackend::new("session")),
    })
}

/// Build the preference cache.
///
/// Backends that fail to open are skipped with a warning; the cache still
/// comes up, in memory-only mode if nothing opened.
pub fn build_storage(config: &Config) -> Arc<SafeStorage> {
    let configured = config
        .storage
        .backends
        .clone()
        .unwrap_or_else(default_backends);

    let mut backends = Vec::with_capacity(configured.len());
    for backend in &configured {
        match open_backend(backend) {
            Ok(opened) => backends.push(opened),
            Err(e) => warn!(
                backend = backend.kind(),
                error = %e,
                "Skipping storage backend that failed to open"
            ),
        }
    }

    if backends.is_empty() {
        info!("Preference storage running in memory-only mode");
    }
    Arc::new(SafeStorage::new(backends, config.storage.options()))
}

/// Preferences over a freshly built cache.
pub fn build_preferences(config: &Config) -> Preferences {
    Preferences::new(build_storage(config), config.locale.default_language)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(backends: Vec<BackendConfig>) -> Config {
        let mut config = Config::default();
        config.storage.backends = Some(backends);
        config
    }

    #[test]
    fn empty_backend_list_is_memory_only() {
        let storage = build_storage(&config_with(Vec::new()));
        assert!(!storage.set("language", "en"));
        assert!(storage.status().backends.is_empty());
        assert_eq!(storage.get("language", "pt"), "en");
    }

    #[test]
    fn configured_file_backend_is_durable() {
        let dir = tempfile::tempdir().unwrap();
        let storage = build_storage(&config_with(vec![BackendConfig::File {
            path: dir.path().join("prefs.json"),
        }]));

        assert!(storage.set("darkMode", "true"));
        assert!(dir.path().join("prefs.json").exists());
    }

    #[test]
    fn unopenable_sqlite_backend_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let storage = build_storage(&config_with(vec![
            BackendConfig::Sqlite {
                path: blocker.join("prefs.db"),
            },
            BackendConfig::Memory,
        ]));

        let status = storage.status();
        assert_eq!(status.backends.len(), 1);
        assert_eq!(status.backends[0].name, "session");
    }
}

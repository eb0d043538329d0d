//! Durable key/value backend stored as a single JSON object on disk.
//!
//! Every write rewrites the whole map to a sibling temp file and renames it
//! over the original, so a crash never leaves a half-written file.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::StorageError;
use crate::port::outbound::storage::{Durability, StorageBackend};

/// JSON map file backend.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileBackend {
    /// Backend over `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(classify_io(&e)),
        }
    }

    fn store(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| classify_io(&e))?;
        }
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, contents).map_err(|e| classify_io(&e))?;
        fs::rename(&temp, &self.path).map_err(|e| classify_io(&e))
    }
}

/// Map an I/O failure onto the storage failure taxonomy.
pub(crate) fn classify_io(error: &io::Error) -> StorageError {
    if error.kind() == io::ErrorKind::PermissionDenied {
        return StorageError::SecurityDenied(error.to_string());
    }
    match error.raw_os_error() {
        Some(code) if code == libc::ENOSPC || code == libc::EDQUOT => {
            StorageError::QuotaExceeded(error.to_string())
        }
        _ => StorageError::Io(error.to_string()),
    }
}

impl StorageBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    fn durability(&self) -> Durability {
        Durability::Durable
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.store(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.store(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_file_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let backend = FileBackend::new(&path);

        assert_eq!(backend.get("language").unwrap(), None);
        backend.set("language", "en").unwrap();

        assert!(path.exists());
        let reopened = FileBackend::new(&path);
        assert_eq!(reopened.get("language").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn remove_deletes_only_that_key() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("prefs.json"));
        backend.set("a", "1").unwrap();
        backend.set("b", "2").unwrap();

        backend.remove("a").unwrap();

        assert_eq!(backend.get("a").unwrap(), None);
        assert_eq!(backend.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();

        let error = FileBackend::new(&path).get("k").unwrap_err();
        assert!(matches!(error, StorageError::Serialization(_)));
    }

    #[test]
    fn io_errors_are_classified() {
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(matches!(classify_io(&denied), StorageError::SecurityDenied(_)));

        let full = io::Error::from_raw_os_error(libc::ENOSPC);
        assert!(matches!(classify_io(&full), StorageError::QuotaExceeded(_)));

        let quota = io::Error::from_raw_os_error(libc::EDQUOT);
        assert!(matches!(classify_io(&quota), StorageError::QuotaExceeded(_)));

        let other = io::Error::from(io::ErrorKind::UnexpectedEof);
        assert!(matches!(classify_io(&other), StorageError::Io(_)));
    }
}

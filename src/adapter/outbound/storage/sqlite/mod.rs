//! Durable key/value backend on a SQLite file via Diesel.

pub mod connection;
pub mod model;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::Utc;
use diesel::prelude::*;
use tracing::debug;

use self::connection::{create_pool, run_migrations, DbPool};
use self::model::KvEntryRow;
use self::schema::kv_entries;
use crate::error::{Error, Result, StorageError};
use crate::port::outbound::storage::{Durability, StorageBackend};

/// Preferences stored in the `kv_entries` table.
pub struct SqliteBackend {
    pool: DbPool,
    path: PathBuf,
}

impl SqliteBackend {
    /// Open (or create) the database at `path` and apply migrations.
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created, the pool
    /// cannot connect, or a migration fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let url = path
            .to_str()
            .ok_or_else(|| Error::Connection(format!("non UTF-8 path: {}", path.display())))?;

        let pool = create_pool(url)?;
        run_migrations(&pool)?;
        debug!(path = %path.display(), "Opened SQLite preference store");
        Ok(Self { pool, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connection(
        &self,
    ) -> std::result::Result<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>,
        StorageError,
    > {
        self.pool
            .get()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

/// Map a Diesel error onto the storage failure taxonomy by message.
fn classify(error: &diesel::result::Error) -> StorageError {
    let message = error.to_string();
    let lower = message.to_ascii_lowercase();
    if lower.contains("full") {
        StorageError::QuotaExceeded(message)
    } else if lower.contains("readonly")
        || lower.contains("permission")
        || lower.contains("authorization")
    {
        StorageError::SecurityDenied(message)
    } else {
        StorageError::Database(message)
    }
}

impl StorageBackend for SqliteBackend {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn durability(&self) -> Durability {
        Durability::Durable
    }

    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let mut conn = self.connection()?;
        kv_entries::table
            .filter(kv_entries::key.eq(key))
            .select(kv_entries::value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(|e| classify(&e))
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        let mut conn = self.connection()?;
        let row = KvEntryRow {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Utc::now().to_rfc3339(),
        };
        diesel::replace_into(kv_entries::table)
            .values(&row)
            .execute(&mut conn)
            .map(|_| ())
            .map_err(|e| classify(&e))
    }

    fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
        let mut conn = self.connection()?;
        diesel::delete(kv_entries::table.filter(kv_entries::key.eq(key)))
            .execute(&mut conn)
            .map(|_| ())
            .map_err(|e| classify(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    fn open_temp() -> (tempfile::TempDir, SqliteBackend) {
        let dir = tempfile::tempdir().unwrap();
        let backend = SqliteBackend::open(dir.path().join("prefs.db")).unwrap();
        (dir, backend)
    }

    #[test]
    fn set_get_remove() {
        let (_dir, backend) = open_temp();

        assert_eq!(backend.get("language").unwrap(), None);
        backend.set("language", "en").unwrap();
        backend.set("language", "pt").unwrap();
        assert_eq!(backend.get("language").unwrap().as_deref(), Some("pt"));

        backend.remove("language").unwrap();
        assert_eq!(backend.get("language").unwrap(), None);
    }

    #[test]
    fn probe_passes_on_fresh_database() {
        let (_dir, backend) = open_temp();
        assert!(backend.probe().is_ok());
        assert_eq!(backend.get(crate::port::outbound::storage::PROBE_KEY).unwrap(), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");
        SqliteBackend::open(&path).unwrap().set("darkMode", "true").unwrap();

        let reopened = SqliteBackend::open(&path).unwrap();
        assert_eq!(reopened.get("darkMode").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn classifies_full_and_readonly_errors() {
        let full = DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("database or disk is full".to_string()),
        );
        assert!(matches!(classify(&full), StorageError::QuotaExceeded(_)));

        let readonly = DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("attempt to write a readonly database".to_string()),
        );
        assert!(matches!(classify(&readonly), StorageError::SecurityDenied(_)));

        assert!(matches!(
            classify(&DieselError::NotFound),
            StorageError::Database(_)
        ));
    }
}

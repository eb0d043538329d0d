//! Preference storage configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::application::storage::{ReprobePolicy, StorageOptions};
use crate::error::ConfigError;

/// One backend in the priority list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// SQLite database file.
    Sqlite { path: PathBuf },
    /// JSON map file.
    File { path: PathBuf },
    /// Volatile map; never counts as durable.
    Memory,
}

impl BackendConfig {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite",
            Self::File { .. } => "file",
            Self::Memory => "memory",
        }
    }
}

/// When to retry an unavailable backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawReprobe")]
pub enum ReprobeConfig {
    /// `reprobe = "never"`.
    #[default]
    Never,
    /// `reprobe = { after_secs = 60 }`.
    After { after_secs: u64 },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReprobe {
    Named(String),
    After { after_secs: u64 },
}

impl TryFrom<RawReprobe> for ReprobeConfig {
    type Error = String;

    fn try_from(raw: RawReprobe) -> Result<Self, Self::Error> {
        match raw {
            RawReprobe::Named(name) if name == "never" => Ok(Self::Never),
            RawReprobe::Named(other) => Err(format!(
                "unknown reprobe policy {other:?}, expected \"never\" or {{ after_secs = N }}"
            )),
            RawReprobe::After { after_secs } => Ok(Self::After { after_secs }),
        }
    }
}

impl ReprobeConfig {
    #[must_use]
    pub fn policy(self) -> ReprobePolicy {
        match self {
            Self::Never => ReprobePolicy::Never,
            Self::After { after_secs } => {
                ReprobePolicy::AfterInterval(Duration::from_secs(after_secs))
            }
        }
    }
}

/// `[storage]` section.
///
/// Backends are tried in order. `None` means the default durable file
/// under the data directory; an explicit empty list means memory-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backends: Option<Vec<BackendConfig>>,
    pub reprobe: ReprobeConfig,
}

impl StorageConfig {
    #[must_use]
    pub fn options(&self) -> StorageOptions {
        StorageOptions {
            reprobe: self.reprobe.policy(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for backend in self.backends.iter().flatten() {
            if let BackendConfig::Sqlite { path } | BackendConfig::File { path } = backend {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "storage.backends.path",
                        reason: format!("{} backend needs a path", backend.kind()),
                    });
                }
            }
        }
        if let ReprobeConfig::After { after_secs: 0 } = self.reprobe {
            return Err(ConfigError::InvalidValue {
                field: "storage.reprobe.after_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

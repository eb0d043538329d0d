//! Path utilities for propdesk.
//!
//! All data lives under `~/.propdesk/` unless `PROPDESK_DATA_DIR` points
//! elsewhere:
//! - `config.toml` - main configuration
//! - `preferences.db` - SQLite preference store
//! - `preferences.json` - JSON preference store

use std::path::{Path, PathBuf};

/// Environment variable that replaces the home-based data directory.
pub const DATA_DIR_ENV: &str = "PROPDESK_DATA_DIR";

/// Returns the propdesk data directory.
pub fn home_dir() -> PathBuf {
    data_dir_from(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

fn data_dir_from(overridden: Option<PathBuf>) -> PathBuf {
    overridden
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".propdesk")
        })
}

/// Returns the default config file path.
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default SQLite preference database path.
pub fn default_database() -> PathBuf {
    home_dir().join("preferences.db")
}

/// Resolve a configured path: relative paths live under the data directory.
pub fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        home_dir().join(path)
    }
}

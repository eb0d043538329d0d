//! Language and dark-mode preferences persisted through the cache.

use std::sync::Arc;

use tracing::warn;

use super::storage::SafeStorage;
use crate::domain::Language;

/// Storage key holding the language code.
pub const LANGUAGE_KEY: &str = "language";
/// Storage key holding `"true"` or `"false"`.
pub const DARK_MODE_KEY: &str = "darkMode";

/// User interface preferences.
#[derive(Debug, Clone)]
pub struct Preferences {
    storage: Arc<SafeStorage>,
    default_language: Language,
}

impl Preferences {
    pub fn new(storage: Arc<SafeStorage>, default_language: Language) -> Self {
        Self {
            storage,
            default_language,
        }
    }

    /// Stored language, or the default when unset or unrecognized.
    #[must_use]
    pub fn language(&self) -> Language {
        let Some(code) = self.storage.get_opt(LANGUAGE_KEY) else {
            return self.default_language;
        };
        code.parse().unwrap_or_else(|e| {
            warn!(code = %code, error = %e, "Ignoring stored language");
            self.default_language
        })
    }

    /// Returns true when the choice reached durable storage.
    pub fn set_language(&self, language: Language) -> bool {
        self.storage.set(LANGUAGE_KEY, language.code())
    }

    #[must_use]
    pub fn dark_mode(&self) -> bool {
        self.storage.get(DARK_MODE_KEY, "false") == "true"
    }

    /// Flip dark mode and return the new value.
    pub fn toggle_dark_mode(&self) -> bool {
        let enabled = !self.dark_mode();
        self.storage
            .set(DARK_MODE_KEY, if enabled { "true" } else { "false" });
        enabled
    }
}

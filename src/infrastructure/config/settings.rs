//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; every section is optional.
//!
//! # Example
//!
//! ```no_run
//! use propdesk::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::auth::AuthConfig;
use super::logging::LoggingConfig;
use super::storage::StorageConfig;
use crate::domain::Language;
use crate::error::{ConfigError, Result};

/// `[locale]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Language used until the user picks one.
    pub default_language: Language,
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging and tracing configuration.
    pub logging: LoggingConfig,

    /// Preference storage backends and re-probe policy.
    pub storage: StorageConfig,

    /// Session and profile loading policy.
    pub auth: AuthConfig,

    pub locale: LocaleConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if given, else the default config file if it exists,
    /// else built-in defaults.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or is invalid.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = crate::infrastructure::paths::default_config();
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate configuration values.
    ///
    /// Checks that values are within acceptable ranges.
    fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.auth.validate()?;
        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::storage::{BackendConfig, ReprobeConfig};
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.auth.profile_retry_attempts, 2);
        assert_eq!(config.auth.profile_retry_delay_ms, 2000);
        assert_eq!(config.locale.default_language, Language::Pt);
        assert_eq!(config.storage.backends, None);
        assert_eq!(config.storage.reprobe, ReprobeConfig::Never);
    }

    #[test]
    fn parses_every_section() {
        let config = Config::parse_toml(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [storage]
            backends = [
                { type = "sqlite", path = "prefs.db" },
                { type = "file", path = "/tmp/prefs.json" },
                { type = "memory" },
            ]
            reprobe = { after_secs = 30 }

            [auth]
            profile_retry_attempts = 1
            load_timeout_ms = 5000
            oauth_redirect_url = "https://luzion.pt/auth/callback"

            [locale]
            default_language = "en"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, "json");
        assert_eq!(
            config.storage.backends,
            Some(vec![
                BackendConfig::Sqlite {
                    path: PathBuf::from("prefs.db")
                },
                BackendConfig::File {
                    path: PathBuf::from("/tmp/prefs.json")
                },
                BackendConfig::Memory,
            ])
        );
        assert_eq!(config.storage.reprobe, ReprobeConfig::After { after_secs: 30 });
        assert_eq!(config.auth.profile_retry_attempts, 1);
        assert_eq!(config.auth.profile_retry_delay_ms, 2000);
        assert_eq!(config.locale.default_language, Language::En);

        let settings = config.auth.settings().unwrap();
        assert_eq!(settings.oauth_redirect.host_str(), Some("luzion.pt"));
    }

    #[test]
    fn reprobe_never_is_accepted_and_unknown_rejected() {
        let config = Config::parse_toml("[storage]\nreprobe = \"never\"").unwrap();
        assert_eq!(config.storage.reprobe, ReprobeConfig::Never);

        assert!(matches!(
            Config::parse_toml("[storage]\nreprobe = \"sometimes\""),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }

    fn invalid_field(toml: &str) -> &'static str {
        match Config::parse_toml(toml) {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            invalid_field("[auth]\nload_timeout_ms = 0"),
            "auth.load_timeout_ms"
        );
        assert_eq!(
            invalid_field("[auth]\nprofile_retry_attempts = 6"),
            "auth.profile_retry_attempts"
        );
        assert_eq!(
            invalid_field("[auth]\noauth_redirect_url = \"not a url\""),
            "auth.oauth_redirect_url"
        );
        assert_eq!(
            invalid_field("[storage]\nbackends = [{ type = \"file\", path = \"\" }]"),
            "storage.backends.path"
        );
        assert_eq!(
            invalid_field("[storage]\nreprobe = { after_secs = 0 }"),
            "storage.reprobe.after_secs"
        );
    }

    #[test]
    fn unknown_language_is_a_parse_error() {
        assert!(matches!(
            Config::parse_toml("[locale]\ndefault_language = \"fr\""),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/propdesk.toml"),
            Err(Error::Config(ConfigError::ReadFile(_)))
        ));
    }
}

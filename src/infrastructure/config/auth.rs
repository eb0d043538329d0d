//! Auth session loading configuration.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::application::auth::AuthSettings;
use crate::error::ConfigError;

/// Upper bound on profile retries; a larger value could leave the UI
/// loading for too long.
pub const MAX_PROFILE_RETRY_ATTEMPTS: u32 = 5;

/// `[auth]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub profile_retry_attempts: u32,
    pub profile_retry_delay_ms: u64,
    pub load_timeout_ms: u64,
    pub oauth_redirect_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            profile_retry_attempts: 2,
            profile_retry_delay_ms: 2000,
            load_timeout_ms: 10_000,
            oauth_redirect_url: "http://localhost:5173/auth/callback".into(),
        }
    }
}

impl AuthConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.load_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "auth.load_timeout_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.profile_retry_attempts > MAX_PROFILE_RETRY_ATTEMPTS {
            return Err(ConfigError::InvalidValue {
                field: "auth.profile_retry_attempts",
                reason: format!("must be at most {MAX_PROFILE_RETRY_ATTEMPTS}"),
            });
        }
        self.redirect_url()?;
        Ok(())
    }

    /// Parsed OAuth redirect target.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] if the URL does not parse.
    pub fn redirect_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.oauth_redirect_url).map_err(|e| ConfigError::InvalidValue {
            field: "auth.oauth_redirect_url",
            reason: e.to_string(),
        })
    }

    /// Settings for [`AuthManager`](crate::application::auth::AuthManager).
    ///
    /// # Errors
    /// Returns an error if the redirect URL does not parse.
    pub fn settings(&self) -> Result<AuthSettings, ConfigError> {
        Ok(AuthSettings {
            profile_retry_attempts: self.profile_retry_attempts,
            profile_retry_delay: Duration::from_millis(self.profile_retry_delay_ms),
            load_timeout: Duration::from_millis(self.load_timeout_ms),
            oauth_redirect: self.redirect_url()?,
        })
    }
}

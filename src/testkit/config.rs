//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::application::auth::AuthSettings;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::storage::BackendConfig;

/// The production auth policy: two retries two seconds apart, ten second
/// load ceiling.
pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        profile_retry_attempts: 2,
        profile_retry_delay: Duration::from_millis(2000),
        load_timeout: Duration::from_millis(10_000),
        oauth_redirect: Url::parse("http://localhost:5173/auth/callback")
            .expect("static redirect url"),
    }
}

/// Config whose only backend is a JSON file at `path`.
pub fn file_backed(path: &Path) -> Config {
    let mut config = Config::default();
    config.storage.backends = Some(vec![BackendConfig::File {
        path: path.to_path_buf(),
    }]);
    config
}

/// Config with no backends at all.
pub fn memory_only() -> Config {
    let mut config = Config::default();
    config.storage.backends = Some(Vec::new());
    config
}

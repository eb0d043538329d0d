//! Session-token persistence for the auth client, backed by the preference cache.

use std::sync::Arc;

use super::SafeStorage;
use crate::port::outbound::auth::SessionPersistence;

/// Namespaced view of a [`SafeStorage`] handed to the auth client.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<SafeStorage>,
    prefix: String,
}

impl SessionStore {
    pub fn new(storage: Arc<SafeStorage>, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl SessionPersistence for SessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_opt(&self.key(key))
    }

    fn set_item(&self, key: &str, value: &str) {
        self.storage.set(&self.key(key), value);
    }

    fn remove_item(&self, key: &str) {
        self.storage.remove(&self.key(key));
    }
}

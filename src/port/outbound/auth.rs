//! Authentication port for the hosted auth service.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use url::Url;

use crate::domain::id::UserId;
use crate::error::ServiceError;

/// Identity returned by the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: AuthUser,
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Auth state transitions pushed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

/// Third-party identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }
}

/// Extra attributes attached at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpAttributes {
    pub name: String,
}

pub type AuthCallback = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

/// Handle for an auth state listener; unsubscribes when dropped.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Session and credential operations of the hosted auth service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register an account. `None` when the service accepted the request but
    /// returned no user (e.g. pending e-mail confirmation is not an error).
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: &SignUpAttributes,
    ) -> Result<Option<AuthUser>, ServiceError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<AuthUser>, ServiceError>;

    /// Start an OAuth redirect flow. Completion arrives as an [`AuthEvent`].
    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &Url,
    ) -> Result<(), ServiceError>;

    async fn get_session(&self) -> Result<Option<Session>, ServiceError>;

    fn on_auth_state_change(&self, callback: AuthCallback) -> Subscription;

    async fn sign_out(&self) -> Result<(), ServiceError>;
}

/// Storage the auth client uses for its own session tokens.
///
/// Injected by the application so the client never assumes a host global.
pub trait SessionPersistence: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str);

    fn remove_item(&self, key: &str);
}

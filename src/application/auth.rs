//! Authentication session manager.
//!
//! Tracks the signed-in user and a loading flag for the UI. Every session
//! check and profile load runs under a hard time ceiling; when it expires
//! the manager settles on the signed-out state instead of loading forever.
//! The underlying request is not cancelled, its late result is simply
//! ignored.
//!
//! Results that arrive after [`MountGuard::unmount`] are discarded, so a
//! torn-down view never receives state updates.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::domain::{Role, User, UserProfile};
use crate::port::outbound::auth::{
    AuthEvent, AuthProvider, AuthUser, OAuthProvider, SignUpAttributes, Subscription,
};
use crate::port::outbound::data::{DataService, Table};

/// Route shown after sign-in for administrators.
pub const ADMIN_ROUTE: &str = "/admin";
/// Route shown after sign-in for everyone else.
pub const HOME_ROUTE: &str = "/";

/// Retry and timeout policy for session and profile loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Extra profile lookups after the first one returns nothing.
    pub profile_retry_attempts: u32,
    /// Fixed delay between profile lookups.
    pub profile_retry_delay: Duration,
    /// Ceiling on any session check or profile load.
    pub load_timeout: Duration,
    /// Where the OAuth provider sends the browser back to.
    pub oauth_redirect: Url,
}

/// Cooperative teardown flag shared with in-flight loads.
#[derive(Debug, Clone)]
pub struct MountGuard(Arc<AtomicBool>);

impl MountGuard {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct AuthState {
    user: Option<User>,
    loading: bool,
}

/// Owns the current user for one application context.
pub struct AuthManager {
    auth: Arc<dyn AuthProvider>,
    data: Arc<dyn DataService>,
    settings: AuthSettings,
    guard: MountGuard,
    state: Mutex<AuthState>,
    /// Sequence number of the latest pushed auth event.
    latest_event: AtomicU64,
}

impl AuthManager {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        data: Arc<dyn DataService>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            auth,
            data,
            settings,
            guard: MountGuard::new(),
            state: Mutex::new(AuthState {
                user: None,
                loading: true,
            }),
            latest_event: AtomicU64::new(0),
        }
    }

    /// Handle used to tear the manager down.
    #[must_use]
    pub fn guard(&self) -> MountGuard {
        self.guard.clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.lock().user.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Where to navigate after sign-in, from the session-backed profile.
    #[must_use]
    pub fn post_login_route(&self) -> &'static str {
        match self.state.lock().user.as_ref().map(|u| u.role) {
            Some(Role::Admin) => ADMIN_ROUTE,
            _ => HOME_ROUTE,
        }
    }

    /// Restore the user from an existing session. Always clears loading.
    pub async fn check_session(&self) {
        let outcome = tokio::time::timeout(self.settings.load_timeout, async {
            match self.auth.get_session().await {
                Ok(Some(session)) => Some(self.load_user(&session.user).await),
                Ok(None) => None,
                Err(e) => {
                    error!(error = %e, "Failed to check session");
                    None
                }
            }
        })
        .await;

        let user = match outcome {
            Ok(user) => user,
            Err(_) => {
                warn!(
                    timeout_ms = self.settings.load_timeout.as_millis() as u64,
                    "Session check timed out, continuing signed out"
                );
                None
            }
        };
        self.settle(user);
    }

    /// Sign in with a password. Returns true when a user is now signed in.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.set_loading(true);

        let auth_user = match self.auth.sign_in(email, password).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.settle_keeping_user();
                return false;
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.settle_keeping_user();
                return false;
            }
        };

        let user = self.load_user_with_timeout(&auth_user).await;
        let signed_in = user.is_some();
        self.settle(user);
        signed_in
    }

    /// Create an account. The new user still has to confirm and sign in.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> bool {
        self.set_loading(true);
        let attributes = SignUpAttributes {
            name: name.to_string(),
        };

        let registered = match self.auth.sign_up(email, password, &attributes).await {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "User registered");
                true
            }
            Ok(None) => false,
            Err(e) => {
                error!(error = %e, "Registration failed");
                false
            }
        };
        self.settle_keeping_user();
        registered
    }

    /// Start the Google OAuth redirect.
    ///
    /// Loading stays set on success; the completion arrives as an auth event.
    pub async fn login_with_oauth(&self) -> bool {
        self.set_loading(true);
        match self
            .auth
            .sign_in_with_oauth(OAuthProvider::Google, &self.settings.oauth_redirect)
            .await
        {
            Ok(()) => {
                debug!(redirect = %self.settings.oauth_redirect, "OAuth redirect started");
                true
            }
            Err(e) => {
                error!(error = %e, "OAuth login failed");
                self.settle_keeping_user();
                false
            }
        }
    }

    pub async fn logout(&self) {
        match self.auth.sign_out().await {
            Ok(()) => {
                if self.guard.is_mounted() {
                    self.state.lock().user = None;
                }
            }
            Err(e) => error!(error = %e, "Logout failed"),
        }
    }

    /// Apply an auth state change pushed by the service.
    ///
    /// When several events are in flight, only the most recently issued one
    /// decides the final state.
    pub async fn handle_event(&self, event: AuthEvent) {
        let sequence = self.next_event();
        self.apply_event(event, sequence).await;
    }

    /// Forward service auth events to [`handle_event`](Self::handle_event).
    ///
    /// Each event is handled on the current tokio runtime. Events are
    /// numbered as they arrive, so a slow sign-in finishing after a later
    /// sign-out is discarded.
    #[must_use]
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let manager = Arc::clone(self);
        self.auth.on_auth_state_change(Arc::new(move |event: &AuthEvent| {
            let manager = Arc::clone(&manager);
            let event = event.clone();
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let sequence = manager.next_event();
                    handle.spawn(async move { manager.apply_event(event, sequence).await });
                }
                Err(_) => warn!("Auth event dropped: no async runtime"),
            }
        }))
    }

    fn next_event(&self) -> u64 {
        self.latest_event.fetch_add(1, Ordering::AcqRel) + 1
    }

    async fn apply_event(&self, event: AuthEvent, sequence: u64) {
        let user = match event {
            AuthEvent::SignedIn(session) | AuthEvent::TokenRefreshed(session) => {
                self.load_user_with_timeout(&session.user).await
            }
            AuthEvent::SignedOut => None,
        };

        let mut state = self.state.lock();
        if self.latest_event.load(Ordering::Acquire) != sequence {
            debug!(sequence, "Discarding superseded auth event");
            return;
        }
        if !self.guard.is_mounted() {
            debug!("Discarding auth result after teardown");
            return;
        }
        state.user = user;
        state.loading = false;
    }

    async fn load_user_with_timeout(&self, auth_user: &AuthUser) -> Option<User> {
        match tokio::time::timeout(self.settings.load_timeout, self.load_user(auth_user)).await {
            Ok(user) => Some(user),
            Err(_) => {
                warn!(
                    user_id = %auth_user.id,
                    timeout_ms = self.settings.load_timeout.as_millis() as u64,
                    "Profile load timed out, continuing signed out"
                );
                None
            }
        }
    }

    /// Load the profile with bounded retries, synthesizing one if it never
    /// appears.
    async fn load_user(&self, auth_user: &AuthUser) -> User {
        let attempts = self.settings.profile_retry_attempts;
        for attempt in 0..=attempts {
            if attempt > 0 {
                debug!(
                    user_id = %auth_user.id,
                    attempt,
                    delay_ms = self.settings.profile_retry_delay.as_millis() as u64,
                    "Profile not found yet, retrying"
                );
                tokio::time::sleep(self.settings.profile_retry_delay).await;
            }
            if let Some(profile) = self.fetch_profile(auth_user).await {
                info!(user_id = %auth_user.id, role = %profile.role, "User profile loaded");
                return User::from_profile(profile, auth_user.email.clone(), false);
            }
        }

        warn!(
            user_id = %auth_user.id,
            attempts = attempts.saturating_add(1),
            "Profile missing after retries, using synthesized profile"
        );
        let profile = UserProfile::synthesized(auth_user.id.clone(), &auth_user.email);
        User::from_profile(profile, auth_user.email.clone(), true)
    }

    async fn fetch_profile(&self, auth_user: &AuthUser) -> Option<UserProfile> {
        match self.data.select_one(Table::Profiles, auth_user.id.as_str()).await {
            Ok(Some(row)) => match serde_json::from_value(row) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(user_id = %auth_user.id, error = %e, "Undecodable profile row");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!(user_id = %auth_user.id, error = %e, "Failed to load profile");
                None
            }
        }
    }

    fn set_loading(&self, loading: bool) {
        if self.guard.is_mounted() {
            self.state.lock().loading = loading;
        }
    }

    /// Store the outcome of a load and clear loading, unless torn down.
    fn settle(&self, user: Option<User>) {
        if !self.guard.is_mounted() {
            debug!("Discarding auth result after teardown");
            return;
        }
        let mut state = self.state.lock();
        state.user = user;
        state.loading = false;
    }

    fn settle_keeping_user(&self) {
        self.set_loading(false);
    }
}

//! In-memory fakes for the hosted data/auth service and the notifier.
//!
//! - [`InMemoryDataService`]: JSON rows keyed by `"id"`, with injectable
//!   failures, a hanging mode and delayed profile creation.
//! - [`InMemoryAuthProvider`]: password accounts, a single current session
//!   and listener fan-out.
//! - [`RecordingNotifier`]: remembers every delivered message.

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use url::Url;

use crate::domain::id::UserId;
use crate::error::ServiceError;
use crate::port::outbound::auth::{
    AuthCallback, AuthEvent, AuthProvider, AuthUser, OAuthProvider, Session, SignUpAttributes,
    Subscription,
};
use crate::port::outbound::data::{DataService, Direction, Filter, Order, Table};
use crate::port::outbound::notifier::{Message, Notifier, Recipient};

// ---------------------------------------------------------------------------
// InMemoryDataService
// ---------------------------------------------------------------------------

#[derive(Default)]
struct DataState {
    tables: HashMap<Table, Vec<Value>>,
    failure: Option<ServiceError>,
    /// Profile lookups that still return nothing.
    hidden_profile_lookups: u32,
}

/// Row store backing the [`DataService`] port in tests.
#[derive(Clone, Default)]
pub struct InMemoryDataService {
    state: Arc<Mutex<DataState>>,
    hanging: Arc<AtomicBool>,
    select_one_calls: Arc<AtomicU32>,
}

impl InMemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows into `table`.
    pub fn with_rows(self, table: Table, rows: Vec<Value>) -> Self {
        self.state.lock().tables.entry(table).or_default().extend(rows);
        self
    }

    /// Every call fails with `error` until cleared with `None`.
    pub fn set_failure(&self, error: Option<ServiceError>) {
        self.state.lock().failure = error;
    }

    /// Every call awaits forever until cleared.
    pub fn set_hanging(&self, hanging: bool) {
        self.hanging.store(hanging, Ordering::SeqCst);
    }

    /// The next `lookups` profile reads return `None`, as if the row were
    /// still being created by a trigger.
    pub fn hide_profiles_for(&self, lookups: u32) {
        self.state.lock().hidden_profile_lookups = lookups;
    }

    pub fn select_one_calls(&self) -> u32 {
        self.select_one_calls.load(Ordering::SeqCst)
    }

    /// Current rows of `table`, in insertion order.
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.state.lock().tables.get(&table).cloned().unwrap_or_default()
    }

    async fn enter(&self) -> Result<(), ServiceError> {
        if self.hanging.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        match &self.state.lock().failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(_), None) => CmpOrdering::Greater,
        (None, Some(_)) => CmpOrdering::Less,
        _ => CmpOrdering::Equal,
    }
}

#[async_trait]
impl DataService for InMemoryDataService {
    async fn select_all(
        &self,
        table: Table,
        filter: &Filter,
        order: Option<&Order>,
    ) -> Result<Vec<Value>, ServiceError> {
        self.enter().await?;
        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|row| filter.matches(row))
            .collect();
        if let Some(order) = order {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(&order.column), b.get(&order.column));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        Ok(rows)
    }

    async fn select_one(&self, table: Table, id: &str) -> Result<Option<Value>, ServiceError> {
        self.select_one_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;

        let mut state = self.state.lock();
        if table == Table::Profiles && state.hidden_profile_lookups > 0 {
            state.hidden_profile_lookups -= 1;
            return Ok(None);
        }
        let row = state
            .tables
            .get(&table)
            .and_then(|rows| rows.iter().find(|row| row_id(row) == Some(id)))
            .cloned();
        Ok(row)
    }

    async fn insert(&self, table: Table, mut row: Value) -> Result<Option<Value>, ServiceError> {
        self.enter().await?;
        if row_id(&row).is_none() {
            if let Some(object) = row.as_object_mut() {
                object.insert("id".into(), Value::String(uuid::Uuid::new_v4().to_string()));
            }
        }
        self.state
            .lock()
            .tables
            .entry(table)
            .or_default()
            .push(row.clone());
        Ok(Some(row))
    }

    async fn update(
        &self,
        table: Table,
        id: &str,
        patch: Value,
    ) -> Result<Option<Value>, ServiceError> {
        self.enter().await?;
        let mut state = self.state.lock();
        let Some(row) = state
            .tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id)))
        else {
            return Ok(None);
        };

        if let (Some(target), Value::Object(fields)) = (row.as_object_mut(), patch) {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, table: Table, id: &str) -> Result<bool, ServiceError> {
        self.enter().await?;
        let mut state = self.state.lock();
        let Some(rows) = state.tables.get_mut(&table) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|row| row_id(row) != Some(id));
        Ok(rows.len() != before)
    }
}

// ---------------------------------------------------------------------------
// InMemoryAuthProvider
// ---------------------------------------------------------------------------

#[derive(Default)]
struct AuthState {
    accounts: HashMap<String, (String, AuthUser)>,
    session: Option<Session>,
    failure: Option<ServiceError>,
    oauth_requests: Vec<(OAuthProvider, Url)>,
}

type Listeners = Arc<Mutex<Vec<(u64, AuthCallback)>>>;

/// Password-account auth service with a single current session.
#[derive(Clone, Default)]
pub struct InMemoryAuthProvider {
    state: Arc<Mutex<AuthState>>,
    listeners: Listeners,
    next_listener: Arc<AtomicU64>,
    hanging_session: Arc<AtomicBool>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account without going through `sign_up`.
    pub fn with_account(self, id: &str, email: &str, password: &str) -> Self {
        let user = AuthUser {
            id: UserId::new(id),
            email: email.to_string(),
        };
        self.state
            .lock()
            .accounts
            .insert(email.to_string(), (password.to_string(), user));
        self
    }

    /// Start with `email` already signed in.
    pub fn with_session(self, email: &str) -> Self {
        let session = {
            let state = self.state.lock();
            state.accounts.get(email).map(|(_, user)| session_for(user))
        };
        self.state.lock().session = session;
        self
    }

    /// Every credential call fails with `error` until cleared.
    pub fn set_failure(&self, error: Option<ServiceError>) {
        self.state.lock().failure = error;
    }

    /// `get_session` never resolves while set.
    pub fn set_session_hanging(&self, hanging: bool) {
        self.hanging_session.store(hanging, Ordering::SeqCst);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn oauth_requests(&self) -> Vec<(OAuthProvider, Url)> {
        self.state.lock().oauth_requests.clone()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.state.lock().session.clone()
    }

    /// Push an event to every listener, as the service would.
    pub fn emit(&self, event: &AuthEvent) {
        let listeners: Vec<AuthCallback> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    fn check(&self) -> Result<(), ServiceError> {
        match &self.state.lock().failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn session_for(user: &AuthUser) -> Session {
    Session {
        user: user.clone(),
        access_token: format!("token-{}", user.id),
        expires_at: None,
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _attributes: &SignUpAttributes,
    ) -> Result<Option<AuthUser>, ServiceError> {
        self.check()?;
        let mut state = self.state.lock();
        if state.accounts.contains_key(email) {
            return Err(ServiceError::Rejected("user already registered".into()));
        }
        let user = AuthUser {
            id: UserId::new(uuid::Uuid::new_v4().to_string()),
            email: email.to_string(),
        };
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        Ok(Some(user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<AuthUser>, ServiceError> {
        self.check()?;
        let session = {
            let mut state = self.state.lock();
            let user = match state.accounts.get(email) {
                Some((stored, user)) if stored == password => user.clone(),
                _ => return Err(ServiceError::Rejected("invalid login credentials".into())),
            };
            let session = session_for(&user);
            state.session = Some(session.clone());
            session
        };
        let user = session.user.clone();
        self.emit(&AuthEvent::SignedIn(session));
        Ok(Some(user))
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &Url,
    ) -> Result<(), ServiceError> {
        self.check()?;
        self.state
            .lock()
            .oauth_requests
            .push((provider, redirect_to.clone()));
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, ServiceError> {
        if self.hanging_session.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        Ok(self.state.lock().session.clone())
    }

    fn on_auth_state_change(&self, callback: AuthCallback) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().push((id, callback));

        let listeners = Arc::clone(&self.listeners);
        Subscription::new(move || {
            listeners.lock().retain(|(listener, _)| *listener != id);
        })
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        self.check()?;
        self.state.lock().session = None;
        self.emit(&AuthEvent::SignedOut);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

/// Notifier that records deliveries and can reject chosen addresses.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(Recipient, Message)>>>,
    rejected: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries to `email` fail.
    pub fn reject(&self, email: &str) {
        self.rejected.lock().push(email.to_string());
    }

    pub fn sent(&self) -> Vec<(Recipient, Message)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipient: &Recipient, message: &Message) -> Result<(), ServiceError> {
        if self.rejected.lock().iter().any(|e| *e == recipient.email) {
            return Err(ServiceError::Rejected(format!("mailbox {} unavailable", recipient.email)));
        }
        self.sent.lock().push((recipient.clone(), message.clone()));
        Ok(())
    }
}

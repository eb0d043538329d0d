//! Session lifecycle through the public auth API.

use std::sync::Arc;
use std::time::Duration;

use propdesk::application::auth::{AuthManager, ADMIN_ROUTE, HOME_ROUTE};
use propdesk::application::storage::{SafeStorage, SessionStore, StorageOptions};
use propdesk::domain::user::Role;
use propdesk::domain::UserId;
use propdesk::error::StorageError;
use propdesk::infrastructure::config::settings::Config;
use propdesk::port::outbound::auth::{AuthEvent, AuthUser, Session, SessionPersistence};
use propdesk::port::outbound::data::Table;
use propdesk::testkit;
use propdesk::testkit::domain::profile;
use propdesk::testkit::service::{InMemoryAuthProvider, InMemoryDataService};
use propdesk::testkit::storage::{FailureMode, ScriptedBackend};

fn profiles(rows: &[(&str, &str, Role)]) -> InMemoryDataService {
    InMemoryDataService::new().with_rows(
        Table::Profiles,
        rows.iter()
            .map(|(id, name, role)| serde_json::to_value(profile(id, name, *role)).unwrap())
            .collect(),
    )
}

#[tokio::test(start_paused = true)]
async fn existing_session_is_restored_with_configured_policy() {
    let config = Config::parse_toml("[auth]\nload_timeout_ms = 3000").unwrap();
    let auth = InMemoryAuthProvider::new()
        .with_account("a1", "admin@luzion.pt", "pw")
        .with_session("admin@luzion.pt");
    let data = profiles(&[("a1", "Admin", Role::Admin)]);
    let manager = AuthManager::new(
        Arc::new(auth),
        Arc::new(data),
        config.auth.settings().unwrap(),
    );

    manager.check_session().await;

    let user = manager.current_user().unwrap();
    assert_eq!(user.name, "Admin");
    assert_eq!(manager.post_login_route(), ADMIN_ROUTE);
}

#[tokio::test(start_paused = true)]
async fn hanging_profile_load_respects_configured_timeout() {
    let config = Config::parse_toml("[auth]\nload_timeout_ms = 3000").unwrap();
    let auth = InMemoryAuthProvider::new().with_account("u1", "ana@luzion.pt", "pw");
    let data = InMemoryDataService::new();
    data.set_hanging(true);
    let manager = AuthManager::new(
        Arc::new(auth),
        Arc::new(data),
        config.auth.settings().unwrap(),
    );

    let started = tokio::time::Instant::now();
    assert!(!manager.login("ana@luzion.pt", "pw").await);

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(3000));
    assert!(elapsed < Duration::from_millis(10_000));
    assert_eq!(manager.current_user(), None);
    assert!(!manager.is_loading());
}

#[tokio::test(start_paused = true)]
async fn pushed_events_drive_the_signed_in_user() {
    let auth = InMemoryAuthProvider::new().with_account("u1", "rita@luzion.pt", "pw");
    let data = profiles(&[("u1", "Rita", Role::Agent)]);
    let manager = Arc::new(AuthManager::new(
        Arc::new(auth.clone()),
        Arc::new(data),
        testkit::config::auth_settings(),
    ));
    let _subscription = manager.subscribe();

    assert!(manager.login("rita@luzion.pt", "pw").await);
    assert_eq!(manager.current_user().unwrap().role, Role::Agent);
    assert_eq!(manager.post_login_route(), HOME_ROUTE);

    auth.emit(&AuthEvent::SignedOut);
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(manager.current_user(), None);
}

#[tokio::test(start_paused = true)]
async fn slow_sign_in_event_does_not_override_later_sign_out() {
    let auth = InMemoryAuthProvider::new();
    let data = profiles(&[("u1", "Ana", Role::User)]);
    data.hide_profiles_for(1);
    let manager = Arc::new(AuthManager::new(
        Arc::new(auth.clone()),
        Arc::new(data),
        testkit::config::auth_settings(),
    ));
    let _subscription = manager.subscribe();

    let session = Session {
        user: AuthUser {
            id: UserId::new("u1"),
            email: "ana@luzion.pt".into(),
        },
        access_token: "token".into(),
        expires_at: None,
    };
    auth.emit(&AuthEvent::SignedIn(session));
    auth.emit(&AuthEvent::SignedOut);
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(manager.current_user(), None);
    assert!(!manager.is_loading());
}

#[tokio::test(start_paused = true)]
async fn teardown_before_completion_discards_the_result() {
    let auth = InMemoryAuthProvider::new()
        .with_account("u1", "rui@luzion.pt", "pw")
        .with_session("rui@luzion.pt");
    let data = profiles(&[("u1", "Rui", Role::User)]);
    data.set_hanging(true);
    let manager = Arc::new(AuthManager::new(
        Arc::new(auth),
        Arc::new(data),
        testkit::config::auth_settings(),
    ));

    let pending = tokio::spawn({
        let manager = Arc::clone(&manager);
        async move { manager.check_session().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    manager.guard().unmount();
    pending.await.unwrap();

    assert_eq!(manager.current_user(), None);
    assert!(manager.is_loading());
}

#[test]
fn session_tokens_survive_a_sandboxed_store_for_the_process() {
    let disk = ScriptedBackend::failing(
        "disk",
        FailureMode::always(StorageError::SecurityDenied("private mode".into())),
    );
    let storage = Arc::new(SafeStorage::new(vec![Box::new(disk)], StorageOptions::default()));
    let sessions = SessionStore::new(Arc::clone(&storage), "auth.");

    sessions.set_item("token", "abc");
    assert_eq!(sessions.get_item("token").as_deref(), Some("abc"));
    assert!(storage.status().is_memory_key("auth.token"));

    sessions.remove_item("token");
    assert_eq!(sessions.get_item("token"), None);
}

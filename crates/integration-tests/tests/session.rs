//! Session lifecycle across process restarts and logout.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use glamora_client::AppState;
use glamora_client::config::DesignGenerator;
use glamora_client::onboarding::Route;
use glamora_client::storage::{AUTH_TOKEN_KEY, FileStore, KeyValueStore, MemoryStore};
use glamora_integration_tests::{FakeBackend, TEST_PASSWORD, VALID_TOKEN};
use secrecy::SecretString;

fn state(backend: &FakeBackend, credentials: Arc<dyn KeyValueStore>) -> AppState {
    AppState::new(
        &backend.client_config(DesignGenerator::Remote),
        credentials,
        Arc::new(MemoryStore::new()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_login_survives_restart() {
    let backend = FakeBackend::start().await;
    let dir = std::env::temp_dir().join(format!("glamora-session-{}", std::process::id()));
    let path = dir.join("credentials.json");

    let first = state(&backend, Arc::new(FileStore::new(&path)));
    let user = first
        .session()
        .login("jane@glamora.app", &SecretString::from(TEST_PASSWORD))
        .await
        .unwrap();
    assert!(first.session().is_authenticated());

    // A new process reading the same file
    let second = state(&backend, Arc::new(FileStore::new(&path)));
    assert!(!second.session().is_authenticated());
    let restored = second.session().restore().await.unwrap().unwrap();

    assert_eq!(restored.id, user.id);
    assert!(second.session().is_authenticated());

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn test_restore_with_revoked_token_is_guest() {
    let backend = FakeBackend::start().await;
    backend.revoke_token();
    let credentials: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    credentials.set(AUTH_TOKEN_KEY, VALID_TOKEN).await.unwrap();
    let app = state(&backend, Arc::clone(&credentials));

    assert!(app.session().restore().await.unwrap().is_none());

    assert!(app.session().user().is_none());
    assert_eq!(credentials.get(AUTH_TOKEN_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_logout_calls_backend_and_forgets_token() {
    let backend = FakeBackend::start().await;
    let credentials: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let app = state(&backend, Arc::clone(&credentials));

    app.session()
        .register("Jane", "jane@glamora.app", &SecretString::from("anything"))
        .await
        .unwrap();
    assert!(app.session().has_token());

    app.session().logout().await;

    assert_eq!(backend.hits("POST", "/api/auth/logout"), 1);
    assert!(!app.session().has_token());
    assert!(app.session().user().is_none());
    assert_eq!(credentials.get(AUTH_TOKEN_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_onboarding_gate_uses_local_store() {
    let backend = FakeBackend::start().await;
    let app = state(&backend, Arc::new(MemoryStore::new()));

    assert_eq!(app.initial_route().await, Route::Onboarding);
    glamora_client::onboarding::complete_onboarding(app.local().as_ref())
        .await
        .unwrap();
    assert_eq!(app.initial_route().await, Route::Login);
    assert!(backend.requests().is_empty());
}

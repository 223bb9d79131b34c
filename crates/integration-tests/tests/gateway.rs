//! Gateway behavior against the fake backend: bearer injection, token
//! persistence and 401 invalidation.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use glamora_client::api::{ApiClient, ApiError, ProductQuery};
use glamora_client::config::DesignGenerator;
use glamora_client::storage::{AUTH_TOKEN_KEY, KeyValueStore, MemoryStore};
use glamora_core::Email;
use glamora_integration_tests::{CountingStore, FakeBackend, TEST_PASSWORD, VALID_TOKEN};
use secrecy::{ExposeSecret, SecretString};

fn gateway(backend: &FakeBackend, credentials: Arc<dyn KeyValueStore>) -> ApiClient {
    let config = backend.client_config(DesignGenerator::Remote);
    ApiClient::new(&config.api, credentials).unwrap()
}

#[tokio::test]
async fn test_login_persists_token_and_later_requests_carry_it() {
    let backend = FakeBackend::start().await;
    let credentials: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let api = gateway(&backend, Arc::clone(&credentials));

    let email = Email::parse("jane@glamora.app").unwrap();
    let auth = api
        .login(&email, &SecretString::from(TEST_PASSWORD))
        .await
        .unwrap();

    assert_eq!(auth.user.email, email);
    assert_eq!(auth.token.unwrap().expose_secret(), VALID_TOKEN);
    assert_eq!(
        credentials.get(AUTH_TOKEN_KEY).await.unwrap().as_deref(),
        Some(VALID_TOKEN)
    );
    assert!(api.has_token());

    let me = api.me().await.unwrap();
    assert_eq!(me.name, "Jane");

    let requests = backend.requests();
    let login = requests.iter().find(|r| r.path == "/api/auth/login").unwrap();
    assert_eq!(login.authorization, None);
    let me = requests.iter().find(|r| r.path == "/api/auth/me").unwrap();
    assert_eq!(
        me.authorization.as_deref(),
        Some(format!("Bearer {VALID_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn test_unauthorized_deletes_token_once_and_still_errors() {
    let backend = FakeBackend::start().await;
    let credentials = Arc::new(CountingStore::new());
    credentials.set(AUTH_TOKEN_KEY, "tok-stale").await.unwrap();
    let api = gateway(&backend, credentials.clone());

    let result = api.get_cart().await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(credentials.deletes(), 1);
    assert_eq!(credentials.get(AUTH_TOKEN_KEY).await.unwrap(), None);
    assert!(!api.has_token());
}

#[tokio::test]
async fn test_unauthorized_from_any_endpoint_deletes_token_once() {
    let backend = FakeBackend::start().await;
    backend.revoke_token();

    for endpoint in ["me", "cart.add", "wishlist", "orders", "designs"] {
        let credentials = Arc::new(CountingStore::new());
        credentials.set(AUTH_TOKEN_KEY, VALID_TOKEN).await.unwrap();
        let api = gateway(&backend, credentials.clone());
        api.refresh_token_presence().await.unwrap();

        let result = match endpoint {
            "me" => api.me().await.map(drop),
            "cart.add" => api.add_to_cart(&"p1".into(), 1).await,
            "wishlist" => api.get_wishlist().await.map(drop),
            "orders" => api.list_orders(1).await.map(drop),
            _ => api.list_designs(1, 20).await.map(drop),
        };

        assert!(matches!(result, Err(ApiError::Unauthorized)), "{endpoint}");
        assert_eq!(credentials.deletes(), 1, "{endpoint}");
        assert_eq!(credentials.get(AUTH_TOKEN_KEY).await.unwrap(), None, "{endpoint}");
        assert!(!api.has_token(), "{endpoint}");
    }
}

#[tokio::test]
async fn test_rejected_login_stores_nothing() {
    let backend = FakeBackend::start().await;
    let credentials = Arc::new(CountingStore::new());
    let api = gateway(&backend, credentials.clone());

    let result = api
        .login(
            &Email::parse("jane@glamora.app").unwrap(),
            &SecretString::from("wrong"),
        )
        .await;

    assert!(result.unwrap_err().is_unauthorized());
    assert_eq!(credentials.sets(), 0);
    assert_eq!(credentials.get(AUTH_TOKEN_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_token_watchers_see_invalidation() {
    let backend = FakeBackend::start().await;
    let credentials: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    credentials.set(AUTH_TOKEN_KEY, VALID_TOKEN).await.unwrap();
    let api = gateway(&backend, credentials);

    api.get_cart().await.unwrap();
    let mut watcher = api.watch_token();
    assert!(*watcher.borrow_and_update());

    backend.revoke_token();
    assert!(api.get_cart().await.is_err());

    assert!(watcher.has_changed().unwrap());
    assert!(!*watcher.borrow_and_update());
}

#[tokio::test]
async fn test_product_filters_become_query_parameters() {
    let backend = FakeBackend::start().await;
    let api = gateway(&backend, Arc::new(MemoryStore::new()));

    let page = api
        .list_products(&ProductQuery {
            category: Some("rings".to_string()),
            ..ProductQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].id.as_str(), "p1");
    assert!(page.products[0].in_stock);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let backend = FakeBackend::start().await;
    let api = gateway(&backend, Arc::new(MemoryStore::new()));

    let result = api.get_product(&"p1".into()).await;

    // No such route on the fake backend
    assert!(matches!(
        result,
        Err(ApiError::Status { status: 404, .. })
    ));
}

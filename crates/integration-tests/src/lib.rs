//! Integration test harness for the Glamora client.
//!
//! [`FakeBackend`] serves a small in-process imitation of the Glamora REST API
//! on an ephemeral port. Tests point a real [`AppState`](glamora_client::AppState)
//! at it and inspect the requests it recorded.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p glamora-integration-tests
//! ```
//!
//! # Behavior
//!
//! - Every response is wrapped as `{ "data": ... }`
//! - Protected routes answer 401 unless the bearer token is [`VALID_TOKEN`]
//!   and has not been revoked with [`FakeBackend::revoke_token`]
//! - Login succeeds only with [`TEST_PASSWORD`]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use glamora_client::config::{ClientConfig, DesignGenerator};
use glamora_client::storage::{KeyValueStore, MemoryStore, StorageError};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// The only token the fake backend accepts.
pub const VALID_TOKEN: &str = "tok-valid";
/// The only password the fake backend accepts.
pub const TEST_PASSWORD: &str = "correct horse";
/// ID of the design returned by `POST /designs/generate`.
pub const REMOTE_DESIGN_ID: &str = "d-remote-1";

/// One request as seen by the fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
struct BackendState {
    requests: Mutex<Vec<RecordedRequest>>,
    orders: Mutex<Vec<Value>>,
    token_revoked: AtomicBool,
    fail_orders: AtomicBool,
}

type Shared = Arc<BackendState>;
type ApiResult = Result<Json<Value>, StatusCode>;

/// Running fake backend. The server stops when this is dropped.
pub struct FakeBackend {
    base_url: String,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeBackend {
    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = router(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake backend stopped");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
            server,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Client configuration pointed at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected.
    #[must_use]
    pub fn client_config(&self, generator: DesignGenerator) -> ClientConfig {
        let mut config = ClientConfig::from_source(|key| {
            (key == "GLAMORA_API_BASE_URL").then(|| self.base_url.clone())
        })
        .expect("Fake backend URL rejected");
        config.generator = generator;
        config
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Number of requests with this method and path.
    #[must_use]
    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.state
            .requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Bodies of every accepted order submission.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        self.state.orders.lock().clone()
    }

    /// Make every protected route answer 401 from now on.
    pub fn revoke_token(&self) {
        self.state.token_revoked.store(true, Ordering::SeqCst);
    }

    /// Make `POST /orders` answer 500.
    pub fn fail_orders(&self, fail: bool) {
        self.state.fail_orders.store(fail, Ordering::SeqCst);
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Credential store that counts writes and deletes.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryStore,
    sets: Mutex<usize>,
    deletes: Mutex<usize>,
}

impl CountingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sets(&self) -> usize {
        *self.sets.lock()
    }

    #[must_use]
    pub fn deletes(&self) -> usize {
        *self.deletes.lock()
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        *self.sets.lock() += 1;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        *self.deletes.lock() += 1;
        self.inner.delete(key).await
    }
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(ok))
        .route("/auth/me", get(me))
        .route("/products", get(products))
        .route("/cart", get(empty_items))
        .route("/cart/add", post(protected_ok))
        .route("/cart/{id}", put(protected_ok_with_id).delete(protected_ok_with_id))
        .route("/wishlist", get(empty_items))
        .route("/wishlist/add", post(protected_ok))
        .route("/wishlist/{id}", delete(protected_ok_with_id))
        .route("/orders", post(create_order).get(list_orders))
        .route("/designs", get(list_designs))
        .route("/designs/generate", post(generate_design));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    state.requests.lock().push(RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
    next.run(request).await
}

fn authorize(state: &BackendState, headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {VALID_TOKEN}");
    let presented = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if presented == Some(expected.as_str()) && !state.token_revoked.load(Ordering::SeqCst) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn data(payload: Value) -> Json<Value> {
    Json(json!({ "data": payload }))
}

fn user(email: &str, name: &str) -> Value {
    json!({ "id": "u1", "email": email, "name": name, "role": "USER" })
}

async fn login(Json(body): Json<Value>) -> ApiResult {
    if body["password"] != TEST_PASSWORD {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let email = body["email"].as_str().unwrap_or_default();
    Ok(data(json!({ "user": user(email, "Jane"), "token": VALID_TOKEN })))
}

async fn register(Json(body): Json<Value>) -> ApiResult {
    let email = body["email"].as_str().unwrap_or_default();
    let name = body["name"].as_str().unwrap_or_default();
    Ok(data(json!({ "user": user(email, name), "token": VALID_TOKEN })))
}

async fn ok() -> Json<Value> {
    data(json!({}))
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> ApiResult {
    authorize(&state, &headers)?;
    Ok(data(json!({ "user": user("jane@glamora.app", "Jane") })))
}

async fn protected_ok(State(state): State<Shared>, headers: HeaderMap) -> ApiResult {
    authorize(&state, &headers)?;
    Ok(data(json!({})))
}

async fn protected_ok_with_id(
    State(state): State<Shared>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    authorize(&state, &headers)?;
    Ok(data(json!({})))
}

async fn empty_items(State(state): State<Shared>, headers: HeaderMap) -> ApiResult {
    authorize(&state, &headers)?;
    Ok(data(json!({ "items": [] })))
}

async fn products(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let catalog = [
        json!({ "id": "p1", "name": "Solitaire Ring", "price": 100.0,
                "category": "rings", "inStock": true }),
        json!({ "id": "p2", "name": "Pearl Necklace", "price": 249.5,
                "category": "necklaces", "inStock": false }),
    ];
    let products: Vec<Value> = catalog
        .into_iter()
        .filter(|p| query.get("category").is_none_or(|c| p["category"] == c.as_str()))
        .collect();
    data(json!({ "products": products }))
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Response> {
    authorize(&state, &headers).map_err(IntoResponse::into_response)?;
    if state.fail_orders.load(Ordering::SeqCst) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "order service unavailable").into_response());
    }

    let lines = body["items"].as_array().cloned().unwrap_or_default();
    let total: f64 = lines
        .iter()
        .map(|l| l["price"].as_f64().unwrap_or_default() * l["quantity"].as_f64().unwrap_or_default())
        .sum();
    let items: Vec<Value> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| {
            json!({ "id": format!("oi-{i}"), "productId": l["productId"],
                    "quantity": l["quantity"], "price": l["price"] })
        })
        .collect();

    let order = json!({
        "id": "o1",
        "orderNumber": "GLM-1001",
        "status": "pending",
        "items": items,
        "total": total,
        "shippingAddress": body["shippingAddress"],
    });
    state.orders.lock().push(body);
    Ok(data(json!({ "order": order })))
}

async fn list_orders(State(state): State<Shared>, headers: HeaderMap) -> ApiResult {
    authorize(&state, &headers)?;
    Ok(data(json!({ "orders": [] })))
}

fn design(kind: &Value, style: &Value, description: &Value) -> Value {
    json!({
        "id": REMOTE_DESIGN_ID,
        "type": kind,
        "style": style,
        "description": description,
        "imageUrl": format!("https://cdn.glamora.app/designs/{REMOTE_DESIGN_ID}.png"),
        "createdAt": "2026-01-01T00:00:00Z",
        "isFavorite": false,
    })
}

async fn generate_design(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    authorize(&state, &headers)?;
    Ok(data(json!({
        "design": design(&body["type"], &body["style"], &body["description"]),
    })))
}

async fn list_designs(State(state): State<Shared>, headers: HeaderMap) -> ApiResult {
    authorize(&state, &headers)?;
    Ok(data(json!({
        "designs": [design(&json!("ring"), &json!("art deco"), &Value::Null)],
    })))
}

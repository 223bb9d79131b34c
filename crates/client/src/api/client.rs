//! `reqwest`-backed API client.

use std::sync::Arc;

use glamora_core::{CartItemId, Email, NotificationId, PostId, ProductId, WishlistItemId};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::models::Design;
use crate::storage::{AUTH_TOKEN_KEY, KeyValueStore, StorageError};

use super::ApiError;
use super::types::{
    AddToCartBody, AuthPayload, DesignPage, Envelope, Feed, GenerateDesignRequest,
    GeneratedDesign, MeResponse, NewPost, NotificationPage, Order, OrderPage, OrderRequest,
    OrderResponse, Post, PostResponse, Product, ProductPage, ProductQuery, ProductRef,
    ProductResponse, QuantityBody, RawAuthPayload, RemoteCart, RemoteWishlist, User,
};

/// Longest slice of an error body kept in logs and errors.
const MAX_ERROR_BODY: usize = 200;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Glamora REST API.
///
/// Cheap to clone; clones share the connection pool and credential store.
///
/// The client also tracks whether a token is currently stored. The flag
/// follows every read, write and delete the client performs, so a 401 from
/// any endpoint is visible to whoever watches it (see [`ApiClient::watch_token`]).
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn KeyValueStore>,
    token_present: watch::Sender<bool>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, credentials: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let (token_present, _) = watch::channel(false);

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                credentials,
                token_present,
            }),
        })
    }

    /// Whether a token was present at the last credential store access.
    #[must_use]
    pub fn has_token(&self) -> bool {
        *self.inner.token_present.borrow()
    }

    /// Subscribe to token presence changes.
    #[must_use]
    pub fn watch_token(&self) -> watch::Receiver<bool> {
        self.inner.token_present.subscribe()
    }

    /// Re-read the credential store and update the presence flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be read.
    pub async fn refresh_token_presence(&self) -> Result<bool, StorageError> {
        let present = self.inner.credentials.get(AUTH_TOKEN_KEY).await?.is_some();
        self.set_token_present(present);
        Ok(present)
    }

    /// Delete the stored token without contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be written.
    pub async fn clear_token(&self) -> Result<(), StorageError> {
        self.inner.credentials.delete(AUTH_TOKEN_KEY).await?;
        self.set_token_present(false);
        Ok(())
    }

    fn set_token_present(&self, present: bool) {
        self.inner.token_present.send_if_modified(|current| {
            let changed = *current != present;
            *current = present;
            changed
        });
    }

    /// The credential store the bearer token is read from.
    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.credentials
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.request(method, self.url(path, &[])?))
    }

    fn request_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.request(method, self.url(path, query)?))
    }

    /// Attach the stored bearer token, if any.
    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.inner.credentials.get(AUTH_TOKEN_KEY).await?;
        self.set_token_present(token.is_some());
        Ok(match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    /// Delete the stored token after a 401.
    async fn invalidate_token(&self) {
        if let Err(e) = self.clear_token().await {
            warn!(error = %e, "Failed to delete auth token after 401");
            self.set_token_present(false);
        } else {
            debug!("Auth token cleared after 401");
        }
    }

    /// Send a request and return the raw body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = self
            .authorize(request)
            .await?
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_token().await;
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.map_err(ApiError::from_transport)?;

        if !status.is_success() {
            let message = body.chars().take(MAX_ERROR_BODY).collect::<String>();
            tracing::error!(
                status = %status,
                body = %message,
                "Glamora API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// Send a request and unwrap the `{ "data": ... }` envelope.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(MAX_ERROR_BODY).collect::<String>(),
                "Failed to parse Glamora API response"
            );
            ApiError::Parse(e)
        })?;
        Ok(envelope.data)
    }

    /// Send a request whose response body is irrelevant.
    async fn execute_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.request(Method::POST, path)?.json(body))
            .await
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in with email and password and persist the returned token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token cannot be stored.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<AuthPayload, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let raw: RawAuthPayload = self.post_json("auth/login", &body).await?;
        self.persist_auth(raw).await
    }

    /// Create an account and persist the returned token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token cannot be stored.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthPayload, ApiError> {
        let body = serde_json::json!({
            "name": name,
            "email": email,
            "password": password.expose_secret(),
        });
        let raw: RawAuthPayload = self.post_json("auth/register", &body).await?;
        self.persist_auth(raw).await
    }

    async fn persist_auth(&self, raw: RawAuthPayload) -> Result<AuthPayload, ApiError> {
        if let Some(token) = &raw.token {
            self.inner.credentials.set(AUTH_TOKEN_KEY, token).await?;
            self.set_token_present(true);
            debug!("Auth token stored");
        }
        Ok(AuthPayload {
            user: raw.user,
            token: raw.token.map(SecretString::from),
        })
    }

    /// End the session on the backend, then delete the stored token.
    ///
    /// The token is only deleted when the backend call succeeds; callers that
    /// must always sign out delete it themselves (see `SessionStore::logout`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token cannot be deleted.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.execute_unit(self.request(Method::POST, "auth/logout")?)
            .await?;
        self.clear_token().await?;
        Ok(())
    }

    /// Fetch the account behind the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User, ApiError> {
        let response: MeResponse = self.execute(self.request(Method::GET, "auth/me")?).await?;
        Ok(response.user)
    }

    // =========================================================================
    // Design Methods
    // =========================================================================

    /// Ask the backend to generate a design.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(kind = %request.kind, style = %request.style))]
    pub async fn generate_design(&self, request: &GenerateDesignRequest) -> Result<Design, ApiError> {
        let response: GeneratedDesign = self.post_json("designs/generate", request).await?;
        Ok(response.design)
    }

    /// List the account's saved designs.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_designs(&self, page: u32, limit: u32) -> Result<DesignPage, ApiError> {
        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        self.execute(self.request_with_query(Method::GET, "designs", &query)?)
            .await
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List catalog products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        self.execute(self.request_with_query(Method::GET, "products", &query.pairs())?)
            .await
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let response: ProductResponse = self
            .execute(self.request(Method::GET, &format!("products/{id}"))?)
            .await?;
        Ok(response.product)
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Fetch the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<RemoteCart, ApiError> {
        self.execute(self.request(Method::GET, "cart")?).await
    }

    /// Add units of a product to the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        let body = AddToCartBody {
            product_id,
            quantity,
        };
        self.execute_unit(self.request(Method::POST, "cart/add")?.json(&body))
            .await
    }

    /// Overwrite a cart line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_cart_item(&self, item_id: &CartItemId, quantity: u32) -> Result<(), ApiError> {
        let body = QuantityBody { quantity };
        self.execute_unit(
            self.request(Method::PUT, &format!("cart/{item_id}"))?
                .json(&body),
        )
        .await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_from_cart(&self, item_id: &CartItemId) -> Result<(), ApiError> {
        self.execute_unit(self.request(Method::DELETE, &format!("cart/{item_id}"))?)
            .await
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(lines = request.items.len()))]
    pub async fn create_order(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        let response: OrderResponse = self.post_json("orders", request).await?;
        Ok(response.order)
    }

    /// List the account's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, page: u32) -> Result<OrderPage, ApiError> {
        let query = [("page", page.to_string())];
        self.execute(self.request_with_query(Method::GET, "orders", &query)?)
            .await
    }

    // =========================================================================
    // Wishlist Methods
    // =========================================================================

    /// Fetch the server-side wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_wishlist(&self) -> Result<RemoteWishlist, ApiError> {
        self.execute(self.request(Method::GET, "wishlist")?).await
    }

    /// Save a product to the server-side wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let body = ProductRef { product_id };
        self.execute_unit(self.request(Method::POST, "wishlist/add")?.json(&body))
            .await
    }

    /// Remove a wishlist entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_from_wishlist(&self, item_id: &WishlistItemId) -> Result<(), ApiError> {
        self.execute_unit(self.request(Method::DELETE, &format!("wishlist/{item_id}"))?)
            .await
    }

    // =========================================================================
    // Notification Methods
    // =========================================================================

    /// List server-side notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_notifications(&self, page: u32) -> Result<NotificationPage, ApiError> {
        let query = [("page", page.to_string())];
        self.execute(self.request_with_query(Method::GET, "notifications", &query)?)
            .await
    }

    /// Mark a notification read on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(notification_id = %id))]
    pub async fn mark_notification_read(&self, id: &NotificationId) -> Result<(), ApiError> {
        self.execute_unit(self.request(Method::PUT, &format!("notifications/{id}/read"))?)
            .await
    }

    // =========================================================================
    // Social Methods
    // =========================================================================

    /// Fetch a page of the social feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn social_feed(&self, page: u32) -> Result<Feed, ApiError> {
        let query = [("page", page.to_string())];
        self.execute(self.request_with_query(Method::GET, "social/feed", &query)?)
            .await
    }

    /// Publish a post.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, content, image_urls), fields(images = image_urls.len()))]
    pub async fn create_post(&self, content: &str, image_urls: &[String]) -> Result<Post, ApiError> {
        let body = NewPost {
            content,
            image_urls,
        };
        let response: PostResponse = self.post_json("social/posts", &body).await?;
        Ok(response.post)
    }

    /// Like a post.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(post_id = %post_id))]
    pub async fn like_post(&self, post_id: &PostId) -> Result<(), ApiError> {
        self.execute_unit(self.request(Method::POST, &format!("social/posts/{post_id}/like"))?)
            .await
    }

    /// Remove a like from a post.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(post_id = %post_id))]
    pub async fn unlike_post(&self, post_id: &PostId) -> Result<(), ApiError> {
        self.execute_unit(self.request(Method::DELETE, &format!("social/posts/{post_id}/like"))?)
            .await
    }
}

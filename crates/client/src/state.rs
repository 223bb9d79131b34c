//! Application state shared by every front end.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::onboarding::{self, Route};
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::stores::{CartStore, DesignStore, NotificationStore, WishlistStore};
use crate::sync::SyncCoordinator;

/// Application state: the gateway, the sync coordinator and every store.
///
/// This struct is cheaply cloneable via `Arc`. All stores share one gateway
/// and one sync coordinator.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    api: ApiClient,
    sync: SyncCoordinator,
    local: Arc<dyn KeyValueStore>,
    session: SessionStore,
    cart: CartStore,
    wishlist: WishlistStore,
    designs: DesignStore,
    notifications: NotificationStore,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("api", &self.inner.api)
            .field("sync", &self.inner.sync.stats())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create the application state.
    ///
    /// * `credentials` - secure store holding the bearer token
    /// * `local` - plain store for app flags (onboarding)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn KeyValueStore>,
        local: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        Self::with_clock(config, credentials, local, Arc::new(SystemClock))
    }

    /// Like [`AppState::new`] with an explicit time source.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_clock(
        config: &ClientConfig,
        credentials: Arc<dyn KeyValueStore>,
        local: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api, credentials)?;
        let sync = SyncCoordinator::new();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                session: SessionStore::new(api.clone()),
                cart: CartStore::new(api.clone(), sync.clone(), Arc::clone(&clock)),
                wishlist: WishlistStore::new(api.clone(), sync.clone(), Arc::clone(&clock)),
                designs: DesignStore::new(api.clone(), config.generator, Arc::clone(&clock)),
                notifications: NotificationStore::new(clock),
                api,
                sync,
                local,
            }),
        })
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn sync(&self) -> &SyncCoordinator {
        &self.inner.sync
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }

    #[must_use]
    pub fn designs(&self) -> &DesignStore {
        &self.inner.designs
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationStore {
        &self.inner.notifications
    }

    /// Plain local store (onboarding flag).
    #[must_use]
    pub fn local(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.local
    }

    /// Start route for this launch.
    pub async fn initial_route(&self) -> Route {
        onboarding::initial_route(self.inner.local.as_ref()).await
    }

    /// Wait for in-flight syncs before exit.
    pub async fn shutdown(&self) {
        let in_flight = self.inner.sync.in_flight();
        if in_flight > 0 {
            tracing::info!(in_flight, "Waiting for remote syncs");
        }
        self.inner.sync.flush().await;
    }
}

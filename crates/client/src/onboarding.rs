//! First-run gate.

use tracing::warn;

use crate::storage::{KeyValueStore, StorageError};

/// Local storage key set once onboarding has been completed.
pub const ONBOARDING_COMPLETE_KEY: &str = "@glamora_onboarding_complete";

/// Where the app starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Onboarding,
    Login,
}

/// Pick the start route from the onboarding flag.
///
/// A storage error is logged and treated as a first run.
pub async fn initial_route(store: &dyn KeyValueStore) -> Route {
    match store.get(ONBOARDING_COMPLETE_KEY).await {
        Ok(Some(_)) => Route::Login,
        Ok(None) => Route::Onboarding,
        Err(e) => {
            warn!(error = %e, "Failed to read onboarding flag");
            Route::Onboarding
        }
    }
}

/// Record that onboarding is done.
///
/// # Errors
///
/// Returns an error if the flag cannot be written.
pub async fn complete_onboarding(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.set(ONBOARDING_COMPLETE_KEY, "true").await
}

//! In-memory collection stores.
//!
//! Each store owns one collection behind a `parking_lot::RwLock`. Mutations
//! apply locally and return immediately; the matching remote call (if any) is
//! handed to the [`SyncCoordinator`](crate::sync::SyncCoordinator). Locks are
//! never held across an `.await`.

mod cart;
mod design;
mod notification;
mod wishlist;

pub use cart::CartStore;
pub use design::{DesignError, DesignStore, PLACEHOLDER_DESIGN_IMAGE};
pub use notification::NotificationStore;
pub use wishlist::WishlistStore;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};

    use crate::api::ApiClient;
    use crate::clock::{Clock, SteppingClock};
    use crate::config::ApiConfig;
    use crate::storage::MemoryStore;

    /// Gateway pointed at a port nothing listens on.
    pub fn unreachable_api() -> ApiClient {
        let config = ApiConfig::with_base_url("http://127.0.0.1:9/api").unwrap();
        ApiClient::new(&config, Arc::new(MemoryStore::new())).unwrap()
    }

    /// Clock that yields distinct millisecond timestamps.
    pub fn stepping_clock() -> Arc<dyn Clock> {
        let start = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        Arc::new(SteppingClock::new(start, Duration::milliseconds(1)))
    }
}

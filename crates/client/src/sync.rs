//! Best-effort background sync for optimistic store updates.
//!
//! Stores apply a mutation locally, then hand the matching remote call to the
//! [`SyncCoordinator`]. The call runs as a detached task: the caller never
//! waits for it, a failure is logged and counted, and local state is never
//! rolled back. Nothing cancels an in-flight sync, so a later local change can
//! race an earlier remote call.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info_span, warn};

use crate::api::ApiError;

/// Snapshot of sync outcomes since the coordinator was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Syncs handed to the runtime.
    pub dispatched: u64,
    /// Syncs whose remote call succeeded.
    pub succeeded: u64,
    /// Syncs whose remote call failed.
    pub failed: u64,
    /// Syncs dropped because no runtime was available.
    pub skipped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    dispatched: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

/// Spawns and tracks fire-and-forget remote syncs.
///
/// Cheap to clone; clones share the task tracker and counters.
#[derive(Debug, Clone, Default)]
pub struct SyncCoordinator {
    tracker: TaskTracker,
    counters: Arc<Counters>,
}

impl SyncCoordinator {
    /// Create a coordinator with no syncs in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `call` in the background.
    ///
    /// `operation` names the sync in logs (e.g., `"cart.add"`). Must be
    /// called from within a tokio runtime; otherwise the sync is skipped and
    /// logged.
    pub fn dispatch<F>(&self, operation: &'static str, call: F)
    where
        F: Future<Output = Result<(), ApiError>> + Send + 'static,
    {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            self.counters.skipped.fetch_add(1, Ordering::Relaxed);
            warn!(operation, "No async runtime available, remote sync skipped");
            return;
        };

        self.counters.dispatched.fetch_add(1, Ordering::Relaxed);
        let counters = Arc::clone(&self.counters);
        let span = info_span!("remote_sync", operation);

        self.tracker.spawn_on(
            async move {
                match call.await {
                    Ok(()) => {
                        counters.succeeded.fetch_add(1, Ordering::Relaxed);
                        debug!("Remote sync completed");
                    }
                    Err(e) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        warn!(error = %e, "Remote sync failed, keeping local state");
                    }
                }
            }
            .instrument(span),
            &handle,
        );
    }

    /// Wait until every sync dispatched so far has settled.
    ///
    /// New syncs may be dispatched while waiting; they are waited for too.
    pub async fn flush(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Number of syncs still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Outcome counters.
    #[must_use]
    pub fn stats(&self) -> SyncStats {
        SyncStats {
            dispatched: self.counters.dispatched.load(Ordering::Relaxed),
            succeeded: self.counters.succeeded.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
        }
    }
}

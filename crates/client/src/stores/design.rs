//! AI design generation and the user's design gallery.
//!
//! `generate` is the one store operation the caller awaits end to end. The
//! busy flag is a counter of generations in flight, released by a drop guard,
//! so it returns to idle on success, on error and when the future is dropped
//! mid-generation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use glamora_core::{DesignId, DesignType};
use moka::future::Cache;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::analytics;
use crate::api::{ApiClient, ApiError, DesignPage, GenerateDesignRequest};
use crate::clock::Clock;
use crate::config::DesignGenerator;
use crate::models::Design;
use crate::validation::{self, InputError};

/// Image attached to simulated designs.
pub const PLACEHOLDER_DESIGN_IMAGE: &str =
    "https://images.unsplash.com/photo-1515562141207-7a88fb7ce338?w=800";

/// How long a fetched design listing stays cached.
const LISTING_TTL: Duration = Duration::from_secs(300);

/// Errors from design generation.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
}

/// Generated designs, newest first.
#[derive(Debug)]
pub struct DesignStore {
    state: RwLock<DesignState>,
    generating: AtomicUsize,
    generator: DesignGenerator,
    api: ApiClient,
    clock: Arc<dyn Clock>,
    listings: Cache<(u32, u32), DesignPage>,
}

#[derive(Debug, Default)]
struct DesignState {
    designs: Vec<Design>,
    current: Option<DesignId>,
}

/// Releases one unit of the busy counter when dropped.
struct GeneratingGuard<'a>(&'a AtomicUsize);

impl<'a> GeneratingGuard<'a> {
    fn acquire(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl DesignStore {
    #[must_use]
    pub fn new(api: ApiClient, generator: DesignGenerator, clock: Arc<dyn Clock>) -> Self {
        let listings = Cache::builder()
            .max_capacity(64)
            .time_to_live(LISTING_TTL)
            .build();

        Self {
            state: RwLock::new(DesignState::default()),
            generating: AtomicUsize::new(0),
            generator,
            api,
            clock,
            listings,
        }
    }

    /// Generate a design and put it at the head of the gallery.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidInput`] before any work starts if the
    /// style or description is rejected, or [`DesignError::Api`] if the remote
    /// generator fails. The gallery is unchanged on error.
    #[instrument(skip(self, description), fields(generator = ?self.generator))]
    pub async fn generate(
        &self,
        kind: DesignType,
        style: &str,
        description: Option<&str>,
    ) -> Result<Design, DesignError> {
        validation::validate_required("style", style)?;
        if let Some(description) = description {
            validation::validate_input("description", description)?;
        }

        let _busy = GeneratingGuard::acquire(&self.generating);
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let design = match self.generator {
            DesignGenerator::Simulated { delay } => {
                tokio::time::sleep(delay).await;
                let now = self.clock.now();
                Design {
                    id: DesignId::from_timestamp(now),
                    kind,
                    style: style.to_string(),
                    description,
                    image_url: PLACEHOLDER_DESIGN_IMAGE.to_string(),
                    created_at: now,
                    is_favorite: false,
                }
            }
            DesignGenerator::Remote => {
                self.api
                    .generate_design(&GenerateDesignRequest {
                        kind,
                        style: style.to_string(),
                        description,
                    })
                    .await?
            }
        };

        self.state.write().designs.insert(0, design.clone());
        self.listings.invalidate_all();
        info!(design_id = %design.id, "Design generated");
        analytics::track_design_created(&design.id, design.kind, &design.style);
        Ok(design)
    }

    /// Whether a generation is in flight.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst) > 0
    }

    /// Remove a design locally and drop cached listings.
    ///
    /// Nothing is deleted on the backend.
    pub fn remove(&self, design_id: &DesignId) {
        {
            let mut state = self.state.write();
            state.designs.retain(|d| &d.id != design_id);
            if state.current.as_ref() == Some(design_id) {
                state.current = None;
            }
        }
        self.listings.invalidate_all();
        debug!(design_id = %design_id, "Design removed");
    }

    /// Flip the favorite flag. Unknown IDs are ignored.
    pub fn toggle_favorite(&self, design_id: &DesignId) {
        if let Some(design) = self
            .state
            .write()
            .designs
            .iter_mut()
            .find(|d| &d.id == design_id)
        {
            design.is_favorite = !design.is_favorite;
        }
    }

    /// Select a design. Unknown IDs clear the selection.
    pub fn set_current(&self, design_id: Option<&DesignId>) {
        let mut state = self.state.write();
        let selected = design_id
            .filter(|id| state.designs.iter().any(|d| &d.id == *id))
            .cloned();
        state.current = selected;
    }

    /// The selected design, if it is still in the gallery.
    #[must_use]
    pub fn current(&self) -> Option<Design> {
        let state = self.state.read();
        let id = state.current.as_ref()?;
        state.designs.iter().find(|d| &d.id == id).cloned()
    }

    #[must_use]
    pub fn designs(&self) -> Vec<Design> {
        self.state.read().designs.clone()
    }

    /// Fetch a page of the user's designs from the backend.
    ///
    /// Results are cached for five minutes per `(page, limit)`.
    ///
    /// # Errors
    ///
    /// Returns the gateway error on a cache miss that fails.
    #[instrument(skip(self))]
    pub async fn fetch_remote(&self, page: u32, limit: u32) -> Result<DesignPage, ApiError> {
        let key = (page, limit);
        if let Some(cached) = self.listings.get(&key).await {
            debug!("Cache hit for design listing");
            return Ok(cached);
        }

        let listing = self.api.list_designs(page, limit).await?;
        self.listings.insert(key, listing.clone()).await;
        Ok(listing)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::stores::test_support::{stepping_clock, unreachable_api};

    fn simulated() -> DesignStore {
        DesignStore::new(
            unreachable_api(),
            DesignGenerator::Simulated {
                delay: Duration::from_millis(10),
            },
            stepping_clock(),
        )
    }

    #[tokio::test]
    async fn test_simulated_generation_prepends() {
        let store = simulated();

        let first = store.generate(DesignType::Ring, "minimalist", None).await.unwrap();
        let second = store
            .generate(DesignType::Necklace, "art deco", Some("emerald drop"))
            .await
            .unwrap();

        let designs = store.designs();
        assert_eq!(designs.len(), 2);
        assert_eq!(designs[0].id, second.id);
        assert_eq!(designs[1].id, first.id);
        assert_eq!(second.description.as_deref(), Some("emerald drop"));
        assert_eq!(second.image_url, PLACEHOLDER_DESIGN_IMAGE);
        assert!(!store.is_generating());
    }

    #[tokio::test]
    async fn test_busy_flag_while_generating() {
        let store = Arc::new(DesignStore::new(
            unreachable_api(),
            DesignGenerator::Simulated {
                delay: Duration::from_millis(200),
            },
            stepping_clock(),
        ));

        let task = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.generate(DesignType::Bracelet, "boho", None).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.is_generating());

        task.await.unwrap().unwrap();
        assert!(!store.is_generating());
    }

    #[tokio::test]
    async fn test_remote_failure_clears_busy_flag() {
        let store = DesignStore::new(unreachable_api(), DesignGenerator::Remote, stepping_clock());

        let result = store.generate(DesignType::Earrings, "vintage", None).await;

        assert!(matches!(result, Err(DesignError::Api(_))));
        assert!(!store.is_generating());
        assert!(store.designs().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_generation_clears_busy_flag() {
        let store = DesignStore::new(
            unreachable_api(),
            DesignGenerator::Simulated {
                delay: Duration::from_secs(60),
            },
            stepping_clock(),
        );

        let result = tokio::time::timeout(
            Duration::from_millis(20),
            store.generate(DesignType::Ring, "gothic", None),
        )
        .await;

        assert!(result.is_err());
        assert!(!store.is_generating());
    }

    #[tokio::test]
    async fn test_rejected_input_never_sets_busy() {
        let store = simulated();

        let result = store
            .generate(DesignType::Ring, "classic", Some("<script>x</script>"))
            .await;
        assert!(matches!(result, Err(DesignError::InvalidInput(_))));

        let result = store.generate(DesignType::Ring, "  ", None).await;
        assert!(matches!(result, Err(DesignError::InvalidInput(_))));
        assert!(!store.is_generating());
    }

    #[tokio::test]
    async fn test_toggle_and_remove_keep_order() {
        let store = simulated();
        let a = store.generate(DesignType::Ring, "a", None).await.unwrap();
        let b = store.generate(DesignType::Ring, "b", None).await.unwrap();
        let c = store.generate(DesignType::Ring, "c", None).await.unwrap();

        store.toggle_favorite(&b.id);
        store.toggle_favorite(&DesignId::new("missing"));
        let ids: Vec<_> = store.designs().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![c.id.clone(), b.id.clone(), a.id.clone()]);
        assert!(store.designs()[1].is_favorite);

        store.toggle_favorite(&b.id);
        assert!(!store.designs()[1].is_favorite);

        store.remove(&b.id);
        let ids: Vec<_> = store.designs().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![c.id, a.id]);
    }

    #[tokio::test]
    async fn test_current_selection() {
        let store = simulated();
        let design = store.generate(DesignType::Ring, "modern", None).await.unwrap();

        store.set_current(Some(&DesignId::new("missing")));
        assert!(store.current().is_none());

        store.set_current(Some(&design.id));
        assert_eq!(store.current().map(|d| d.id), Some(design.id.clone()));

        store.remove(&design.id);
        assert!(store.current().is_none());
    }
}

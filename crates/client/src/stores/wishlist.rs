//! Saved products.

use std::sync::Arc;

use glamora_core::{Price, ProductId, WishlistItemId};
use parking_lot::RwLock;
use tracing::debug;

use crate::api::ApiClient;
use crate::clock::Clock;
use crate::models::WishlistItem;
use crate::sync::SyncCoordinator;

/// Wishlist with at most one entry per product.
#[derive(Debug)]
pub struct WishlistStore {
    items: RwLock<Vec<WishlistItem>>,
    api: ApiClient,
    sync: SyncCoordinator,
    clock: Arc<dyn Clock>,
}

impl WishlistStore {
    #[must_use]
    pub fn new(api: ApiClient, sync: SyncCoordinator, clock: Arc<dyn Clock>) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            api,
            sync,
            clock,
        }
    }

    /// Save a product.
    ///
    /// Returns `None` without contacting the backend if the product is already
    /// saved.
    pub fn add(
        &self,
        product_id: ProductId,
        name: impl Into<String>,
        price: Price,
        image_url: impl Into<String>,
    ) -> Option<WishlistItemId> {
        let now = self.clock.now();
        let id = WishlistItemId::from_timestamp(now);
        {
            let mut items = self.items.write();
            if items.iter().any(|item| item.product_id == product_id) {
                debug!(product_id = %product_id, "Already in wishlist");
                return None;
            }
            items.push(WishlistItem {
                id: id.clone(),
                product_id: product_id.clone(),
                name: name.into(),
                price,
                image_url: image_url.into(),
                added_at: now,
            });
        }

        let api = self.api.clone();
        self.sync.dispatch("wishlist.add", async move {
            api.add_to_wishlist(&product_id).await
        });
        Some(id)
    }

    /// Remove an entry by ID and sync the removal.
    pub fn remove(&self, item_id: &WishlistItemId) {
        self.items.write().retain(|item| &item.id != item_id);

        let api = self.api.clone();
        let item_id = item_id.clone();
        self.sync.dispatch("wishlist.remove", async move {
            api.remove_from_wishlist(&item_id).await
        });
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items
            .read()
            .iter()
            .any(|item| &item.product_id == product_id)
    }

    /// Empty the wishlist locally.
    pub fn clear(&self) {
        self.items.write().clear();
    }

    #[must_use]
    pub fn items(&self) -> Vec<WishlistItem> {
        self.items.read().clone()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.read().len()
    }
}

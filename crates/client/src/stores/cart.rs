//! Shopping cart.

use std::num::NonZeroU32;
use std::sync::Arc;

use glamora_core::{CartItemId, Price, ProductId};
use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use crate::analytics;
use crate::api::{Address, ApiClient, ApiError, Order, OrderLineInput, OrderRequest};
use crate::clock::Clock;
use crate::models::CartItem;
use crate::sync::SyncCoordinator;

/// Cart lines with optimistic remote sync.
///
/// Lines are kept in insertion order. Adding the same product twice yields two
/// lines; `item_count` counts lines, not units.
#[derive(Debug)]
pub struct CartStore {
    items: RwLock<Vec<CartItem>>,
    api: ApiClient,
    sync: SyncCoordinator,
    clock: Arc<dyn Clock>,
}

impl CartStore {
    #[must_use]
    pub fn new(api: ApiClient, sync: SyncCoordinator, clock: Arc<dyn Clock>) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            api,
            sync,
            clock,
        }
    }

    /// Append a new line and sync it in the background.
    ///
    /// Returns the new line's ID.
    pub fn add_item(
        &self,
        product_id: ProductId,
        name: impl Into<String>,
        price: Price,
        image_url: impl Into<String>,
        quantity: NonZeroU32,
    ) -> CartItemId {
        let id = CartItemId::from_timestamp(self.clock.now());
        self.items.write().push(CartItem {
            id: id.clone(),
            product_id: product_id.clone(),
            name: name.into(),
            price,
            quantity,
            image_url: image_url.into(),
        });
        debug!(item_id = %id, product_id = %product_id, "Cart line added");
        analytics::track_add_to_cart(&product_id, quantity.get());

        let api = self.api.clone();
        self.sync.dispatch("cart.add", async move {
            api.add_to_cart(&product_id, quantity.get()).await
        });
        id
    }

    /// Remove every line with `item_id`. Unknown IDs leave the cart as is.
    ///
    /// The remote removal is dispatched either way.
    pub fn remove_item(&self, item_id: &CartItemId) {
        let removed = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|item| &item.id != item_id);
            before - items.len()
        };
        debug!(item_id = %item_id, removed, "Cart line removed");

        let api = self.api.clone();
        let item_id = item_id.clone();
        self.sync.dispatch("cart.remove", async move {
            api.remove_from_cart(&item_id).await
        });
    }

    /// Overwrite a line's quantity. Zero removes the line.
    ///
    /// No upper bound or stock check is applied.
    pub fn update_quantity(&self, item_id: &CartItemId, quantity: u32) {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            self.remove_item(item_id);
            return;
        };

        if let Some(item) = self.items.write().iter_mut().find(|item| &item.id == item_id) {
            item.quantity = quantity;
        }

        let api = self.api.clone();
        let item_id = item_id.clone();
        self.sync.dispatch("cart.update", async move {
            api.update_cart_item(&item_id, quantity.get()).await
        });
    }

    /// Empty the cart locally.
    pub fn clear(&self) {
        self.items.write().clear();
    }

    /// Submit the current lines as an order.
    ///
    /// The cart is cleared only when the backend accepts the order.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the cart is left untouched.
    #[instrument(skip(self, shipping_address))]
    pub async fn checkout(&self, shipping_address: Address) -> Result<Order, ApiError> {
        let (lines, total) = {
            let items = self.items.read();
            let lines = items
                .iter()
                .map(|item| OrderLineInput {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect::<Vec<_>>();
            (lines, items.iter().map(CartItem::line_total).sum::<Price>())
        };
        let item_count = lines.len();

        let order = self
            .api
            .create_order(&OrderRequest {
                items: lines,
                shipping_address,
            })
            .await?;

        self.clear();
        info!(order_id = %order.id, item_count, "Checkout completed");
        analytics::track_purchase(&order.id, total, item_count);
        Ok(order)
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.read().iter().map(CartItem::line_total).sum()
    }

    /// Number of lines.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.read().len()
    }

    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.items.read().clone()
    }
}

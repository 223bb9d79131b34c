//! Cart line items.

use std::num::NonZeroU32;

use glamora_core::{CartItemId, Price, ProductId};
use serde::{Deserialize, Serialize};

/// One line in the cart.
///
/// Lines are not deduplicated by product: adding the same product twice
/// yields two lines. A line with quantity zero cannot exist; the store removes
/// the line instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Client-generated line ID (millisecond timestamp).
    pub id: CartItemId,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Number of units.
    pub quantity: NonZeroU32,
    /// Product image URL.
    pub image_url: String,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity.get()
    }
}

//! Wishlist entries.

use chrono::{DateTime, Utc};
use glamora_core::{Price, ProductId, WishlistItemId};
use serde::{Deserialize, Serialize};

/// A saved product. A product appears at most once per wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub added_at: DateTime<Utc>,
}

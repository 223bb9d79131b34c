//! Request and response types for the Glamora REST API.
//!
//! Every response body is wrapped as `{ "data": ... }`; the gateway unwraps
//! the envelope so these types describe only the payload.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use glamora_core::{
    DesignType, Email, OrderId, OrderStatus, PostId, Price, ProductId, UserId, UserRole,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::models::{CartItem, Design, Notification, WishlistItem};

// =============================================================================
// Envelope
// =============================================================================

/// Response envelope used by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

// =============================================================================
// Auth Types
// =============================================================================

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub user: User,
    /// Bearer token, already persisted to the credential store.
    pub token: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAuthPayload {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MeResponse {
    pub user: User,
}

// =============================================================================
// Design Types
// =============================================================================

/// Body of `POST /designs/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateDesignRequest {
    #[serde(rename = "type")]
    pub kind: DesignType,
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeneratedDesign {
    pub design: Design,
}

/// A page of designs from `GET /designs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesignPage {
    #[serde(default)]
    pub designs: Vec<Design>,
}

// =============================================================================
// Product Types
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub gemstone: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub in_stock: bool,
}

/// Filters for `GET /products`.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    pub(crate) fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// A page of products from `GET /products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductResponse {
    pub product: Product,
}

// =============================================================================
// Cart & Wishlist Types
// =============================================================================

/// Server-side view of the cart from `GET /cart`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteCart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// Server-side view of the wishlist from `GET /wishlist`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteWishlist {
    #[serde(default)]
    pub items: Vec<WishlistItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddToCartBody<'a> {
    pub product_id: &'a ProductId,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuantityBody {
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductRef<'a> {
    pub product_id: &'a ProductId,
}

// =============================================================================
// Order Types
// =============================================================================

/// Shipping address attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// One line of an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    pub product_id: ProductId,
    pub quantity: NonZeroU32,
    pub price: Price,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<OrderLineInput>,
    pub shipping_address: Address,
}

/// A placed order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: Price,
    #[serde(default)]
    pub shipping_address: Address,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One line of a placed order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub product_id: ProductId,
    #[serde(default)]
    pub product: Option<Product>,
    pub quantity: u32,
    pub price: Price,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderResponse {
    pub order: Order,
}

/// A page of orders from `GET /orders`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPage {
    #[serde(default)]
    pub orders: Vec<Order>,
}

// =============================================================================
// Notification Types
// =============================================================================

/// A page of notifications from `GET /notifications`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

// =============================================================================
// Social Types
// =============================================================================

/// Author summary embedded in posts.
#[derive(Debug, Clone, Deserialize)]
pub struct PostAuthor {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Author summary embedded in comments.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentAuthor {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A comment on a post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: UserId,
    pub user: CommentAuthor,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A social feed post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub user: PostAuthor,
    pub content: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_liked: bool,
}

/// A page of the social feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewPost<'a> {
    pub content: &'a str,
    pub image_urls: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostResponse {
    pub post: Post,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_request_wire_shape() {
        let request = OrderRequest {
            items: vec![OrderLineInput {
                product_id: ProductId::new("p1"),
                quantity: NonZeroU32::new(2).unwrap(),
                price: Price::from_major(100),
            }],
            shipping_address: Address {
                street: "1 Gem St".to_string(),
                city: "Austin".to_string(),
                state: "TX".to_string(),
                zip: "73301".to_string(),
                country: "US".to_string(),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["items"][0]["productId"], "p1");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["items"][0]["price"], 100.0);
        assert_eq!(json["shippingAddress"]["city"], "Austin");
    }

    #[test]
    fn test_user_minimal_payload() {
        let user: User =
            serde_json::from_str(r#"{"id":"u1","email":"jane@glamora.app","name":"Jane"}"#)
                .unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(user.avatar.is_none());
    }

    #[test]
    fn test_product_query_pairs() {
        let query = ProductQuery {
            category: Some("rings".to_string()),
            page: Some(2),
            ..ProductQuery::default()
        };
        assert_eq!(
            query.pairs(),
            vec![("category", "rings".to_string()), ("page", "2".to_string())]
        );
    }

    #[test]
    fn test_generate_request_omits_missing_description() {
        let body = GenerateDesignRequest {
            kind: DesignType::Necklace,
            style: "art deco".to_string(),
            description: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "necklace");
        assert!(json.get("description").is_none());
    }
}

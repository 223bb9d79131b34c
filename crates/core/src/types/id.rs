//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! Backend identifiers are opaque strings. Client-side records (cart lines,
//! wishlist entries, simulated designs, push notifications) get an ID derived
//! from the current Unix time in milliseconds, which is what the backend
//! expects to see echoed back. Two IDs minted within the same millisecond
//! collide; callers that care must not rely on uniqueness.

use chrono::{DateTime, Utc};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `from_timestamp()`, `generate()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use glamora_core::define_id;
/// define_id!(PostId);
/// define_id!(CommentId);
///
/// let post_id = PostId::new("42");
/// let comment_id = CommentId::new("42");
///
/// // These are different types, so this won't compile:
/// // let _: PostId = comment_id;
/// assert_eq!(post_id.as_str(), comment_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Create an ID from the millisecond timestamp of `at`.
            #[must_use]
            pub fn from_timestamp(at: ::chrono::DateTime<::chrono::Utc>) -> Self {
                Self($crate::types::id::timestamp_id(at))
            }

            /// Create an ID from the current time.
            #[must_use]
            pub fn generate() -> Self {
                Self::from_timestamp(::chrono::Utc::now())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Render a timestamp as the millisecond-epoch string used for client IDs.
#[must_use]
pub fn timestamp_id(at: DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(CartItemId);
define_id!(WishlistItemId);
define_id!(DesignId);
define_id!(NotificationId);
define_id!(OrderId);
define_id!(PostId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_from_timestamp_uses_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(CartItemId::from_timestamp(at).as_str(), "1700000000123");
    }

    #[test]
    fn test_same_millisecond_collides() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(CartItemId::from_timestamp(at), CartItemId::from_timestamp(at));
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::new("p1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p1\"");
        let parsed: ProductId = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_display_and_conversions() {
        let id = DesignId::from("d-9");
        assert_eq!(id.to_string(), "d-9");
        let raw: String = id.into();
        assert_eq!(raw, "d-9");
    }
}

//! Records held by the client-side collection stores.
//!
//! These are the shapes the stores own and hand out as snapshots. The same
//! records travel over the wire (camelCase JSON), so the gateway reuses them
//! where the backend returns one directly.

mod cart;
mod design;
mod notification;
mod wishlist;

pub use cart::CartItem;
pub use design::Design;
pub use notification::{
    Notification, NotificationPreferences, PreferencesUpdate, PushData, PushPayload,
};
pub use wishlist::WishlistItem;

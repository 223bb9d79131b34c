//! Glamora client library.
//!
//! Client-side state for the Glamora jewelry app: the cart, wishlist, design
//! gallery and notification inbox, the session, and the REST gateway they sync
//! through. Front ends build an [`AppState`] and drive the stores.
//!
//! Local mutations are applied immediately and synced to the backend in the
//! background (see [`sync`]). Remote failures are logged, never rolled back.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod onboarding;
pub mod session;
pub mod state;
pub mod storage;
pub mod stores;
pub mod sync;
pub mod telemetry;
pub mod validation;

pub use error::{ClientError, Result};
pub use state::AppState;

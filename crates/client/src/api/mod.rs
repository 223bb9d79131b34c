//! Remote gateway for the Glamora REST API.
//!
//! # Architecture
//!
//! - One `reqwest` client with a fixed base URL and request timeout
//! - The bearer token is read from the credential store before every request
//! - A 401 response deletes the stored token, then the error goes to the caller
//! - No retries, no token refresh
//!
//! # Example
//!
//! ```rust,ignore
//! use glamora_client::api::ApiClient;
//!
//! let api = ApiClient::new(&config.api, credentials)?;
//! let auth = api.login(&email, &password).await?;
//! let products = api.list_products(&ProductQuery::default()).await?;
//! ```

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered 401; the stored token has been deleted.
    #[error("Unauthorized")]
    Unauthorized,

    /// The backend answered with another non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading the bearer token failed.
    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),

    /// An endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Classify a `reqwest` error, separating timeouts from other failures.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }

    /// Whether this error came from a 401 response.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

//! Unified error type for callers driving the client end to end.
//!
//! Store operations return their own error types. `ClientError` wraps them
//! for front ends (the CLI) that want one type and Sentry reporting.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::session::SessionError;
use crate::storage::StorageError;
use crate::stores::DesignError;

/// Any failure surfaced by the client library.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Design error: {0}")]
    Design(#[from] DesignError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Whether the error is worth a Sentry event.
    ///
    /// User mistakes (bad input, rejected credentials) are not.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Storage(_) => true,
            Self::Api(e) | Self::Session(SessionError::Api(e)) | Self::Design(DesignError::Api(e)) => {
                !matches!(e, ApiError::Unauthorized | ApiError::Status { .. })
            }
            Self::Session(SessionError::InvalidEmail(_)) | Self::Design(DesignError::InvalidInput(_)) => {
                false
            }
        }
    }

    /// Log the error and capture it to Sentry when reportable.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::warn!(error = %self, "Command rejected");
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use glamora_core::Email;

    use super::*;
    use crate::validation::InputError;

    #[test]
    fn test_user_errors_are_not_reportable() {
        let Err(email) = Email::parse("nope") else {
            panic!("expected parse failure");
        };
        assert!(!ClientError::from(SessionError::from(email)).is_reportable());
        assert!(!ClientError::from(SessionError::Api(ApiError::Unauthorized)).is_reportable());
        assert!(
            !ClientError::from(DesignError::InvalidInput(InputError::Empty { field: "style" }))
                .is_reportable()
        );
    }

    #[test]
    fn test_infrastructure_errors_are_reportable() {
        assert!(ClientError::from(ApiError::Timeout).is_reportable());
        assert!(
            ClientError::from(ConfigError::InvalidEnvVar("X".to_string(), "bad".to_string()))
                .is_reportable()
        );
    }

    #[test]
    fn test_display_prefixes_source() {
        let err = ClientError::from(ApiError::Unauthorized);
        assert_eq!(err.to_string(), "API error: Unauthorized");
    }
}

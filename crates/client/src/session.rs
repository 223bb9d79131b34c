//! Authenticated identity.
//!
//! The session holds at most one [`User`]. Token presence is owned by the
//! gateway, which clears it on any 401, so a session can lose its token
//! without a logout. `is_authenticated` therefore checks both.

use glamora_core::{Email, EmailError};
use parking_lot::RwLock;
use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError, User};
use crate::telemetry;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Current user plus the gateway's token flag.
#[derive(Debug)]
pub struct SessionStore {
    user: RwLock<Option<User>>,
    api: ApiClient,
}

impl SessionStore {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            user: RwLock::new(None),
            api,
        }
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidEmail`] without contacting the backend
    /// if `email` is malformed, or the gateway error otherwise.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, SessionError> {
        let email = Email::parse(email)?;
        let auth = self.api.login(&email, password).await?;
        Ok(self.start(auth.user, "User logged in"))
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Same as [`SessionStore::login`].
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, SessionError> {
        let email = Email::parse(email)?;
        let auth = self.api.register(name, &email, password).await?;
        Ok(self.start(auth.user, "User registered"))
    }

    fn start(&self, user: User, message: &str) -> User {
        telemetry::set_sentry_user(&user.id, Some(user.email.as_str()));
        telemetry::add_breadcrumb("auth", message, None);
        info!(user_id = %user.id, "{message}");
        *self.user.write() = Some(user.clone());
        user
    }

    /// Sign out locally whatever the backend says.
    ///
    /// A failed remote logout is logged. The stored token is deleted and the
    /// user cleared in every case.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Remote logout failed, signing out locally");
        }
        if let Err(e) = self.api.clear_token().await {
            warn!(error = %e, "Failed to delete auth token on logout");
        }
        *self.user.write() = None;
        telemetry::clear_sentry_user();
        telemetry::add_breadcrumb("auth", "User logged out", None);
    }

    /// Resume a session from a stored token.
    ///
    /// Returns `None` when there is no token or the backend rejects it (the
    /// gateway has already deleted it in that case).
    ///
    /// # Errors
    ///
    /// Returns the gateway error for failures other than 401, leaving the
    /// token in place.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<Option<User>, SessionError> {
        if !self.api.refresh_token_presence().await.map_err(ApiError::from)? {
            return Ok(None);
        }

        match self.api.me().await {
            Ok(user) => Ok(Some(self.start(user, "Session restored"))),
            Err(ApiError::Unauthorized) => {
                info!("Stored token rejected, continuing as guest");
                *self.user.write() = None;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.user.read().clone()
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.api.has_token()
    }

    /// A user is loaded and their token has not been invalidated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.read().is_some() && self.has_token()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::AUTH_TOKEN_KEY;
    use crate::stores::test_support::unreachable_api;

    #[tokio::test]
    async fn test_invalid_email_is_rejected_locally() {
        let session = SessionStore::new(unreachable_api());
        let result = session
            .login("not-an-email", &SecretString::from("hunter22"))
            .await;
        assert!(matches!(result, Err(SessionError::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn test_restore_without_token_is_guest() {
        let session = SessionStore::new(unreachable_api());
        assert!(session.restore().await.unwrap().is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_network_error_keeps_token() {
        let api = unreachable_api();
        api.credentials().set(AUTH_TOKEN_KEY, "tok").await.unwrap();
        let session = SessionStore::new(api.clone());

        assert!(matches!(session.restore().await, Err(SessionError::Api(_))));
        assert!(session.has_token());
        assert_eq!(
            api.credentials().get(AUTH_TOKEN_KEY).await.unwrap().as_deref(),
            Some("tok")
        );
    }

    #[tokio::test]
    async fn test_logout_clears_token_when_backend_unreachable() {
        let api = unreachable_api();
        api.credentials().set(AUTH_TOKEN_KEY, "tok").await.unwrap();
        let session = SessionStore::new(api.clone());

        session.logout().await;

        assert!(!session.has_token());
        assert!(session.user().is_none());
        assert_eq!(api.credentials().get(AUTH_TOKEN_KEY).await.unwrap(), None);
    }
}

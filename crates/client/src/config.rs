//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `GLAMORA_API_BASE_URL` - Backend base URL (default: `http://localhost:3000/api`)
//! - `GLAMORA_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `GLAMORA_DESIGN_GENERATOR` - `simulated` or `remote` (default: simulated)
//! - `GLAMORA_SIMULATED_DELAY_MS` - Simulated generation delay (default: 2000)
//! - `GLAMORA_DATA_DIR` - Directory for persisted token and flags (default: `.glamora`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SIMULATED_DELAY_MS: u64 = 2000;
const DEFAULT_DATA_DIR: &str = ".glamora";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Glamora client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Remote API configuration
    pub api: ApiConfig,
    /// How designs are generated
    pub generator: DesignGenerator,
    /// Directory holding the persisted token and onboarding flag
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Remote API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
}

/// Design generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignGenerator {
    /// Build the design locally after a fixed delay.
    Simulated { delay: Duration },
    /// Ask the backend's `/designs/generate` endpoint.
    Remote,
}

impl Default for DesignGenerator {
    fn default() -> Self {
        Self::Simulated {
            delay: Duration::from_millis(DEFAULT_SIMULATED_DELAY_MS),
        }
    }
}

impl ApiConfig {
    /// Build a configuration for a specific base URL with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)
                .map_err(|e| ConfigError::InvalidEnvVar("GLAMORA_API_BASE_URL".to_string(), e))?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but cannot be parsed.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Source(lookup);

        let base_url = env.or_default("GLAMORA_API_BASE_URL", DEFAULT_BASE_URL);
        let base_url = parse_base_url(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("GLAMORA_API_BASE_URL".to_string(), e))?;
        let timeout = Duration::from_secs(env.parsed_or(
            "GLAMORA_API_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?);

        let delay = Duration::from_millis(env.parsed_or(
            "GLAMORA_SIMULATED_DELAY_MS",
            DEFAULT_SIMULATED_DELAY_MS,
        )?);
        let generator = match env.or_default("GLAMORA_DESIGN_GENERATOR", "simulated").as_str() {
            "simulated" => DesignGenerator::Simulated { delay },
            "remote" => DesignGenerator::Remote,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "GLAMORA_DESIGN_GENERATOR".to_string(),
                    format!("expected 'simulated' or 'remote', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            api: ApiConfig { base_url, timeout },
            generator,
            data_dir: PathBuf::from(env.or_default("GLAMORA_DATA_DIR", DEFAULT_DATA_DIR)),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Source<F>(F);

impl<F: Fn(&str) -> Option<String>> Source<F> {
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a variable parsed as `T`, with a default value.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Parse a base URL, forcing a trailing slash so `Url::join` keeps the path.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&normalized).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err(format!("'{raw}' cannot be used as a base URL"));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_source(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:3000/api/");
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(
            config.generator,
            DesignGenerator::Simulated {
                delay: Duration::from_secs(2)
            }
        );
        assert_eq!(config.data_dir, PathBuf::from(".glamora"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = load(&[("GLAMORA_API_BASE_URL", "https://api.glamora.app/v2")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://api.glamora.app/v2/");
        assert_eq!(
            config.api.base_url.join("cart/add").unwrap().as_str(),
            "https://api.glamora.app/v2/cart/add"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&[("GLAMORA_API_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "GLAMORA_API_BASE_URL"));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load(&[("GLAMORA_API_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_remote_generator() {
        let config = load(&[("GLAMORA_DESIGN_GENERATOR", "remote")]).unwrap();
        assert_eq!(config.generator, DesignGenerator::Remote);
    }

    #[test]
    fn test_unknown_generator() {
        assert!(load(&[("GLAMORA_DESIGN_GENERATOR", "gpu")]).is_err());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = load(&[("SENTRY_DSN", ""), ("GLAMORA_API_TIMEOUT_SECS", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.api.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_api_config_with_base_url() {
        let api = ApiConfig::with_base_url("http://127.0.0.1:9000/api").unwrap();
        assert_eq!(api.base_url.as_str(), "http://127.0.0.1:9000/api/");
        assert!(ApiConfig::with_base_url("mailto:jane@glamora.app").is_err());
    }
}

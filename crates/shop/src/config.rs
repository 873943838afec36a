//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LUMIRA_API_BASE_URL` - Base URL of the storefront REST backend
//!   (e.g., `https://api.lumira.shop/api/v1`)
//!
//! ## Optional
//! - `LUMIRA_CACHE_DIR` - Directory for the persistent local cache
//!   (default: `.lumira`)
//! - `LUMIRA_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `LUMIRA_ACCESS_TOKEN` - Bearer token for an authenticated session; when
//!   absent the session starts anonymous

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CACHE_DIR: &str = ".lumira";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shopping-session client configuration.
#[derive(Clone)]
pub struct ShopConfig {
    /// Base URL of the storefront REST backend.
    pub api_base_url: Url,
    /// Directory holding the per-collection local cache slots.
    pub cache_dir: PathBuf,
    /// Timeout applied to every backend request.
    pub request_timeout: Duration,
    /// Bearer token for an authenticated session, when one exists.
    pub access_token: Option<SecretString>,
}

impl std::fmt::Debug for ShopConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("cache_dir", &self.cache_dir)
            .field("request_timeout", &self.request_timeout)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url("LUMIRA_API_BASE_URL")?;
        let cache_dir =
            PathBuf::from(get_env_or_default("LUMIRA_CACHE_DIR", DEFAULT_CACHE_DIR));
        let request_timeout = Duration::from_secs(
            get_env_or_default(
                "LUMIRA_REQUEST_TIMEOUT_SECS",
                &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
            )
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "LUMIRA_REQUEST_TIMEOUT_SECS".to_string(),
                    e.to_string(),
                )
            })?,
        );
        let access_token = get_optional_env("LUMIRA_ACCESS_TOKEN").map(SecretString::from);

        Ok(Self {
            api_base_url,
            cache_dir,
            request_timeout,
            access_token,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and validate the backend base URL.
fn parse_base_url(key: &str) -> Result<Url, ConfigError> {
    let raw = get_required_env(key)?;
    let url = Url::parse(&raw)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

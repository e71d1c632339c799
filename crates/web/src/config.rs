//! Web client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `QUITQ_API_BASE_URL` - Base URL of the QuitQ REST backend (e.g. `http://localhost:5193/`)
//!
//! ## Optional
//! - `QUITQ_ASSET_BASE_URL` - Prefix for product image paths (default: API base URL)
//! - `QUITQ_HOST` - Bind address (default: 127.0.0.1)
//! - `QUITQ_PORT` - Listen port (default: 3000)
//! - `QUITQ_BASE_URL` - Public URL of this web client (default: `http://localhost:3000`)
//! - `QUITQ_API_TIMEOUT_SECS` - REST request timeout in seconds (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web client configuration.
#[derive(Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for this web client
    pub base_url: String,
    /// REST backend configuration
    pub api: ApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors reported to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced by Sentry
    pub sentry_traces_sample_rate: f32,
}

/// REST backend configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto. Always ends with `/`.
    pub base_url: Url,
    /// Base URL product image paths are joined onto.
    pub asset_base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl WebConfig {
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

        let host = get_env_or_default("QUITQ_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("QUITQ_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("QUITQ_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("QUITQ_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("QUITQ_BASE_URL", "http://localhost:3000");

        let api = ApiConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            api,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl std::fmt::Debug for WebConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("api", &self.api)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .field("sentry_traces_sample_rate", &self.sentry_traces_sample_rate)
            .finish()
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url("QUITQ_API_BASE_URL", &get_required_env("QUITQ_API_BASE_URL")?)?;
        let asset_base_url = match get_optional_env("QUITQ_ASSET_BASE_URL") {
            Some(raw) => parse_base_url("QUITQ_ASSET_BASE_URL", &raw)?,
            None => base_url.clone(),
        };
        let timeout_secs = get_env_or_default(
            "QUITQ_API_TIMEOUT_SECS",
            &DEFAULT_API_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("QUITQ_API_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            base_url,
            asset_base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build a configuration for a backend at `base_url` with default
    /// settings. Used by tests and tooling that point at a mock backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = parse_base_url("base_url", base_url)?;
        Ok(Self {
            asset_base_url: base_url.clone(),
            base_url,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
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

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

/// Parse a base URL so that relative endpoint paths join beneath it.
///
/// `Url::join` replaces the last path segment unless the base ends with a
/// slash, so one is appended when missing.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl WebConfig {
    /// Configuration pointing at a test backend.
    pub(crate) fn for_tests(api_base_url: &str) -> Self {
        Self {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "https://shop.quitq.in".to_string(),
            api: ApiConfig::for_base_url(api_base_url).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

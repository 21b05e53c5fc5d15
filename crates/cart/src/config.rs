//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_API_URL` - Base URL of the catalog/stock API (default: `http://localhost:3333`)
//! - `CATALOG_API_TOKEN` - Bearer token sent to the catalog API
//! - `CATALOG_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `CART_STORAGE_PATH` - Key-value file the cart is persisted into
//!   (default: `.rocketshoes/storage.json`)
//! - `CART_STORAGE_KEY` - Key holding the serialized cart (default: `@RocketShoes:cart`)
//! - `CART_CURRENCY` - Currency used to display prices (default: BRL)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use rocketshoes_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::store::DEFAULT_STORAGE_KEY;

const DEFAULT_CATALOG_URL: &str = "http://localhost:3333";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Catalog/stock API configuration
    pub catalog: CatalogConfig,
    /// Local persistence configuration
    pub storage: StorageConfig,
    /// Currency used when displaying prices
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Catalog/stock API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL; `stock/{id}` and `products/{id}` are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Local key-value persistence configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// File holding the key-value map
    pub path: PathBuf,
    /// Key under which the cart is stored
    pub key: String,
}

impl CartConfig {
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

        let currency = get_env_or_default("CART_CURRENCY", "BRL")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_CURRENCY".to_string(), e))?;

        Ok(Self {
            catalog: CatalogConfig::from_env()?,
            storage: StorageConfig::from_env(),
            currency,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&get_env_or_default("CATALOG_API_URL", DEFAULT_CATALOG_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e))?;

        let timeout_secs = get_env_or_default("CATALOG_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            api_token: get_optional_env("CATALOG_API_TOKEN")
                .filter(|token| !token.is_empty())
                .map(SecretString::from),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Configuration pointing at a base URL with no token and the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is not an absolute http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)
                .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e))?,
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            path: PathBuf::from(get_env_or_default("CART_STORAGE_PATH", DEFAULT_STORAGE_PATH)),
            key: get_env_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a catalog base URL, forcing a trailing slash so relative joins keep the path.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `AVENTO_API_BASE_URL` - Backend API base URL (default: `http://127.0.0.1:5000`)
//! - `AVENTO_GEOCODER_BASE_URL` - Geocoding service base URL (default: public Nominatim)
//! - `AVENTO_DATA_DIR` - Directory for locally persisted state (default: `.avento`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_DATA_DIR: &str = ".avento";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend HTTP JSON API
    pub api_base_url: Url,
    /// Base URL of the address geocoding service
    pub geocoder_base_url: Url,
    /// Directory holding locally persisted state (cart, lists cache, session, settings)
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse as a URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_url_or_default("AVENTO_API_BASE_URL", DEFAULT_API_BASE_URL)?;
        let geocoder_base_url =
            get_url_or_default("AVENTO_GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL)?;
        let data_dir = PathBuf::from(get_env_or_default("AVENTO_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self {
            api_base_url,
            geocoder_base_url,
            data_dir,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // Compile-time constants; parsing cannot fail
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).unwrap_or_else(|_| unreachable!()),
            geocoder_base_url: Url::parse(DEFAULT_GEOCODER_BASE_URL)
                .unwrap_or_else(|_| unreachable!()),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable as a URL, with a default value.
fn get_url_or_default(key: &str, default: &str) -> Result<Url, ConfigError> {
    get_env_or_default(key, default)
        .parse::<Url>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls_parse() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.geocoder_base_url.scheme(), "https");
        assert_eq!(config.data_dir, PathBuf::from(".avento"));
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        let value = get_env_or_default("AVENTO_TEST_UNSET_VARIABLE", "fallback");
        assert_eq!(value, "fallback");
    }
}

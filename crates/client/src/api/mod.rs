//! Typed wrappers over the backend's HTTP JSON API.
//!
//! # Architecture
//!
//! - One shared [`ApiClient`] (a cheap clone around `reqwest::Client`) with
//!   per-resource wrapper methods grouped by module
//! - The backend is source of truth for lists, orders, and settings - the
//!   wrappers return its responses verbatim
//! - Product-by-id reads are cached in-memory via `moka` (5 minute TTL)
//! - Authenticated routes read the persisted session's bearer token on every
//!   call, so a login in one part of the app is visible everywhere
//!
//! # Error convention
//!
//! Non-2xx responses carry `{"error": "..."}`. Each wrapper extracts that
//! message or falls back to a route-specific default, then returns it as
//! [`ApiError::Api`]. Transport failures surface as [`ApiError::Http`].
//!
//! State containers consume these wrappers through the narrow per-resource
//! traits ([`AuthApi`], [`ListsApi`], [`SettingsApi`], [`CheckoutApi`]) so
//! tests can substitute stubs.

pub mod auth;
pub mod geocode;
pub mod lists;
pub mod orders;
pub mod payments;
pub mod products;
pub mod settings;

pub use auth::AuthApi;
pub use geocode::{AddressCandidate, GeocodeError, Geocoder, NominatimClient};
pub use lists::ListsApi;
pub use payments::{CheckoutApi, CheckoutSession};
pub use settings::SettingsApi;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use avento_core::{AuthSession, Product, ProductId};

use crate::config::ClientConfig;
use crate::store::{KeyValueStore, AUTH_KEY};

/// Product cache capacity.
const PRODUCT_CACHE_CAPACITY: u64 = 1000;
/// Product cache time-to-live.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response was produced.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    ///
    /// `message` is the server's `error` field when present, otherwise a
    /// route-specific default. Displayed verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A URL could not be constructed or parsed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Body shape of backend error responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Check a response status, extracting the server's error message on failure.
pub(crate) async fn ok_or_api_error(
    response: reqwest::Response,
    default_message: &str,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| default_message.to_owned());

    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Client for the backend storefront API.
///
/// Cheap to clone; all clones share the HTTP connection pool and the product
/// cache. The store is consulted for the bearer token on each authenticated
/// request.
#[derive(Clone)]
pub struct ApiClient<S: KeyValueStore> {
    inner: Arc<ApiClientInner<S>>,
}

struct ApiClientInner<S> {
    http: reqwest::Client,
    base_url: Url,
    store: S,
    product_cache: Cache<ProductId, Product>,
}

impl<S: KeyValueStore> ApiClient<S> {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ClientConfig, store: S) -> Self {
        let product_cache = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                store,
                product_cache,
            }),
        }
    }

    /// Resolve a path against the configured base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// The bearer token of the persisted session, if any.
    fn bearer_token(&self) -> Option<String> {
        self.inner
            .store
            .load::<AuthSession>(AUTH_KEY)
            .and_then(|session| session.token)
    }

    /// Build an unauthenticated JSON request.
    pub(crate) fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.inner
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Build a request carrying the persisted session's bearer token.
    ///
    /// Falls back to an unauthenticated request when no session is persisted;
    /// the backend then rejects the call with its own error message.
    pub(crate) fn authed(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.request(method, url);
        match self.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) fn product_cache(&self) -> &Cache<ProductId, Product> {
        &self.inner.product_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_message_only() {
        let err = ApiError::Api {
            status: 403,
            message: "cannot_modify_wishlist".to_string(),
        };
        assert_eq!(err.to_string(), "cannot_modify_wishlist");
    }

    #[test]
    fn test_url_join() {
        let config = ClientConfig::default();
        let client = ApiClient::new(&config, crate::store::MemoryStore::new());
        let url = client.url("/products").expect("join");
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/products");
    }

    #[test]
    fn test_bearer_token_reads_persisted_session() {
        use crate::store::KeyValueStore;

        let store = crate::store::MemoryStore::new();
        store
            .save_raw(
                AUTH_KEY,
                r#"{"user":{"id":"u1","name":"Ada","email":"ada@example.com"},"token":"jwt"}"#,
            )
            .expect("save");

        let client = ApiClient::new(&ClientConfig::default(), store);
        assert_eq!(client.bearer_token().as_deref(), Some("jwt"));
    }
}

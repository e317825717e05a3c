//! Address geocoding client (Nominatim search API).

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ClientConfig;

/// Identify ourselves to the geocoding service; Nominatim's usage policy
/// requires a distinguishable User-Agent.
const USER_AGENT: &str = concat!("avento-storefront/", env!("CARGO_PKG_VERSION"));

/// Maximum number of candidates requested per lookup.
const RESULT_LIMIT: u32 = 5;

/// Errors that can occur during address lookup.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse the response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One candidate returned by the geocoder.
///
/// `lat`/`lon` arrive as strings on the wire and stay strings until an
/// address is selected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddressCandidate {
    pub place_id: u64,
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

/// Free-text address lookup, as consumed by the address container.
pub trait Geocoder: Send + Sync {
    /// Search for addresses matching a free-text query.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<AddressCandidate>, GeocodeError>> + Send;
}

/// Nominatim-backed geocoder.
#[derive(Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NominatimClient {
    /// Create a new geocoding client.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.geocoder_base_url.clone(),
        }
    }
}

impl Geocoder for NominatimClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<AddressCandidate>, GeocodeError> {
        let url = format!(
            "{}search?format=json&addressdetails=1&limit={RESULT_LIMIT}&q={}",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))
    }
}

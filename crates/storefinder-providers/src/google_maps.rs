//! Google Geocoding client.
//!
//! Only forward geocoding goes over the wire. Distances use the analytic
//! estimate from [`GeoProvider::distance_and_duration`]'s default.

use async_trait::async_trait;
use reqwest::{Client, Url};
use storefinder_core::{geo, Coordinates, GeoError, GeoProvider};

use crate::error::ProviderError;
use crate::http::{build_client, endpoint_url, HttpSettings};
use crate::types::GeocodeResponse;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    geocode_url: Url,
}

impl std::fmt::Debug for GoogleMapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsClient")
            .field("api_key", &"[redacted]")
            .field("geocode_url", &self.geocode_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GoogleMapsClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(http: &HttpSettings, api_key: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(http, api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        http: &HttpSettings,
        api_key: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(http)?,
            api_key: api_key.to_string(),
            geocode_url: endpoint_url(base_url, "geocode/json")?,
        })
    }

    fn request_url(&self, address_text: &str) -> Url {
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("address", address_text)
            .append_pair("key", &self.api_key);
        url
    }
}

/// Picks the first candidate of a geocoding response.
fn first_candidate(address_text: &str, body: GeocodeResponse) -> Result<Coordinates, GeoError> {
    let status = body.status.as_deref().unwrap_or(STATUS_OK);
    if status != STATUS_OK && status != STATUS_ZERO_RESULTS {
        let detail = body.error_message.unwrap_or_default();
        let reason = format!("{status} {detail}");
        return Err(GeoError::Unavailable(reason.trim_end().to_string()));
    }

    let candidate = body
        .results
        .into_iter()
        .next()
        .ok_or_else(|| GeoError::NotFound(address_text.to_string()))?;
    let coords = Coordinates {
        latitude: candidate.geometry.location.lat,
        longitude: candidate.geometry.location.lng,
    };
    if let Err(e) = geo::validate(coords) {
        return Err(GeoError::Unavailable(format!("geocoder returned {e}")));
    }
    Ok(coords)
}

#[async_trait]
impl GeoProvider for GoogleMapsClient {
    async fn geocode(&self, address_text: &str) -> Result<Coordinates, GeoError> {
        let result = async {
            let response = self
                .client
                .get(self.request_url(address_text))
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| GeoError::Unavailable(e.without_url().to_string()))?;
            let body: GeocodeResponse = response
                .json()
                .await
                .map_err(|e| GeoError::Unavailable(format!("invalid payload: {e}")))?;
            first_candidate(address_text, body)
        }
        .await;

        if let Err(e) = &result {
            tracing::error!(query = %address_text, error = %e, "geocoding failed");
        }
        result
    }
}

//! `ViaCEP` postal-code lookup.

use async_trait::async_trait;
use reqwest::{Client, Url};
use storefinder_core::{Address, AddressError, AddressResolver, PostalCode};

use crate::error::ProviderError;
use crate::http::{build_client, endpoint_url, HttpSettings};
use crate::types::ViaCepResponse;

const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";

/// Placeholder for optional address parts the provider leaves blank.
pub const NOT_SPECIFIED: &str = "not specified";

fn unavailable(reason: impl std::fmt::Display) -> AddressError {
    AddressError::Unavailable(reason.to_string())
}

pub struct ViaCepClient {
    client: Client,
    base_url: String,
}

impl ViaCepClient {
    /// Creates a client pointed at the public `ViaCEP` service.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(http: &HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(http: &HttpSettings, base_url: &str) -> Result<Self, ProviderError> {
        // Validate once up front; per-request URLs are built from the digits only.
        endpoint_url(base_url, "00000000/json")?;
        Ok(Self {
            client: build_client(http)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn address_url(&self, postal_code: &PostalCode) -> Result<Url, AddressError> {
        endpoint_url(&self.base_url, &format!("{postal_code}/json"))
            .map_err(unavailable)
    }

    async fn fetch(&self, postal_code: &PostalCode) -> Result<ViaCepResponse, AddressError> {
        let url = self.address_url(postal_code)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(unavailable)?;
        let body = response.text().await.map_err(unavailable)?;
        serde_json::from_str(&body)
            .map_err(|e| unavailable(format!("malformed ViaCEP payload: {e}")))
    }
}

/// Maps a `ViaCEP` payload to an [`Address`].
///
/// An error flag or a missing `cep` means the code is not registered.
fn into_address(postal_code: &PostalCode, body: ViaCepResponse) -> Result<Address, AddressError> {
    if body.is_error() {
        return Err(AddressError::NotFound(postal_code.to_string()));
    }
    let Some(cep) = body.cep.filter(|c| !c.trim().is_empty()) else {
        return Err(AddressError::NotFound(postal_code.to_string()));
    };

    let required = |value: Option<String>, field: &str| {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| unavailable(format!("payload missing {field}")))
    };
    let or_not_specified = |value: Option<String>| {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    };

    Ok(Address {
        postal_code: cep.replace('-', ""),
        street: or_not_specified(body.logradouro),
        city: required(body.localidade, "localidade")?,
        state: required(body.uf, "uf")?,
        neighborhood: or_not_specified(body.bairro),
    })
}

#[async_trait]
impl AddressResolver for ViaCepClient {
    async fn resolve(&self, raw_postal_code: &str) -> Result<Address, AddressError> {
        let postal_code = PostalCode::parse(raw_postal_code)?;
        self.fetch(&postal_code)
            .await
            .and_then(|body| into_address(&postal_code, body))
            .inspect_err(|e| {
                tracing::error!(%postal_code, error = %e, "ViaCEP lookup failed");
            })
    }
}

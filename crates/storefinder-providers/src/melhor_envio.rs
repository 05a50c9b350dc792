//! Melhor Envio carrier-rate quotes.

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde_json::Value;
use storefinder_core::shipping::{business_days_label, CONTACT_US};
use storefinder_core::{PackageProfile, RateError, RateProvider, ShippingOption};

use crate::error::ProviderError;
use crate::http::{build_client, endpoint_url, HttpSettings};
use crate::types::{CalculateRequest, PostalCodeRef, QuoteOptions, QuoteProduct, RawQuote};

const DEFAULT_BASE_URL: &str = "https://melhorenvio.com.br/api/v2";

const UNKNOWN_SERVICE: &str = "unknown service";

/// Service names carrying any of these markers are never offered.
const UNAVAILABLE_MARKERS: [&str; 2] = ["unavailable", "indisponível"];

fn unavailable(reason: impl std::fmt::Display) -> RateError {
    RateError::Unavailable(reason.to_string())
}

pub struct MelhorEnvioClient {
    client: Client,
    access_token: String,
    package: PackageProfile,
    calculate_url: Url,
}

impl std::fmt::Debug for MelhorEnvioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MelhorEnvioClient")
            .field("access_token", &"[redacted]")
            .field("package", &self.package)
            .field("calculate_url", &self.calculate_url.as_str())
            .finish_non_exhaustive()
    }
}

impl MelhorEnvioClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        http: &HttpSettings,
        access_token: &str,
        package: PackageProfile,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(http, access_token, package, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        http: &HttpSettings,
        access_token: &str,
        package: PackageProfile,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(http)?,
            access_token: access_token.to_string(),
            package,
            calculate_url: endpoint_url(base_url, "me/shipment/calculate")?,
        })
    }

    fn request_body<'a>(&self, from: &'a str, to: &'a str) -> CalculateRequest<'a> {
        CalculateRequest {
            from: PostalCodeRef { postal_code: from },
            to: PostalCodeRef { postal_code: to },
            products: vec![QuoteProduct {
                id: "default",
                width: self.package.width_cm,
                height: self.package.height_cm,
                length: self.package.length_cm,
                weight: self.package.weight_kg,
                quantity: 1,
            }],
            options: QuoteOptions {
                insurance_value: 0,
                receipt: false,
                own_hand: false,
            },
        }
    }

    async fn calculate(&self, from: &str, to: &str) -> Result<Vec<RawQuote>, RateError> {
        let response = self
            .client
            .post(self.calculate_url.clone())
            .bearer_auth(&self.access_token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&self.request_body(from, to))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(unavailable)?;
        response
            .json()
            .await
            .map_err(|e| unavailable(format!("malformed quote payload: {e}")))
    }
}

/// Accepts `"23.50"` as well as `23.5`.
fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn parse_days(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn normalize(raw: RawQuote) -> ShippingOption {
    let price = raw
        .custom_price
        .as_ref()
        .filter(|v| !v.is_null())
        .or(raw.price.as_ref())
        .and_then(parse_amount)
        .unwrap_or(Decimal::ZERO);
    let delivery_time = raw
        .custom_delivery_time
        .as_ref()
        .filter(|v| !v.is_null())
        .or(raw.delivery_time.as_ref())
        .and_then(parse_days)
        .map_or_else(|| CONTACT_US.to_string(), business_days_label);

    ShippingOption {
        kind: raw.name.unwrap_or_else(|| UNKNOWN_SERVICE.to_string()),
        price,
        delivery_time,
    }
}

fn is_offerable(option: &ShippingOption) -> bool {
    let name = option.kind.to_lowercase();
    option.price > Decimal::ZERO
        && option.delivery_time != CONTACT_US
        && !UNAVAILABLE_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Normalises, filters, and sorts a calculate response, cheapest first.
#[must_use]
pub fn parse_quotes(raw: Vec<RawQuote>) -> Vec<ShippingOption> {
    let mut options: Vec<ShippingOption> = raw
        .into_iter()
        .map(normalize)
        .filter(is_offerable)
        .collect();
    options.sort_by_key(|option| option.price);
    options
}

#[async_trait]
impl RateProvider for MelhorEnvioClient {
    async fn quote(
        &self,
        origin_postal_code: &str,
        destination_postal_code: &str,
    ) -> Result<Vec<ShippingOption>, RateError> {
        let (from, to) = (origin_postal_code, destination_postal_code);
        match self.calculate(from, to).await {
            Ok(raw) => {
                let options = parse_quotes(raw);
                tracing::debug!(%from, %to, count = options.len(), "carrier quotes received");
                Ok(options)
            }
            Err(e) => {
                tracing::error!(%from, %to, error = %e, "carrier quote failed");
                Ok(Vec::new())
            }
        }
    }
}

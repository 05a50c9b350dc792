//! Wire types for the upstream provider APIs.
//!
//! Every field the providers may omit is optional here; the adapters decide
//! what an absent field means.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// ViaCEP
// ---------------------------------------------------------------------------

/// `GET /ws/{cep}/json`. Unknown codes come back as `{"erro": true}`
/// (older deployments send the string `"true"`).
#[derive(Debug, Deserialize)]
pub struct ViaCepResponse {
    #[serde(default)]
    pub erro: Option<Value>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
}

impl ViaCepResponse {
    #[must_use]
    pub fn is_error(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Google Geocoding
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeCandidate {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

// ---------------------------------------------------------------------------
// Melhor Envio
// ---------------------------------------------------------------------------

/// Body of `POST /me/shipment/calculate`.
#[derive(Debug, Serialize)]
pub struct CalculateRequest<'a> {
    pub from: PostalCodeRef<'a>,
    pub to: PostalCodeRef<'a>,
    pub products: Vec<QuoteProduct>,
    pub options: QuoteOptions,
}

#[derive(Debug, Serialize)]
pub struct PostalCodeRef<'a> {
    pub postal_code: &'a str,
}

#[derive(Debug, Serialize)]
pub struct QuoteProduct {
    pub id: &'static str,
    pub width: f64,
    pub height: f64,
    pub length: f64,
    pub weight: f64,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct QuoteOptions {
    pub insurance_value: u32,
    pub receipt: bool,
    pub own_hand: bool,
}

/// One carrier service in the calculate response.
///
/// Prices arrive as strings (`"23.50"`) or numbers depending on the service;
/// `custom_*` fields override their plain counterparts when present.
#[derive(Debug, Deserialize)]
pub struct RawQuote {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub custom_price: Option<Value>,
    #[serde(default)]
    pub delivery_time: Option<Value>,
    #[serde(default)]
    pub custom_delivery_time: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

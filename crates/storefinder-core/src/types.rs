//! Value types shared by the resolver, the provider adapters, and the API.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub postal_code: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub neighborhood: String,
}

impl Address {
    /// Free-text query handed to the geocoder.
    #[must_use]
    pub fn geocode_query(&self) -> String {
        format!("{}, {}", self.street, self.city)
    }
}

/// Decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// `PDV` is a walk-in point served by a flat-rate courier; `LOJA` is a
/// remote store served by carrier-quoted shipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoreType {
    Pdv,
    Loja,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            StoreType::Pdv => "PDV",
            StoreType::Loja => "LOJA",
        })
    }
}

impl FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PDV" => Ok(StoreType::Pdv),
            "LOJA" => Ok(StoreType::Loja),
            other => Err(format!("unknown store type '{other}'")),
        }
    }
}

/// A location from the store directory.
///
/// `store_type` is the declared type; nearby lookups always reclassify by
/// distance and ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreLocation {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(rename = "type")]
    pub store_type: StoreType,
    #[serde(flatten)]
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceResult {
    pub distance_km: f64,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub kind: String,
    pub price: Decimal,
    pub delivery_time: String,
}

/// One reachable store in a nearby lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityResult {
    pub store_id: i64,
    pub name: String,
    pub city: String,
    pub postal_code: String,
    #[serde(rename = "type")]
    pub classified_type: StoreType,
    /// Human-readable distance, e.g. `"850 m"` or `"12.4 km"`.
    pub distance: String,
    pub distance_km: f64,
    pub shipping_options: Vec<ShippingOption>,
}

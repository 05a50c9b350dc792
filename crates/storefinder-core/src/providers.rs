//! Ports to the external collaborators of the resolver.
//!
//! Implementations live in `storefinder-providers`; tests substitute
//! in-process fakes.

use async_trait::async_trait;

use crate::error::{AddressError, GeoError, RateError};
use crate::geo;
use crate::types::{Address, Coordinates, DistanceResult, ShippingOption};

/// Postal code → structured address.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Resolves a raw postal code; separators are stripped before lookup.
    async fn resolve(&self, raw_postal_code: &str) -> Result<Address, AddressError>;
}

#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Geocodes free text, taking the first candidate when several match.
    async fn geocode(&self, address_text: &str) -> Result<Coordinates, GeoError>;

    /// Distance and estimated travel time between two points.
    ///
    /// Defaults to the analytic haversine estimate.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCoordinates`] if either point is invalid.
    fn distance_and_duration(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<DistanceResult, GeoError> {
        geo::distance_and_duration(origin, destination)
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Carrier quotes between two postal codes, cheapest first.
    ///
    /// An empty list means no remote option is available.
    async fn quote(
        &self,
        origin_postal_code: &str,
        destination_postal_code: &str,
    ) -> Result<Vec<ShippingOption>, RateError>;
}

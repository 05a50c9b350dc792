//! Great-circle distance and travel-time estimate.
//!
//! Purely analytic: no routing provider is consulted, so these functions are
//! side-effect free and safe to call from any number of tasks at once.

use crate::error::GeoError;
use crate::types::{Coordinates, DistanceResult};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average courier speed used to turn distance into a duration.
pub const ESTIMATED_SPEED_KMH: f64 = 50.0;

/// Rejects non-finite or out-of-range coordinates.
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinates`] when latitude is outside ±90 or
/// longitude outside ±180.
pub fn validate(coords: Coordinates) -> Result<(), GeoError> {
    let Coordinates {
        latitude,
        longitude,
    } = coords;
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);
    if valid {
        Ok(())
    } else {
        Err(GeoError::InvalidCoordinates {
            latitude,
            longitude,
        })
    }
}

/// Haversine distance in kilometres.
#[must_use]
pub fn haversine_km(origin: Coordinates, destination: Coordinates) -> f64 {
    let d_lat = (destination.latitude - origin.latitude).to_radians();
    let d_lng = (destination.longitude - origin.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + origin.latitude.to_radians().cos()
            * destination.latitude.to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance plus a fixed-speed duration estimate in seconds.
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinates`] if either point is invalid.
pub fn distance_and_duration(
    origin: Coordinates,
    destination: Coordinates,
) -> Result<DistanceResult, GeoError> {
    validate(origin)?;
    validate(destination)?;
    let distance_km = haversine_km(origin, destination);
    Ok(DistanceResult {
        distance_km,
        duration_secs: distance_km / ESTIMATED_SPEED_KMH * 3600.0,
    })
}

//! Shipping option construction and human-readable labels.

use rust_decimal::Decimal;

use crate::types::ShippingOption;

/// Label used when no real delivery estimate exists.
pub const CONTACT_US: &str = "contact us";

/// Kind of the placeholder option for stores without a usable quote.
pub const UNAVAILABLE_KIND: &str = "unavailable";

/// Kind of the flat-rate option offered by walk-in points.
pub const LOCAL_COURIER_KIND: &str = "local courier";

const SECONDS_PER_HOUR: f64 = 3600.0;
const MAX_SAME_DAY_HOURS: f64 = 8.0;

impl ShippingOption {
    /// Placeholder shown when a remote store could not be quoted.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            kind: UNAVAILABLE_KIND.to_string(),
            price: Decimal::ZERO,
            delivery_time: CONTACT_US.to_string(),
        }
    }

    /// The single flat-rate courier option of a walk-in point.
    #[must_use]
    pub fn local_courier(price: Decimal, duration_secs: f64) -> Self {
        Self {
            kind: LOCAL_COURIER_KIND.to_string(),
            price,
            delivery_time: courier_delivery_label(duration_secs),
        }
    }
}

/// Tiered delivery label for a courier trip.
///
/// Under an hour is `"less than 1 hour"`; up to eight hours rounds up to
/// whole hours; anything longer rounds up to whole business days.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn courier_delivery_label(duration_secs: f64) -> String {
    let hours = duration_secs.max(0.0) / SECONDS_PER_HOUR;
    if hours < 1.0 {
        return "less than 1 hour".to_string();
    }
    if hours <= MAX_SAME_DAY_HOURS {
        let count = hours.ceil() as u64;
        return format!("{count} {}", if count == 1 { "hour" } else { "hours" });
    }
    business_days_label((hours / 24.0).ceil() as u64)
}

#[must_use]
pub fn business_days_label(days: u64) -> String {
    if days == 1 {
        "1 business day".to_string()
    } else {
        format!("{days} business days")
    }
}

/// `"850 m"` below one kilometre, otherwise one decimal place in km.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{} m", (distance_km.max(0.0) * 1000.0).round() as u64)
    } else {
        format!("{distance_km:.1} km")
    }
}

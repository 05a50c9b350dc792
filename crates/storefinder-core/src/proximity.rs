//! Nearby-store resolution.
//!
//! Resolves the requester's postal code to coordinates, then fans out one
//! task per directory entry to measure distance, classify the store, and
//! attach shipping options. A failure inside one store's task drops only
//! that store; a failure resolving the requester fails the whole lookup.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use rust_decimal::Decimal;

use crate::app_config::AppConfig;
use crate::cache::ResultCache;
use crate::directory::StoreDirectory;
use crate::error::ProximityError;
use crate::postal_code::PostalCode;
use crate::providers::{AddressResolver, GeoProvider, RateProvider};
use crate::shipping::format_distance;
use crate::types::{Coordinates, ProximityResult, ShippingOption, StoreLocation, StoreType};

pub const MIN_RADIUS_KM: f64 = 1.0;
pub const MAX_RADIUS_KM: f64 = 1000.0;

/// Cached value type for nearby lookups.
pub type NearbyCache = dyn ResultCache<Vec<ProximityResult>>;

#[derive(Debug, Clone, Copy)]
pub struct ProximitySettings {
    /// Radius used when the caller supplies none.
    pub default_radius_km: f64,
    /// Flat price of the walk-in courier option.
    pub pdv_shipping_price: Decimal,
    pub cache_ttl: Duration,
}

impl ProximitySettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            default_radius_km: config.pdv_radius_km,
            pdv_shipping_price: config.pdv_shipping_price,
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
        }
    }
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self {
            default_radius_km: 50.0,
            pdv_shipping_price: Decimal::new(15, 0),
            cache_ttl: Duration::from_mins(5),
        }
    }
}

/// Result of one store's task, collected positionally after the join.
#[derive(Debug)]
enum StoreOutcome {
    Resolved(ProximityResult),
    Failed { store_id: i64, reason: String },
}

#[derive(Clone)]
pub struct ProximityResolver {
    addresses: Arc<dyn AddressResolver>,
    geo: Arc<dyn GeoProvider>,
    rates: Arc<dyn RateProvider>,
    directory: Arc<dyn StoreDirectory>,
    cache: Arc<NearbyCache>,
    settings: ProximitySettings,
}

impl ProximityResolver {
    #[must_use]
    pub fn new(
        addresses: Arc<dyn AddressResolver>,
        geo: Arc<dyn GeoProvider>,
        rates: Arc<dyn RateProvider>,
        directory: Arc<dyn StoreDirectory>,
        cache: Arc<NearbyCache>,
        settings: ProximitySettings,
    ) -> Self {
        Self {
            addresses,
            geo,
            rates,
            directory,
            cache,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> ProximitySettings {
        self.settings
    }

    /// Stores near `raw_postal_code`, each classified and priced.
    ///
    /// Results follow directory order. Identical `(postal code, radius)`
    /// lookups within the cache TTL are answered without any provider call.
    ///
    /// # Errors
    ///
    /// - [`ProximityError::RadiusOutOfRange`] / [`ProximityError::InvalidPostalCode`]
    ///   before any provider is touched.
    /// - [`ProximityError::NotFound`] when the postal code or its address
    ///   cannot be located.
    /// - [`ProximityError::ProviderUnavailable`] when the address provider,
    ///   geocoder, or directory fails.
    pub async fn find_nearby(
        &self,
        raw_postal_code: &str,
        radius_km: Option<f64>,
    ) -> Result<Vec<ProximityResult>, ProximityError> {
        let radius_km = self.effective_radius(radius_km)?;
        let postal_code = PostalCode::parse(raw_postal_code)?;
        let key = cache_key(&postal_code, radius_km);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(%postal_code, radius_km, "nearby stores served from cache");
            return Ok(cached);
        }

        let origin = self.resolve_origin(&postal_code).await?;
        let stores = match self.directory.all().await {
            Ok(stores) => stores,
            Err(e) => {
                tracing::error!(error = %e, "failed to load store directory");
                return Err(e.into());
            }
        };

        let results = self
            .resolve_stores(stores, origin, &postal_code, radius_km)
            .await;

        let ttl = self.settings.cache_ttl;
        self.cache.set(&key, results.clone(), ttl);
        Ok(results)
    }

    fn effective_radius(&self, radius_km: Option<f64>) -> Result<f64, ProximityError> {
        let radius = radius_km.unwrap_or(self.settings.default_radius_km);
        if radius.is_finite() && (MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius) {
            Ok(radius)
        } else {
            Err(ProximityError::RadiusOutOfRange(radius))
        }
    }

    async fn resolve_origin(
        &self,
        postal_code: &PostalCode,
    ) -> Result<Coordinates, ProximityError> {
        let address = match self.addresses.resolve(postal_code.as_str()).await {
            Ok(address) => address,
            Err(e) => {
                tracing::error!(%postal_code, error = %e, "failed to resolve address");
                return Err(e.into());
            }
        };

        let query = address.geocode_query();
        match self.geo.geocode(&query).await {
            Ok(coords) => Ok(coords),
            Err(e) => {
                tracing::error!(%postal_code, %query, error = %e, "failed to geocode address");
                Err(e.into())
            }
        }
    }

    /// Fans out one task per store and joins them in directory order.
    async fn resolve_stores(
        &self,
        stores: Vec<StoreLocation>,
        origin: Coordinates,
        destination: &PostalCode,
        radius_km: f64,
    ) -> Vec<ProximityResult> {
        let total = stores.len();
        let store_ids: Vec<i64> = stores.iter().map(|s| s.id).collect();

        let handles = stores.into_iter().map(|store| {
            let resolver = self.clone();
            let destination = destination.clone();
            tokio::spawn(async move {
                resolver
                    .resolve_store(&store, origin, &destination, radius_km)
                    .await
            })
        });

        let outcomes = join_all(handles)
            .await
            .into_iter()
            .zip(store_ids)
            .map(|(joined, store_id)| {
                joined.unwrap_or_else(|e| StoreOutcome::Failed {
                    store_id,
                    reason: format!("store task aborted: {e}"),
                })
            });

        let mut results = Vec::with_capacity(total);
        for outcome in outcomes {
            match outcome {
                StoreOutcome::Resolved(result) => results.push(result),
                StoreOutcome::Failed { store_id, reason } => {
                    tracing::warn!(store_id, %reason, "dropping store from nearby results");
                }
            }
        }

        let omitted = total - results.len();
        if omitted > 0 {
            tracing::warn!(omitted, total, "nearby results are partial");
        }
        results
    }

    async fn resolve_store(
        &self,
        store: &StoreLocation,
        origin: Coordinates,
        destination: &PostalCode,
        radius_km: f64,
    ) -> StoreOutcome {
        let distance = match self.geo.distance_and_duration(store.coordinates, origin) {
            Ok(distance) => distance,
            Err(e) => {
                return StoreOutcome::Failed {
                    store_id: store.id,
                    reason: e.to_string(),
                };
            }
        };

        let classified_type = classify(distance.distance_km, radius_km);
        let shipping_options = match classified_type {
            StoreType::Pdv => vec![ShippingOption::local_courier(
                self.settings.pdv_shipping_price,
                distance.duration_secs,
            )],
            StoreType::Loja => self.remote_options(store, destination).await,
        };

        StoreOutcome::Resolved(ProximityResult {
            store_id: store.id,
            name: store.name.clone(),
            city: store.city.clone(),
            postal_code: store.postal_code.clone(),
            classified_type,
            distance: format_distance(distance.distance_km),
            distance_km: distance.distance_km,
            shipping_options,
        })
    }

    /// Carrier quotes for a remote store, or the unavailable placeholder.
    async fn remote_options(
        &self,
        store: &StoreLocation,
        destination: &PostalCode,
    ) -> Vec<ShippingOption> {
        let origin = &store.postal_code;
        match self.rates.quote(origin, destination.as_str()).await {
            Ok(options) => {
                let usable: Vec<ShippingOption> = options
                    .into_iter()
                    .filter(|o| !o.price.is_sign_negative())
                    .collect();
                if usable.is_empty() {
                    tracing::debug!(store_id = store.id, "no usable carrier quotes");
                    vec![ShippingOption::unavailable()]
                } else {
                    usable
                }
            }
            Err(e) => {
                tracing::error!(store_id = store.id, error = %e, "carrier quote failed");
                vec![ShippingOption::unavailable()]
            }
        }
    }
}

/// `PDV` when within the radius (inclusive), otherwise `LOJA`.
#[must_use]
pub fn classify(distance_km: f64, radius_km: f64) -> StoreType {
    if distance_km <= radius_km {
        StoreType::Pdv
    } else {
        StoreType::Loja
    }
}

fn cache_key(postal_code: &PostalCode, radius_km: f64) -> String {
    format!("stores_{postal_code}_{radius_km}")
}

#[cfg(test)]
#[path = "proximity_test.rs"]
mod tests;

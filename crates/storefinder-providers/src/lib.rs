//! HTTP adapters for the address, geocoding, and carrier-rate providers.

pub mod error;
pub mod google_maps;
mod http;
pub mod melhor_envio;
pub mod types;
pub mod viacep;

use std::sync::Arc;

use storefinder_core::{
    AppConfig, InMemoryStoreDirectory, ProximityResolver, ProximityResult, ProximitySettings,
    StoreService, TtlCache,
};

pub use error::ProviderError;
pub use google_maps::GoogleMapsClient;
pub use http::HttpSettings;
pub use melhor_envio::MelhorEnvioClient;
pub use viacep::ViaCepClient;

/// Wires the production adapters, the seeded directory, and an in-process
/// cache into a [`StoreService`].
///
/// # Errors
///
/// Returns [`ProviderError`] if an HTTP client cannot be built, a base URL
/// is invalid, or the store seed file fails to load.
pub fn build_store_service(config: &AppConfig) -> Result<StoreService, ProviderError> {
    let http = HttpSettings::from_app_config(config);

    let addresses = ViaCepClient::with_base_url(&http, &config.viacep_base_url)?;
    let geo = GoogleMapsClient::with_base_url(
        &http,
        &config.google_maps_api_key,
        &config.google_maps_base_url,
    )?;
    let rates = MelhorEnvioClient::with_base_url(
        &http,
        &config.melhor_envio_access_token,
        config.package,
        &config.melhor_envio_base_url,
    )?;
    let directory = Arc::new(InMemoryStoreDirectory::from_path(&config.stores_path)?);

    let resolver = ProximityResolver::new(
        Arc::new(addresses),
        Arc::new(geo),
        Arc::new(rates),
        directory.clone(),
        Arc::new(TtlCache::<Vec<ProximityResult>>::new()),
        ProximitySettings::from_app_config(config),
    );

    Ok(StoreService::new(directory, resolver))
}

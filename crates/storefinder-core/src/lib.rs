//! Domain model and nearby-store resolution pipeline.
//!
//! Provider adapters live in `storefinder-providers`; this crate only knows
//! them through the traits in [`providers`] and [`directory`].

pub mod app_config;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod geo;
pub mod postal_code;
pub mod providers;
pub mod proximity;
pub mod service;
pub mod shipping;
pub mod types;

pub use app_config::{AppConfig, Environment, PackageProfile};
pub use cache::{ResultCache, TtlCache};
pub use config::{load_app_config, load_app_config_from_env};
pub use directory::{load_stores, InMemoryStoreDirectory, StoreDirectory, StoresFile};
pub use error::{AddressError, ConfigError, DirectoryError, GeoError, ProximityError, RateError};
pub use postal_code::{sanitize_postal_code, PostalCode};
pub use providers::{AddressResolver, GeoProvider, RateProvider};
pub use proximity::{ProximityResolver, ProximitySettings};
pub use service::StoreService;
pub use types::{
    Address, Coordinates, DistanceResult, ProximityResult, ShippingOption, StoreLocation, StoreType,
};

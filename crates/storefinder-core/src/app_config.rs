use std::net::SocketAddr;
use std::path::PathBuf;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Package dimensions sent with every carrier quote request.
///
/// Process-wide: quotes are never computed for a specific cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackageProfile {
    pub width_cm: f64,
    pub height_cm: f64,
    pub length_cm: f64,
    pub weight_kg: f64,
}

impl Default for PackageProfile {
    fn default() -> Self {
        Self {
            width_cm: 11.0,
            height_cm: 2.0,
            length_cm: 16.0,
            weight_kg: 0.3,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub stores_path: PathBuf,
    pub pdv_radius_km: f64,
    pub pdv_shipping_price: Decimal,
    pub cache_ttl_secs: u64,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub viacep_base_url: String,
    pub google_maps_base_url: String,
    pub google_maps_api_key: String,
    pub melhor_envio_base_url: String,
    pub melhor_envio_access_token: String,
    pub package: PackageProfile,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("stores_path", &self.stores_path)
            .field("pdv_radius_km", &self.pdv_radius_km)
            .field("pdv_shipping_price", &self.pdv_shipping_price)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("viacep_base_url", &self.viacep_base_url)
            .field("google_maps_base_url", &self.google_maps_base_url)
            .field("google_maps_api_key", &"[redacted]")
            .field("melhor_envio_base_url", &self.melhor_envio_base_url)
            .field("melhor_envio_access_token", &"[redacted]")
            .field("package", &self.package)
            .finish()
    }
}

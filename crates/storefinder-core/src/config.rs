use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment, PackageProfile};
use crate::proximity::{MAX_RADIUS_KM, MIN_RADIUS_KM};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn invalid(var: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.into(),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_with = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.trim().is_empty() {
            return Err(invalid(var, "value must not be empty"));
        }
        Ok(raw.trim().to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_with(var, default)?
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = parse_with(var, default)?
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(
                var,
                format!("must be a positive number, got {value}"),
            ));
        }
        Ok(value)
    };

    let google_maps_api_key = require("GOOGLE_MAPS_API_KEY")?;
    let melhor_envio_access_token = require("MELHOR_ENVIO_ACCESS_TOKEN")?;

    let env = parse_environment(&or_default("STOREFINDER_ENV", "development"))?;

    let bind_addr = parse_with("STOREFINDER_BIND_ADDR", "0.0.0.0:3000")?
        .parse::<SocketAddr>()
        .map_err(|e| invalid("STOREFINDER_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("STOREFINDER_LOG_LEVEL", "info");
    let stores_path = or_default("STOREFINDER_STORES_PATH", "./config/stores.yaml");

    let pdv_radius_km = parse_positive_f64("STOREFINDER_PDV_RADIUS_KM", "50")?;
    if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&pdv_radius_km) {
        return Err(invalid(
            "STOREFINDER_PDV_RADIUS_KM",
            format!("must be between {MIN_RADIUS_KM} and {MAX_RADIUS_KM}, got {pdv_radius_km}"),
        ));
    }

    let raw_price = parse_with("STOREFINDER_PDV_SHIPPING_PRICE", "15.00")?;
    let pdv_shipping_price = parse_shipping_price(&raw_price)?;

    let cache_ttl_secs = parse_u64("STOREFINDER_CACHE_TTL_SECS", "300")?;
    if cache_ttl_secs == 0 {
        return Err(invalid(
            "STOREFINDER_CACHE_TTL_SECS",
            "must be greater than 0",
        ));
    }

    let http_timeout_secs = parse_u64("STOREFINDER_HTTP_TIMEOUT_SECS", "10")?;
    if http_timeout_secs == 0 {
        return Err(invalid(
            "STOREFINDER_HTTP_TIMEOUT_SECS",
            "must be greater than 0",
        ));
    }
    let user_agent = or_default("STOREFINDER_USER_AGENT", "storefinder/0.1");

    let viacep_base_url = or_default("VIACEP_BASE_URL", "https://viacep.com.br/ws");
    let google_maps_base_url = or_default(
        "GOOGLE_MAPS_BASE_URL",
        "https://maps.googleapis.com/maps/api",
    );
    let melhor_envio_base_url = or_default(
        "MELHOR_ENVIO_BASE_URL",
        "https://melhorenvio.com.br/api/v2",
    );

    let package = parse_package(parse_positive_f64)?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        stores_path: PathBuf::from(stores_path),
        pdv_radius_km,
        pdv_shipping_price,
        cache_ttl_secs,
        http_timeout_secs,
        user_agent,
        viacep_base_url,
        google_maps_base_url,
        google_maps_api_key,
        melhor_envio_base_url,
        melhor_envio_access_token,
        package,
    })
}

fn parse_shipping_price(raw: &str) -> Result<Decimal, ConfigError> {
    const VAR: &str = "STOREFINDER_PDV_SHIPPING_PRICE";
    let price = Decimal::from_str(raw)
        .map_err(|e| invalid(VAR, e.to_string()))?;
    if price.is_sign_negative() {
        return Err(invalid(VAR, "price must not be negative"));
    }
    Ok(price)
}

/// Package dimensions, each overridable and required to be positive.
fn parse_package<F>(parse_positive_f64: F) -> Result<PackageProfile, ConfigError>
where
    F: Fn(&str, &str) -> Result<f64, ConfigError>,
{
    let defaults = PackageProfile::default();
    let dimension = |var: &str, default: f64| parse_positive_f64(var, &default.to_string());
    Ok(PackageProfile {
        width_cm: dimension("STOREFINDER_PACKAGE_WIDTH_CM", defaults.width_cm)?,
        height_cm: dimension("STOREFINDER_PACKAGE_HEIGHT_CM", defaults.height_cm)?,
        length_cm: dimension("STOREFINDER_PACKAGE_LENGTH_CM", defaults.length_cm)?,
        weight_kg: dimension("STOREFINDER_PACKAGE_WEIGHT_KG", defaults.weight_kg)?,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(invalid(
            "STOREFINDER_ENV",
            format!("expected development, test, or production, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;
use std::env::VarError;

use rust_decimal::Decimal;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Name of the rejected variable when `result` is an `InvalidEnvVar` error.
fn invalid_var(result: &Result<AppConfig, ConfigError>) -> Option<&str> {
    match result {
        Err(ConfigError::InvalidEnvVar { var, .. }) => Some(var.as_str()),
        _ => None,
    }
}

fn missing_var(result: &Result<AppConfig, ConfigError>) -> Option<&str> {
    match result {
        Err(ConfigError::MissingEnvVar(var)) => Some(var.as_str()),
        _ => None,
    }
}

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GOOGLE_MAPS_API_KEY", "maps-key");
    m.insert("MELHOR_ENVIO_ACCESS_TOKEN", "me-token");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    match parse_environment("producton").unwrap_err() {
        ConfigError::InvalidEnvVar { var, .. } => assert_eq!(var, "STOREFINDER_ENV"),
        other => panic!("expected InvalidEnvVar, got {other:?}"),
    }
}

#[test]
fn build_app_config_fails_without_google_maps_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        missing_var(&result),
        Some("GOOGLE_MAPS_API_KEY"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_melhor_envio_token() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("GOOGLE_MAPS_API_KEY", "maps-key");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        missing_var(&result),
        Some("MELHOR_ENVIO_ACCESS_TOKEN"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.stores_path.to_string_lossy(), "./config/stores.yaml");
    assert!((cfg.pdv_radius_km - 50.0).abs() < f64::EPSILON);
    assert_eq!(cfg.pdv_shipping_price, Decimal::new(15, 0));
    assert_eq!(cfg.cache_ttl_secs, 300);
    assert_eq!(cfg.http_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "storefinder/0.1");
    assert_eq!(cfg.viacep_base_url, "https://viacep.com.br/ws");
    assert_eq!(
        cfg.melhor_envio_base_url,
        "https://melhorenvio.com.br/api/v2"
    );
    assert_eq!(cfg.package, PackageProfile::default());
}

#[test]
fn debug_output_redacts_secrets() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("maps-key"));
    assert!(!rendered.contains("me-token"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("STOREFINDER_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("STOREFINDER_BIND_ADDR"),
        "got: {result:?}"
    );
}

#[test]
fn pdv_radius_override_is_applied() {
    let mut map = full_env();
    map.insert("STOREFINDER_PDV_RADIUS_KM", "120");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert!((cfg.pdv_radius_km - 120.0).abs() < f64::EPSILON);
}

#[test]
fn pdv_radius_outside_bounds_fails() {
    for raw in ["0", "1001", "-5", "nan"] {
        let mut map = full_env();
        map.insert("STOREFINDER_PDV_RADIUS_KM", raw);
        let result = build_app_config(lookup_from_map(&map));
        assert_eq!(
            invalid_var(&result),
            Some("STOREFINDER_PDV_RADIUS_KM"),
            "radius {raw} should be rejected, got: {result:?}"
        );
    }
}

#[test]
fn pdv_shipping_price_override_is_parsed_as_decimal() {
    let mut map = full_env();
    map.insert("STOREFINDER_PDV_SHIPPING_PRICE", "9.90");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(cfg.pdv_shipping_price, Decimal::new(990, 2));
}

#[test]
fn negative_pdv_shipping_price_fails() {
    let mut map = full_env();
    map.insert("STOREFINDER_PDV_SHIPPING_PRICE", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("STOREFINDER_PDV_SHIPPING_PRICE"),
        "got: {result:?}"
    );
}

#[test]
fn zero_cache_ttl_fails() {
    let mut map = full_env();
    map.insert("STOREFINDER_CACHE_TTL_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("STOREFINDER_CACHE_TTL_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn http_timeout_invalid_fails() {
    let mut map = full_env();
    map.insert("STOREFINDER_HTTP_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("STOREFINDER_HTTP_TIMEOUT_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn zero_http_timeout_fails() {
    let mut map = full_env();
    map.insert("STOREFINDER_HTTP_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("STOREFINDER_HTTP_TIMEOUT_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn package_profile_overrides_are_applied() {
    let mut map = full_env();
    map.insert("STOREFINDER_PACKAGE_WIDTH_CM", "20");
    map.insert("STOREFINDER_PACKAGE_WEIGHT_KG", "1.5");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert!((cfg.package.width_cm - 20.0).abs() < f64::EPSILON);
    assert!((cfg.package.weight_kg - 1.5).abs() < f64::EPSILON);
    assert!((cfg.package.height_cm - 2.0).abs() < f64::EPSILON);
}

#[test]
fn zero_package_weight_fails() {
    let mut map = full_env();
    map.insert("STOREFINDER_PACKAGE_WEIGHT_KG", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("STOREFINDER_PACKAGE_WEIGHT_KG"),
        "got: {result:?}"
    );
}

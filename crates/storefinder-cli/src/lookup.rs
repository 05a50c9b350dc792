//! Command handlers for the CLI.
//!
//! Results go to stdout, one line per store; logs go to stderr.

use rust_decimal::Decimal;
use storefinder_core::{ProximityResult, ShippingOption, StoreLocation, StoreService, StoreType};

/// Runs a nearby lookup and prints one line per reachable store.
///
/// # Errors
///
/// Returns an error when the lookup itself fails (invalid input, unknown
/// postal code, or an unavailable address/geocoding provider).
pub(crate) async fn run_nearby(
    service: &StoreService,
    cep: &str,
    radius_km: Option<f64>,
    only: Option<StoreType>,
) -> anyhow::Result<()> {
    let results = service.find_nearby(cep, radius_km, only).await?;
    if results.is_empty() {
        println!("no stores found near {cep}");
        return Ok(());
    }
    for result in &results {
        println!("{}", format_nearby_line(result));
    }
    Ok(())
}

/// Lists the directory, optionally restricted to one state.
///
/// # Errors
///
/// Returns an error if the store directory cannot be read.
pub(crate) async fn run_stores(service: &StoreService, state: Option<&str>) -> anyhow::Result<()> {
    let stores = match state {
        Some(uf) => service.find_by_state(uf).await?,
        None => service.list_all().await?,
    };
    for store in &stores {
        println!("{}", format_store_line(store));
    }
    println!("{} store(s)", stores.len());
    Ok(())
}

fn format_price(price: Decimal) -> String {
    format!("R$ {price:.2}")
}

fn format_option(option: &ShippingOption) -> String {
    format!(
        "{} {} ({})",
        option.kind,
        format_price(option.price),
        option.delivery_time
    )
}

pub(crate) fn format_nearby_line(result: &ProximityResult) -> String {
    let options: Vec<String> = result.shipping_options.iter().map(format_option).collect();
    format!(
        "#{:<3} {:<4} {:>9}  {} ({}, {})  {}",
        result.store_id,
        result.classified_type,
        result.distance,
        result.name,
        result.city,
        result.postal_code,
        options.join(" | ")
    )
}

pub(crate) fn format_store_line(store: &StoreLocation) -> String {
    format!(
        "#{:<3} {:<4} {}  {}/{}  {}",
        store.id, store.store_type, store.name, store.city, store.state, store.postal_code
    )
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use rust_decimal::Decimal;
use storefinder_core::{
    Address, AddressError, AddressResolver, Coordinates, GeoError, GeoProvider,
    InMemoryStoreDirectory, ProximityResolver, ProximityResult, ProximitySettings, RateError,
    RateProvider, ShippingOption, StoreLocation, StoreType, TtlCache,
};
use tower::ServiceExt;

use super::*;

// -------------------------------------------------------------------------
// Fakes
// -------------------------------------------------------------------------

struct FakeAddresses {
    calls: AtomicUsize,
}

#[async_trait]
impl AddressResolver for FakeAddresses {
    async fn resolve(&self, raw_postal_code: &str) -> Result<Address, AddressError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let code = storefinder_core::PostalCode::parse(raw_postal_code)?;
        match code.as_str() {
            "99999999" => Err(AddressError::NotFound(code.to_string())),
            "55555555" => Err(AddressError::Unavailable("connection reset".to_string())),
            _ => Ok(Address {
                postal_code: code.to_string(),
                street: "Praça da Sé".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                neighborhood: "Sé".to_string(),
            }),
        }
    }
}

struct FakeGeo;

#[async_trait]
impl GeoProvider for FakeGeo {
    async fn geocode(&self, _address_text: &str) -> Result<Coordinates, GeoError> {
        Ok(Coordinates {
            latitude: -23.55052,
            longitude: -46.633_309,
        })
    }
}

struct FakeRates;

#[async_trait]
impl RateProvider for FakeRates {
    async fn quote(&self, _from: &str, _to: &str) -> Result<Vec<ShippingOption>, RateError> {
        Ok(vec![ShippingOption {
            kind: "PAC".to_string(),
            price: Decimal::new(3590, 2),
            delivery_time: "6 business days".to_string(),
        }])
    }
}

fn store(id: i64, name: &str, state: &str, postal_code: &str, at: (f64, f64)) -> StoreLocation {
    let (latitude, longitude) = at;
    StoreLocation {
        id,
        name: name.to_string(),
        city: name.to_string(),
        state: state.to_string(),
        postal_code: postal_code.to_string(),
        store_type: StoreType::Loja,
        coordinates: Coordinates {
            latitude,
            longitude,
        },
    }
}

struct TestApp {
    app: Router,
    address_calls: Arc<FakeAddresses>,
}

fn test_app_with_limit(rate_limit: RateLimitState) -> TestApp {
    let directory = Arc::new(InMemoryStoreDirectory::new(vec![
        store(1, "Sé", "SP", "01001000", (-23.5325, -46.633_309)),
        store(2, "Recife", "PE", "50030170", (-8.0631, -34.8711)),
    ]));
    let addresses = Arc::new(FakeAddresses {
        calls: AtomicUsize::new(0),
    });
    let resolver = ProximityResolver::new(
        addresses.clone(),
        Arc::new(FakeGeo),
        Arc::new(FakeRates),
        directory.clone(),
        Arc::new(TtlCache::<Vec<ProximityResult>>::new()),
        ProximitySettings::default(),
    );
    let service = StoreService::new(directory, resolver);
    TestApp {
        app: build_app(AppState { service }, rate_limit),
        address_calls: addresses,
    }
}

fn test_app() -> TestApp {
    test_app_with_limit(default_rate_limit_state())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, json)
}

// -------------------------------------------------------------------------
// Envelope
// -------------------------------------------------------------------------

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("provider_unavailable", StatusCode::BAD_GATEWAY),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, expected) in cases {
        let response = ApiError::new("req-1", code, "boom").into_response();
        assert_eq!(response.status(), expected, "code {code}");
    }
}

#[test]
fn proximity_errors_map_to_api_codes() {
    let cases = [
        (ProximityError::InvalidPostalCode("1".into()), "validation_error"),
        (ProximityError::RadiusOutOfRange(0.0), "validation_error"),
        (ProximityError::NotFound("x".into()), "not_found"),
        (ProximityError::ProviderUnavailable("x".into()), "provider_unavailable"),
    ];
    for (err, expected) in cases {
        let mapped = map_proximity_error("r".into(), &err);
        assert_eq!(mapped.error.code, expected, "error {err}");
    }
}

// -------------------------------------------------------------------------
// Routes
// -------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_store_count() {
    let (status, json) = get_json(test_app().app, "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["stores"], 2);
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn request_id_is_echoed() {
    let response = test_app()
        .app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
}

#[tokio::test]
async fn list_stores_returns_directory() {
    let (status, json) = get_json(test_app().app, "/api/v1/stores").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["type"], "LOJA");
    assert_eq!(data[1]["postal_code"], "50030170");
}

#[tokio::test]
async fn get_store_returns_404_for_unknown_id() {
    let (status, json) = get_json(test_app().app, "/api/v1/stores/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn get_store_rejects_non_numeric_id() {
    let (status, json) = get_json(test_app().app, "/api/v1/stores/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn stores_by_state_is_case_insensitive() {
    let (status, json) = get_json(test_app().app, "/api/v1/stores/state/pe").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], 2);
}

#[tokio::test]
async fn nearby_classifies_and_prices_stores() {
    let (status, json) = get_json(test_app().app, "/api/v1/stores/nearby?cep=01001-000").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 2);

    assert_eq!(data[0]["store_id"], 1);
    assert_eq!(data[0]["type"], "PDV");
    assert_eq!(data[0]["shipping_options"][0]["kind"], "local courier");

    assert_eq!(data[1]["store_id"], 2);
    assert_eq!(data[1]["type"], "LOJA");
    assert_eq!(data[1]["shipping_options"][0]["kind"], "PAC");
}

#[tokio::test]
async fn nearby_type_filter_keeps_one_class() {
    let uri = "/api/v1/stores/nearby?cep=01001000&type=loja";
    let (status, json) = get_json(test_app().app, uri).await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["type"], "LOJA");
}

#[tokio::test]
async fn nearby_rejects_unknown_type() {
    let uri = "/api/v1/stores/nearby?cep=01001000&type=KIOSK";
    let (status, json) = get_json(test_app().app, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn nearby_requires_cep() {
    let (status, json) = get_json(test_app().app, "/api/v1/stores/nearby").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["message"], "cep is required");
}

#[tokio::test]
async fn nearby_rejects_non_numeric_radius() {
    let uri = "/api/v1/stores/nearby?cep=01001000&radius=far";
    let (status, json) = get_json(test_app().app, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn nearby_rejects_out_of_range_radius_without_provider_calls() {
    let harness = test_app();
    let uri = "/api/v1/stores/nearby?cep=01001000&radius=5000";
    let (status, json) = get_json(harness.app, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(harness.address_calls.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn nearby_maps_unknown_postal_code_to_404() {
    let (status, json) = get_json(test_app().app, "/api/v1/stores/nearby?cep=99999-999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn nearby_maps_provider_outage_to_502() {
    let (status, json) = get_json(test_app().app, "/api/v1/stores/nearby?cep=55555555").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"]["code"], "provider_unavailable");
}

#[tokio::test]
async fn rate_limit_rejects_after_budget() {
    let harness = test_app_with_limit(RateLimitState::new(1, Duration::from_mins(1)));

    let (first, _) = get_json(harness.app.clone(), "/api/v1/stores").await;
    assert_eq!(first, StatusCode::OK);

    let (second, json) = get_json(harness.app.clone(), "/api/v1/stores").await;
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["error"]["code"], "rate_limited");
    assert!(json["meta"]["request_id"].is_string());

    let (health, _) = get_json(harness.app, "/api/v1/health").await;
    assert_eq!(health, StatusCode::OK);
}

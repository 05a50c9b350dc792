use std::str::FromStr;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use storefinder_core::{ProximityResult, StoreLocation, StoreType};

use crate::middleware::RequestId;

use super::{
    map_directory_error, map_proximity_error, ApiError, ApiResponse, AppState, ResponseMeta,
};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyParams {
    pub cep: Option<String>,
    pub radius: Option<f64>,
    #[serde(rename = "type")]
    pub store_type: Option<String>,
}

fn validation_error(req_id: &RequestId, message: impl Into<String>) -> ApiError {
    ApiError::new(req_id.0.clone(), "validation_error", message)
}

pub(super) async fn list_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<StoreLocation>>>, ApiError> {
    let data = state
        .service
        .list_all()
        .await
        .map_err(|e| map_directory_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<StoreLocation>>, ApiError> {
    let id: i64 = raw_id.parse().map_err(|_| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!("store id must be an integer, got \"{raw_id}\""),
        )
    })?;

    let store = state
        .service
        .find_by_id(id)
        .await
        .map_err(|e| map_directory_error(req_id.0.clone(), &e))?;
    let Some(store) = store else {
        let message = format!("store {id} not found");
        return Err(ApiError::new(req_id.0, "not_found", message));
    };

    Ok(Json(ApiResponse {
        data: store,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_stores_by_state(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(uf): Path<String>,
) -> Result<Json<ApiResponse<Vec<StoreLocation>>>, ApiError> {
    let uf = uf.trim();
    if uf.len() != 2 || !uf.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "state must be a two-letter code",
        ));
    }

    let data = state
        .service
        .find_by_state(uf)
        .await
        .map_err(|e| map_directory_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn find_nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<NearbyParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ProximityResult>>>, ApiError> {
    let Query(params) = match params {
        Ok(query) => query,
        Err(e) => return Err(validation_error(&req_id, e.body_text())),
    };

    let cep = params
        .cep
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| validation_error(&req_id, "cep is required"))?;

    let only = params
        .store_type
        .as_deref()
        .map(StoreType::from_str)
        .transpose()
        .map_err(|e| validation_error(&req_id, e))?;

    let data = state
        .service
        .find_nearby(&cep, params.radius, only)
        .await
        .map_err(|e| map_proximity_error(req_id.0.clone(), &e))?;

    tracing::info!(
        request_id = %req_id.0,
        postal_code = %cep,
        count = data.len(),
        "nearby lookup served"
    );

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::info;

use crate::{
    error::AppResult,
    extract::{Json, Query},
    models::{ProductIdQuery, ProductInput, ProductPatch},
    AppState,
};

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductInput>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let product = state.store.insert(payload).await?;

    info!(id = %product.id, name = ?product.product_name, "Created product");

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Product Saved successfully",
            "product": product,
        })),
    ))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Query(query): Query<ProductIdQuery>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let product = state.store.fetch(&query.id).await?;

    info!(id = %product.id, "Fetched product");

    Ok((StatusCode::OK, Json(json!(product))))
}

// ── Full update ───────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductInput>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let product = state.store.replace(&id, payload).await?;

    info!(id = %id, "Replaced product");

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "product update successfully",
            "data": product,
        })),
    ))
}

// ── Partial update ────────────────────────────────────────────────────────────

pub async fn partial_update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let product = state.store.patch(&id, patch).await?;

    info!(id = %id, "Patched product");

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "product update successfully",
            "product": product,
        })),
    ))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Query(query): Query<ProductIdQuery>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let product = state.store.remove(&query.id).await?;

    info!(id = %product.id, "Deleted product");

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "product deleted successfully",
            "product": product,
        })),
    ))
}

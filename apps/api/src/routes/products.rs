//! `/products` endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use stockroom_core::{NewProduct, Page, Product};
use tracing::info;

use super::deleted;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product).delete(delete_product))
}

async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(payload) = payload?;
    let product = state.db.products().create(&payload).await?;

    info!(
        id = %product.id,
        vendor_id = %product.vendor_id,
        quantity = %product.quantity,
        "Product created"
    );
    Ok(Json(product))
}

async fn list_products(
    State(state): State<AppState>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(page) = page?;
    Ok(Json(state.db.products().list(page).await?))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    state
        .db
        .products()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.db.products().delete(id).await? {
        return Err(ApiError::not_found("Product", id));
    }

    info!(id = %id, "Product deleted");
    Ok(deleted("Product"))
}

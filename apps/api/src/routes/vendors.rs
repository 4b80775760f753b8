//! `/vendors` endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use stockroom_core::{NewVendor, Page, Vendor};
use tracing::info;

use super::deleted;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vendors", get(list_vendors).post(create_vendor))
        .route("/vendors/", get(list_vendors).post(create_vendor))
        .route("/vendors/{id}", get(get_vendor).delete(delete_vendor))
}

async fn create_vendor(
    State(state): State<AppState>,
    payload: Result<Json<NewVendor>, JsonRejection>,
) -> Result<Json<Vendor>, ApiError> {
    let Json(payload) = payload?;
    let vendor = state.db.vendors().create(&payload).await?;

    info!(id = %vendor.id, name = %vendor.name, "Vendor created");
    Ok(Json(vendor))
}

async fn list_vendors(
    State(state): State<AppState>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<Vendor>>, ApiError> {
    let Query(page) = page?;
    Ok(Json(state.db.vendors().list(page).await?))
}

async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vendor>, ApiError> {
    state
        .db
        .vendors()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Vendor", id))
}

async fn delete_vendor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.db.vendors().delete(id).await? {
        return Err(ApiError::not_found("Vendor", id));
    }

    info!(id = %id, "Vendor deleted");
    Ok(deleted("Vendor"))
}

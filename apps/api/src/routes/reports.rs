//! `/reports` endpoints.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use stockroom_core::{Product, DEFAULT_LOW_STOCK_THRESHOLD};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/reports/low-stock", get(low_stock))
}

#[derive(Debug, Deserialize)]
struct LowStockQuery {
    #[serde(default = "default_threshold")]
    threshold: i64,
}

fn default_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

/// Products with quantity strictly below `threshold` (default 10).
async fn low_stock(
    State(state): State<AppState>,
    query: Result<Query<LowStockQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(query) = query?;
    let products = state.db.products().list_low_stock(query.threshold).await?;

    debug!(threshold = %query.threshold, count = products.len(), "Low-stock report");
    Ok(Json(products))
}

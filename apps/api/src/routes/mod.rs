//! HTTP routes.
//!
//! Each module owns the paths of one resource and returns a
//! `Router<AppState>`; [`router`] merges them.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub mod products;
pub mod reports;
pub mod system;
pub mod transactions;
pub mod vendors;

/// Router for every endpoint, before state is attached.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(vendors::router())
        .merge(products::router())
        .merge(transactions::router())
        .merge(reports::router())
        .merge(system::router(max_upload_bytes))
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Inventory Management System is running" }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        tracing::warn!("Health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}

/// Body for a successful delete.
pub(crate) fn deleted(kind: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": format!("{kind} deleted successfully") }))
}

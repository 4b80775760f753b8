//! `/transactions` endpoints: the stock ledger.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use stockroom_core::{NewTransaction, Page, Transaction};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/", get(list_transactions).post(create_transaction))
        .route("/transactions/{id}", get(get_transaction))
}

/// Records a stock movement. An unknown product is a 400.
async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<Json<Transaction>, ApiError> {
    let Json(payload) = payload?;
    Ok(Json(state.db.transactions().record(&payload).await?))
}

async fn list_transactions(
    State(state): State<AppState>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let Query(page) = page?;
    Ok(Json(state.db.transactions().list(page).await?))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, ApiError> {
    state
        .db
        .transactions()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Transaction", id))
}

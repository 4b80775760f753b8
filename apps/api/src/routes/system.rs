//! `/system` endpoints: backup and restore.
//!
//! ```text
//! GET  /system/backup   ──► BackupDocument (JSON)
//! POST /system/restore  ──► multipart field "file" holding a BackupDocument
//!                           └─► { "message": ..., "summary": RestoreSummary }
//! ```

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use stockroom_core::backup::RestoreDocument;
use stockroom_core::BackupDocument;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the uploaded document.
const UPLOAD_FIELD: &str = "file";

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/system/backup", get(backup))
        .route(
            "/system/restore",
            post(restore).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

async fn backup(State(state): State<AppState>) -> Result<Json<BackupDocument>, ApiError> {
    Ok(Json(state.db.backups().export().await?))
}

async fn restore(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::validation(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::restore_failed(e.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::restore_failed(e.body_text()))?;
            upload = Some(bytes);
            break;
        }
    }

    let bytes = upload.ok_or_else(|| {
        ApiError::validation(format!("multipart field '{UPLOAD_FIELD}' is required"))
    })?;

    info!(bytes = bytes.len(), "Restore upload received");

    let document = RestoreDocument::from_json_slice(&bytes).map_err(ApiError::restore_failed)?;
    let summary = state.db.backups().restore(&document).await?;

    Ok(Json(json!({
        "message": "Data restored successfully",
        "summary": summary,
    })))
}

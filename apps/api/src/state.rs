//! Shared application state handed to every handler through axum `State`.

use stockroom_db::Database;

#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,

    /// Body limit for `POST /system/restore`.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db: Database, max_upload_bytes: usize) -> Self {
        AppState {
            db,
            max_upload_bytes,
        }
    }
}

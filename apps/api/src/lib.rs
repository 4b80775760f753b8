//! # Stockroom API
//!
//! HTTP service over the Stockroom inventory store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom API Server                             │
//! │                                                                         │
//! │  Dashboard ───► HTTP (8000) ───► routes/* ───► stockroom-db ───► SQLite │
//! │                                     │                                   │
//! │                                     └──► ApiError { code, message }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path                   | Purpose                         |
//! |--------|------------------------|---------------------------------|
//! | GET    | `/`                    | Banner                          |
//! | GET    | `/health`              | Store health check              |
//! | POST   | `/vendors/`            | Create vendor                   |
//! | GET    | `/vendors/`            | List vendors (`skip`, `limit`)  |
//! | GET    | `/vendors/{id}`        | Get vendor                      |
//! | DELETE | `/vendors/{id}`        | Delete vendor                   |
//! | POST   | `/products/`           | Create product                  |
//! | GET    | `/products/`           | List products                   |
//! | GET    | `/products/{id}`       | Get product                     |
//! | DELETE | `/products/{id}`       | Delete product                  |
//! | POST   | `/transactions/`       | Record stock movement           |
//! | GET    | `/transactions/`       | List transactions               |
//! | GET    | `/transactions/{id}`   | Get transaction                 |
//! | GET    | `/reports/low-stock`   | Products below `threshold`      |
//! | GET    | `/system/backup`       | Full JSON export                |
//! | POST   | `/system/restore`      | Multipart JSON import (`file`)  |

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Builds the application router with state attached.
pub fn build_app(state: AppState) -> Router {
    routes::router(state.max_upload_bytes).with_state(state)
}

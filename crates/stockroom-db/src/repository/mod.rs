//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.transactions().record(&new_tx)                             │
//! │       ▼                                                                 │
//! │  TransactionRepository                                                 │
//! │  ├── record(&self, request)      BEGIN → plan → INSERT → UPDATE       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── list(&self, page)                                                 │
//! │       │                                                                 │
//! │       │  SQL (runtime-checked) + explicit row mapping (rows.rs)        │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`VendorRepository`](vendor::VendorRepository) - Vendor CRUD
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and low-stock report
//! - [`TransactionRepository`](transaction::TransactionRepository) - Stock ledger
//! - [`BackupRepository`](backup::BackupRepository) - Full export and id-preserving restore
//!
//! ## Write Transactions
//! Every read-then-write transaction opens with `BEGIN IMMEDIATE` through
//! [`begin_write`]. A plain deferred `BEGIN` takes a read lock first and
//! fails with `SQLITE_BUSY` when it later upgrades while another connection
//! writes; the busy timeout only applies while waiting to begin.

pub mod backup;
pub mod product;
pub mod transaction;
pub mod vendor;

mod rows;

use sqlx::{Sqlite, SqlitePool, Transaction as SqlTransaction};
use stockroom_core::Page;

use crate::error::DbResult;

/// LIMIT/OFFSET binds for a page.
pub(crate) fn page_bounds(page: Page) -> (i64, i64) {
    (i64::from(page.limit), i64::from(page.skip))
}

/// Opens a transaction holding the write lock from its first statement.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<SqlTransaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

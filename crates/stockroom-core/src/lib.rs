//! # stockroom-core: Pure Domain Logic for Stockroom
//!
//! This crate holds the inventory domain as pure functions and plain types
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (external)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    /vendors, /products, /transactions, /reports, /system       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │  backup   │  │   │
//! │  │   │  Vendor   │  │   Money   │  │ StockPlan │  │  Document │  │   │
//! │  │   │  Product  │  │           │  │           │  │  Records  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (Database Layer)                   │   │
//! │  │         SQLite queries, migrations, repositories, restore       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Vendor, Product, Transaction) and their inputs
//! - [`money`] - Money type: integer cents inside, decimals on the wire
//! - [`ledger`] - Stock adjustment planning (cost, resulting quantity)
//! - [`backup`] - Backup document shape and restore records
//! - [`timestamp`] - The fixed textual date-time format
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price = Money::from_cents(999); // $9.99
//! let sale = price.checked_multiply_quantity(-3).unwrap();
//!
//! assert_eq!(sale.cents(), -2997);
//! assert_eq!(sale.to_string(), "-$29.97");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod error;
pub mod ledger;
pub mod money;
pub mod timestamp;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use backup::{BackupDocument, RestoreSummary};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::StockPlan;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default page size for list operations.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Default threshold for the low-stock report.
///
/// Products with a quantity strictly below this value are reported.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

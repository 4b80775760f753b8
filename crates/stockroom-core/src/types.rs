//! # Domain Types
//!
//! Entities persisted by the store and the inputs that create them.
//!
//! ## Type Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Vendor      │   │     Product     │   │   Transaction   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  vendor_id (FK) │◄──│  product_id(FK) │       │
//! │  │  name           │   │  name           │   │  vendor_id (FK) │──┐    │
//! │  │  contact_email  │   │  price          │   │  quantity (±)   │  │    │
//! │  │  phone          │   │  quantity       │   │  total_cost     │  │    │
//! │  └────────▲────────┘   └─────────────────┘   │  timestamp      │  │    │
//! │           │                                   └─────────────────┘  │    │
//! │           └─────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Relationships are plain id fields. Nothing here holds a pointer to a
//! related entity; look it up by id through the store.
//!
//! Money fields are [`Money`] (integer cents) in Rust and decimal numbers in
//! JSON: `"price": 9.99`, `"total_cost": -29.97`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::timestamp::StoredTimestamp;

// =============================================================================
// Vendor
// =============================================================================

/// A supplier that owns products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub contact_email: String,
    pub phone: String,
}

/// Payload for creating a vendor.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewVendor {
    pub name: String,
    pub contact_email: String,
    pub phone: String,
}

// =============================================================================
// Product
// =============================================================================

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name.
    pub name: String,

    pub description: Option<String>,

    /// Unit price (never negative).
    #[ts(type = "number")]
    pub price: Money,

    /// Units on hand (never negative after a ledger operation).
    pub quantity: i64,

    /// Owning vendor.
    pub vendor_id: i64,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[ts(type = "number")]
    pub price: Money,
    #[serde(default)]
    pub quantity: i64,
    pub vendor_id: i64,
}

// =============================================================================
// Transaction
// =============================================================================

/// A recorded stock movement.
///
/// ## Snapshot Pattern
/// `total_cost` is the product price at the moment of recording times the
/// delta. It never changes afterwards, even if the product is repriced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub id: i64,
    pub product_id: i64,

    /// Copy of the product's vendor at creation time.
    pub vendor_id: i64,

    /// Signed delta: positive restocks, negative sells.
    pub quantity: i64,

    #[ts(type = "number")]
    pub total_cost: Money,

    #[ts(as = "String")]
    pub timestamp: StoredTimestamp,
}

/// Payload for recording a transaction.
///
/// `vendor_id` may be omitted; the ledger fills it from the product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTransaction {
    pub product_id: i64,
    #[serde(default)]
    pub vendor_id: Option<i64>,
    pub quantity: i64,
}

// =============================================================================
// Pagination
// =============================================================================

/// Skip/limit window over insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    crate::DEFAULT_PAGE_LIMIT
}

impl Page {
    pub const fn new(skip: u32, limit: u32) -> Self {
        Page { skip, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new(0, crate::DEFAULT_PAGE_LIMIT)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

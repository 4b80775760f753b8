//! # Stock Ledger Planning
//!
//! Pure half of the ledger operation: given the product as currently stored
//! and a requested delta, decide what will be written.
//!
//! ## Ledger Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Recording a Transaction                              │
//! │                                                                         │
//! │  stockroom-db (inside one SQLite transaction)                          │
//! │  ├── 1. SELECT product ─────────── absent? → ProductNotFound           │
//! │  │                                                                      │
//! │  ├── 2. plan_stock_adjustment() ← THIS MODULE                          │
//! │  │       ├── delta == 0?          → Validation error                   │
//! │  │       ├── vendor mismatch?     → VendorMismatch                     │
//! │  │       ├── total_cost = price × delta                                │
//! │  │       └── quantity + delta < 0 → InsufficientStock                  │
//! │  │                                                                      │
//! │  ├── 3. INSERT transaction (total_cost, timestamp)                     │
//! │  ├── 4. UPDATE product quantity = quantity + delta                     │
//! │  └── 5. COMMIT (all or nothing)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use stockroom_core::ledger::plan_stock_adjustment;
//! use stockroom_core::{Money, NewTransaction, Product};
//!
//! let product = Product {
//!     id: 1,
//!     name: "Widget".into(),
//!     description: None,
//!     price: Money::from_cents(999),
//!     quantity: 5,
//!     vendor_id: 2,
//! };
//! let request = NewTransaction { product_id: 1, vendor_id: None, quantity: -3 };
//!
//! let plan = plan_stock_adjustment(&product, &request).unwrap();
//! assert_eq!(plan.quantity_after, 2);
//! assert_eq!(plan.total_cost.cents(), -2997);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{NewTransaction, Product};
use crate::validation::validate_quantity_delta;

/// What a ledger operation will persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPlan {
    pub product_id: i64,
    pub vendor_id: i64,

    /// Signed delta to record and apply.
    pub quantity: i64,

    /// Unit price at the time of planning.
    pub unit_price: Money,

    /// `unit_price × quantity`, frozen into the transaction row.
    pub total_cost: Money,

    pub quantity_before: i64,
    pub quantity_after: i64,
}

/// Plans a stock adjustment against the product as currently stored.
///
/// ## Errors
/// - [`CoreError::Validation`] when the delta is zero
/// - [`CoreError::VendorMismatch`] when the request names another vendor
/// - [`CoreError::InsufficientStock`] when the result would be negative
/// - [`CoreError::Overflow`] when cost or quantity leave the i64 range
pub fn plan_stock_adjustment(product: &Product, request: &NewTransaction) -> CoreResult<StockPlan> {
    validate_quantity_delta(request.quantity)?;

    let vendor_id = match request.vendor_id {
        Some(supplied) if supplied != product.vendor_id => {
            return Err(CoreError::VendorMismatch {
                product_id: product.id,
                expected: product.vendor_id,
                supplied,
            });
        }
        _ => product.vendor_id,
    };

    let unit_price = product.price;
    let total_cost = unit_price
        .checked_multiply_quantity(request.quantity)
        .ok_or(CoreError::Overflow("total cost"))?;

    let quantity_after = product
        .quantity
        .checked_add(request.quantity)
        .ok_or(CoreError::Overflow("quantity"))?;

    if quantity_after < 0 {
        return Err(CoreError::InsufficientStock {
            product_id: product.id,
            available: product.quantity,
            requested: request.quantity.saturating_neg(),
        });
    }

    Ok(StockPlan {
        product_id: product.id,
        vendor_id,
        quantity: request.quantity,
        unit_price,
        total_cost,
        quantity_before: product.quantity,
        quantity_after,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(quantity: i64) -> Product {
        Product {
            id: 7,
            name: "Widget".to_string(),
            description: Some("Blue".to_string()),
            price: Money::from_cents(999),
            quantity,
            vendor_id: 2,
        }
    }

    fn request(quantity: i64) -> NewTransaction {
        NewTransaction {
            product_id: 7,
            vendor_id: None,
            quantity,
        }
    }

    #[test]
    fn test_sale_reduces_quantity_and_cost_is_negative() {
        let plan = plan_stock_adjustment(&widget(5), &request(-3)).unwrap();
        assert_eq!(plan.quantity_before, 5);
        assert_eq!(plan.quantity_after, 2);
        assert_eq!(plan.total_cost, Money::from_cents(-2997));
        assert_eq!(plan.vendor_id, 2);
    }

    #[test]
    fn test_restock_cost_follows_price() {
        let plan = plan_stock_adjustment(&widget(0), &request(4)).unwrap();
        assert_eq!(plan.quantity_after, 4);
        assert_eq!(plan.total_cost.cents(), 3996);
        assert_eq!(plan.unit_price.cents(), 999);
    }

    #[test]
    fn test_sale_down_to_zero_is_allowed() {
        let plan = plan_stock_adjustment(&widget(3), &request(-3)).unwrap();
        assert_eq!(plan.quantity_after, 0);
    }

    #[test]
    fn test_oversell_is_rejected() {
        let err = plan_stock_adjustment(&widget(2), &request(-3)).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => {
                assert_eq!(product_id, 7);
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_delta_is_rejected() {
        let err = plan_stock_adjustment(&widget(2), &request(0)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_vendor_must_match_product_owner() {
        let mut req = request(1);
        req.vendor_id = Some(2);
        assert!(plan_stock_adjustment(&widget(0), &req).is_ok());

        req.vendor_id = Some(9);
        let err = plan_stock_adjustment(&widget(0), &req).unwrap_err();
        assert!(matches!(
            err,
            CoreError::VendorMismatch {
                expected: 2,
                supplied: 9,
                ..
            }
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut product = widget(0);
        product.price = Money::from_cents(i64::MAX);
        let err = plan_stock_adjustment(&product, &request(2)).unwrap_err();
        assert!(matches!(err, CoreError::Overflow("total cost")));

        let mut product = widget(i64::MAX);
        product.price = Money::from_cents(0);
        let err = plan_stock_adjustment(&product, &request(1)).unwrap_err();
        assert!(matches!(err, CoreError::Overflow("quantity")));
    }
}

//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations
//! - Low-stock report
//! - Guarded stock adjustments
//!
//! ## Stock Adjustment Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: Absolute update (loses concurrent writes)                   │
//! │     UPDATE products SET quantity = 7 WHERE id = ?                      │
//! │                                                                         │
//! │  ✅ CORRECT: Guarded delta update                                      │
//! │     UPDATE products SET quantity = quantity + ?2                       │
//! │     WHERE id = ?1 AND quantity + ?2 >= 0                               │
//! │                                                                         │
//! │  Zero rows affected means either the product is gone or the delta      │
//! │  would drive stock negative; a follow-up read tells which.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteExecutor, SqlitePool};
use stockroom_core::validation::{validate_new_product, validate_quantity_delta};
use stockroom_core::{CoreError, NewProduct, Page, Product};
use tracing::debug;

use super::rows::{product_from_row, PRODUCT_COLUMNS};
use super::{begin_write, page_bounds};
use crate::error::{DbError, DbResult};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Low-stock report
/// let results = repo.list_low_stock(10).await?;
///
/// // Get by ID
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Validates and inserts a product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its assigned id
    /// * `Err(DbError::Rejected(CoreError::VendorNotFound))` - Unknown vendor
    pub async fn create(&self, product: &NewProduct) -> DbResult<Product> {
        validate_new_product(product)?;

        debug!(name = %product.name, vendor_id = %product.vendor_id, "Inserting product");

        let mut tx = begin_write(&self.pool).await?;

        let vendor_exists = sqlx::query("SELECT 1 FROM vendors WHERE id = ?1")
            .bind(product.vendor_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();

        if !vendor_exists {
            return Err(CoreError::VendorNotFound(product.vendor_id).into());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price_cents, quantity, vendor_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(product.quantity)
        .bind(product.vendor_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: product.quantity,
            vendor_id: product.vendor_id,
        })
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        fetch_product(&self.pool, id).await
    }

    /// Lists products in insertion order.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Product>> {
        let (limit, offset) = page_bounds(page);
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id LIMIT ?1 OFFSET ?2");

        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(product_from_row).collect()
    }

    /// Lists products whose quantity is strictly below `threshold`.
    pub async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        debug!(threshold = %threshold, "Listing low-stock products");

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE quantity < ?1 ORDER BY id");

        let rows = sqlx::query(&sql)
            .bind(threshold)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(product_from_row).collect()
    }

    /// Applies a stock delta without recording a transaction.
    ///
    /// Used for corrections; regular stock movements go through
    /// [`TransactionRepository::record`](super::transaction::TransactionRepository::record).
    ///
    /// ## Returns
    /// * `Ok(Product)` - Product after the adjustment
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::Rejected(CoreError::InsufficientStock))` - Would go negative
    pub async fn update_quantity(&self, id: i64, delta: i64) -> DbResult<Product> {
        validate_quantity_delta(delta)?;

        debug!(id = %id, delta = %delta, "Updating quantity");

        let mut tx = begin_write(&self.pool).await?;

        let applied = apply_delta(&mut *tx, id, delta).await?;
        if !applied {
            let product = fetch_product(&mut *tx, id)
                .await?
                .ok_or_else(|| DbError::not_found("Product", id))?;

            return Err(CoreError::InsufficientStock {
                product_id: id,
                available: product.quantity,
                requested: delta.saturating_neg(),
            }
            .into());
        }

        let product = fetch_product(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        tx.commit().await?;
        Ok(product)
    }

    /// Deletes a product. Returns `false` when no such product exists.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while transactions still
    /// reference it.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Reads one product through any executor (pool or open transaction).
pub(crate) async fn fetch_product<'e, E>(executor: E, id: i64) -> DbResult<Option<Product>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(product_from_row).transpose()
}

/// Adds `delta` to the product's quantity unless the result would be
/// negative. Returns whether a row changed.
pub(crate) async fn apply_delta<'e, E>(executor: E, id: i64, delta: i64) -> DbResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE products
        SET quantity = quantity + ?2
        WHERE id = ?1 AND quantity + ?2 >= 0
        "#,
    )
    .bind(id)
    .bind(delta)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use stockroom_core::{Money, NewVendor};

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vendor = db
            .vendors()
            .create(&NewVendor {
                name: "Acme".to_string(),
                contact_email: "a@acme.test".to_string(),
                phone: "555".to_string(),
            })
            .await
            .unwrap();
        (db, vendor.id)
    }

    fn widget(vendor_id: i64, quantity: i64) -> NewProduct {
        NewProduct {
            name: format!("Widget x{quantity}"),
            description: Some("Blue".to_string()),
            price: Money::from_cents(999),
            quantity,
            vendor_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (db, vendor_id) = setup().await;
        let repo = db.products();

        let created = repo.create(&widget(vendor_id, 5)).await.unwrap();
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_vendor() {
        let (db, vendor_id) = setup().await;
        let repo = db.products();

        let err = repo.create(&widget(vendor_id + 100, 5)).await.unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::VendorNotFound(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_low_stock_is_strictly_below_threshold() {
        let (db, vendor_id) = setup().await;
        let repo = db.products();

        for quantity in [3, 15, 9, 10] {
            repo.create(&widget(vendor_id, quantity)).await.unwrap();
        }

        let low = repo.list_low_stock(10).await.unwrap();
        let quantities: Vec<_> = low.iter().map(|p| p.quantity).collect();
        assert_eq!(quantities, [3, 9]);
    }

    #[tokio::test]
    async fn test_update_quantity_guards_negative_stock() {
        let (db, vendor_id) = setup().await;
        let repo = db.products();
        let product = repo.create(&widget(vendor_id, 4)).await.unwrap();

        let updated = repo.update_quantity(product.id, -4).await.unwrap();
        assert_eq!(updated.quantity, 0);

        let err = repo.update_quantity(product.id, -1).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::InsufficientStock { available: 0, requested: 1, .. })
        ));

        let err = repo.update_quantity(product.id + 1, 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let (db, vendor_id) = setup().await;
        let repo = db.products();
        for quantity in [1, 2, 3] {
            repo.create(&widget(vendor_id, quantity)).await.unwrap();
        }

        let page = repo.list(Page::new(1, 5)).await.unwrap();
        let quantities: Vec<_> = page.iter().map(|p| p.quantity).collect();
        assert_eq!(quantities, [2, 3]);
    }

    #[tokio::test]
    async fn test_stock_columns_reject_negatives() {
        let (db, vendor_id) = setup().await;
        let product = db.products().create(&widget(vendor_id, 1)).await.unwrap();

        for sql in [
            "UPDATE products SET quantity = -1 WHERE id = ?1",
            "UPDATE products SET price_cents = -1 WHERE id = ?1",
        ] {
            let result = sqlx::query(sql).bind(product.id).execute(db.pool()).await;
            assert!(result.is_err(), "{sql} should violate a CHECK constraint");
        }
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let (db, vendor_id) = setup().await;
        let repo = db.products();
        let product = repo.create(&widget(vendor_id, 1)).await.unwrap();

        assert!(repo.delete(product.id).await.unwrap());
        assert!(!repo.delete(product.id).await.unwrap());
        assert_eq!(repo.get_by_id(product.id).await.unwrap(), None);
    }
}

//! # Transaction Repository
//!
//! The stock ledger: every recorded transaction moves product stock.
//!
//! ## Ledger Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record(request)                                      │
//! │                                                                         │
//! │  BEGIN IMMEDIATE (write lock held from the start)                      │
//! │    │                                                                    │
//! │    ├─► SELECT product ─────────────── none ──► ProductNotFound         │
//! │    │                                                                    │
//! │    ├─► plan_stock_adjustment (stockroom-core)                          │
//! │    │     cost = price × delta, quantity + delta >= 0                   │
//! │    │                                  └─ fail ──► InsufficientStock    │
//! │    │                                                                    │
//! │    ├─► INSERT INTO transactions (frozen cost, timestamp)               │
//! │    │                                                                    │
//! │    ├─► UPDATE products SET quantity = quantity + delta (guarded)       │
//! │    │                                                                    │
//! │  COMMIT  (any early return drops the tx, which rolls back)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use stockroom_core::ledger::plan_stock_adjustment;
use stockroom_core::validation::validate_new_transaction;
use stockroom_core::{timestamp, CoreError, NewTransaction, Page, Transaction};
use tracing::{debug, info};

use super::product::{apply_delta, fetch_product};
use super::{begin_write, page_bounds};
use super::rows::{transaction_from_row, TRANSACTION_COLUMNS};
use crate::error::DbResult;

/// Repository for stock ledger operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Records a stock movement and applies it to the product, atomically.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - The persisted transaction
    /// * `Err(DbError::Rejected(CoreError::ProductNotFound))` - Unknown product
    /// * `Err(DbError::Rejected(CoreError::InsufficientStock))` - Would go negative
    /// * `Err(DbError::Rejected(CoreError::VendorMismatch))` - Wrong vendor supplied
    ///
    /// On any error nothing is written.
    pub async fn record(&self, request: &NewTransaction) -> DbResult<Transaction> {
        validate_new_transaction(request)?;

        debug!(
            product_id = %request.product_id,
            delta = %request.quantity,
            "Recording transaction"
        );

        let mut tx = begin_write(&self.pool).await?;

        let product = fetch_product(&mut *tx, request.product_id)
            .await?
            .ok_or(CoreError::ProductNotFound(request.product_id))?;

        let plan = plan_stock_adjustment(&product, request)?;
        let recorded_at = timestamp::now();

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (product_id, vendor_id, quantity, total_cost_cents, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(plan.product_id)
        .bind(plan.vendor_id)
        .bind(plan.quantity)
        .bind(plan.total_cost.cents())
        .bind(timestamp::format(&recorded_at))
        .execute(&mut *tx)
        .await?;

        if !apply_delta(&mut *tx, plan.product_id, plan.quantity).await? {
            return Err(CoreError::InsufficientStock {
                product_id: plan.product_id,
                available: plan.quantity_before,
                requested: plan.quantity.saturating_neg(),
            }
            .into());
        }

        tx.commit().await?;

        info!(
            product_id = %plan.product_id,
            delta = %plan.quantity,
            total_cost = %plan.total_cost,
            quantity_after = %plan.quantity_after,
            "Transaction recorded"
        );

        Ok(Transaction {
            id: result.last_insert_rowid(),
            product_id: plan.product_id,
            vendor_id: plan.vendor_id,
            quantity: plan.quantity,
            total_cost: plan.total_cost,
            timestamp: recorded_at.into(),
        })
    }

    /// Gets a transaction by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1");

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(transaction_from_row).transpose()
    }

    /// Lists transactions in insertion order.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Transaction>> {
        let (limit, offset) = page_bounds(page);
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id LIMIT ?1 OFFSET ?2"
        );

        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(transaction_from_row).collect()
    }

    /// Lists every transaction for one product, oldest first.
    pub async fn list_for_product(&self, product_id: i64) -> DbResult<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE product_id = ?1 ORDER BY id"
        );

        let rows = sqlx::query(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(transaction_from_row).collect()
    }

    /// Deletes a transaction record. Returns `false` when absent.
    ///
    /// The product quantity is left as is; the delta is not reverted.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting transaction");

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts transactions (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use stockroom_core::timestamp::StoredTimestamp;
    use stockroom_core::{Money, NewProduct, NewVendor, Product};

    async fn seed(db: &Database, quantity: i64) -> Product {
        let vendor = db
            .vendors()
            .create(&NewVendor {
                name: "Acme".to_string(),
                contact_email: "a@acme.test".to_string(),
                phone: "555".to_string(),
            })
            .await
            .unwrap();
        db.products()
            .create(&NewProduct {
                name: "Widget".to_string(),
                description: None,
                price: Money::from_cents(999),
                quantity,
                vendor_id: vendor.id,
            })
            .await
            .unwrap()
    }

    async fn setup(quantity: i64) -> (Database, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seed(&db, quantity).await;
        (db, product)
    }

    /// File-backed store with a real multi-connection pool.
    async fn file_database(dir: &tempfile::TempDir) -> Database {
        Database::new(DbConfig::new(dir.path().join("ledger.db")).max_connections(5))
            .await
            .unwrap()
    }

    fn request(product_id: i64, quantity: i64) -> NewTransaction {
        NewTransaction {
            product_id,
            vendor_id: None,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_sale_moves_stock_and_freezes_cost() {
        let (db, product) = setup(5).await;

        let recorded = db.transactions().record(&request(product.id, -3)).await.unwrap();
        assert_eq!(recorded.total_cost, Money::from_cents(-2997));
        assert_eq!(recorded.vendor_id, product.vendor_id);

        let after = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 2);

        let stored = db.transactions().get_by_id(recorded.id).await.unwrap();
        assert_eq!(stored, Some(recorded));
    }

    #[tokio::test]
    async fn test_unknown_product_leaves_store_unchanged() {
        let (db, product) = setup(5).await;

        let err = db
            .transactions()
            .record(&request(product.id + 1, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::ProductNotFound(_))));
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_writes_nothing() {
        let (db, product) = setup(2).await;

        let err = db.transactions().record(&request(product.id, -3)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::InsufficientStock { available: 2, requested: 3, .. })
        ));

        assert_eq!(db.transactions().count().await.unwrap(), 0);
        let after = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 2);
    }

    #[tokio::test]
    async fn test_vendor_mismatch_is_rejected() {
        let (db, product) = setup(5).await;
        let mut req = request(product.id, 1);
        req.vendor_id = Some(product.vendor_id + 1);

        let err = db.transactions().record(&req).await.unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::VendorMismatch { .. })));
    }

    #[tokio::test]
    async fn test_cost_uses_price_at_time_of_call() {
        let (db, product) = setup(0).await;
        let first = db.transactions().record(&request(product.id, 10)).await.unwrap();

        sqlx::query("UPDATE products SET price_cents = 500 WHERE id = ?1")
            .bind(product.id)
            .execute(db.pool())
            .await
            .unwrap();

        let second = db.transactions().record(&request(product.id, 2)).await.unwrap();

        let history = db.transactions().list_for_product(product.id).await.unwrap();
        assert_eq!(history, vec![first.clone(), second]);
        assert_eq!(history[0].total_cost, Money::from_cents(9990));
        assert_eq!(history[1].total_cost, Money::from_cents(1000));
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let (db, product) = setup(0).await;
        for delta in [1, 2, 3, 4] {
            db.transactions().record(&request(product.id, delta)).await.unwrap();
        }

        let page = db.transactions().list(Page::new(1, 2)).await.unwrap();
        let deltas: Vec<_> = page.iter().map(|t| t.quantity).collect();
        assert_eq!(deltas, [2, 3]);
    }

    #[tokio::test]
    async fn test_delete_keeps_product_quantity() {
        let (db, product) = setup(5).await;
        let recorded = db.transactions().record(&request(product.id, 4)).await.unwrap();

        assert!(db.transactions().delete(recorded.id).await.unwrap());
        assert!(!db.transactions().delete(recorded.id).await.unwrap());

        let after = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 9);
    }

    #[tokio::test]
    async fn test_unparseable_stored_timestamp_reads_back_verbatim() {
        let (db, product) = setup(5).await;
        sqlx::query(
            "INSERT INTO transactions (id, product_id, vendor_id, quantity, total_cost_cents, timestamp)
             VALUES (50, ?1, ?2, 1, 999, 'last tuesday')",
        )
        .bind(product.id)
        .bind(product.vendor_id)
        .execute(db.pool())
        .await
        .unwrap();

        let stored = db.transactions().get_by_id(50).await.unwrap().unwrap();
        assert_eq!(
            stored.timestamp,
            StoredTimestamp::Verbatim("last tuesday".to_string())
        );
        assert_eq!(db.transactions().list(Page::default()).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_restocks_all_commit() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_database(&dir).await;
        let product = seed(&db, 0).await;
        let product_id = product.id;

        let handles: Vec<_> = (0..40)
            .map(|_| {
                let repo = db.transactions();
                tokio::spawn(async move { repo.record(&request(product_id, 1)).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let after = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 40);
        assert_eq!(db.transactions().count().await.unwrap(), 40);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_database(&dir).await;
        let product = seed(&db, 10).await;
        let product_id = product.id;

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let repo = db.transactions();
                tokio::spawn(async move { repo.record(&request(product_id, -1)).await })
            })
            .collect();

        let mut sold = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => sold += 1,
                Err(DbError::Rejected(CoreError::InsufficientStock { .. })) => refused += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(sold, 10);
        assert_eq!(refused, 15);
        let after = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 0);
    }
}

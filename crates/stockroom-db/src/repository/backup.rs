//! # Backup Repository
//!
//! Full-store export and id-preserving restore.
//!
//! ## Restore Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    restore(document)                                    │
//! │                                                                         │
//! │  BEGIN IMMEDIATE                                                       │
//! │    │                                                                    │
//! │    ├─► vendors       id exists? ── yes ──► skip                        │
//! │    │                              └─ no ──► INSERT with id             │
//! │    ├─► products      (same; price and quantity must be non-negative)   │
//! │    ├─► transactions  (same; deltas are NOT re-applied)                 │
//! │    │                                                                    │
//! │  COMMIT ──► RestoreSummary                                             │
//! │                                                                         │
//! │  Any error: ROLLBACK everything ──► DbError::RestoreFailed(reason)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Restoring twice is harmless: the second pass skips every id. It also
//! means attribute changes for an existing id are never applied.

use sqlx::{Sqlite, SqlitePool, Transaction as SqlTransaction};
use stockroom_core::backup::{KindSummary, RestoreDocument, TransactionRecord};
use stockroom_core::validation::validate_restored_product;
use stockroom_core::{timestamp, BackupDocument, Product, RestoreSummary, Vendor};
use tracing::{info, warn};

use super::begin_write;
use super::rows::{
    product_from_row, transaction_from_row, vendor_from_row, PRODUCT_COLUMNS,
    TRANSACTION_COLUMNS, VENDOR_COLUMNS,
};
use crate::error::{DbError, DbResult};

/// Repository for backup export and restore.
#[derive(Debug, Clone)]
pub struct BackupRepository {
    pool: SqlitePool,
}

impl BackupRepository {
    /// Creates a new BackupRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BackupRepository { pool }
    }

    /// Exports every vendor, product and transaction, each list ordered by id.
    ///
    /// The three reads share one transaction so the document is a single
    /// consistent snapshot.
    pub async fn export(&self) -> DbResult<BackupDocument> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {VENDOR_COLUMNS} FROM vendors ORDER BY id");
        let vendors = sqlx::query(&sql)
            .fetch_all(&mut *tx)
            .await?
            .iter()
            .map(vendor_from_row)
            .collect::<DbResult<Vec<_>>>()?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
        let products = sqlx::query(&sql)
            .fetch_all(&mut *tx)
            .await?
            .iter()
            .map(product_from_row)
            .collect::<DbResult<Vec<_>>>()?;

        let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id");
        let transactions = sqlx::query(&sql)
            .fetch_all(&mut *tx)
            .await?
            .iter()
            .map(transaction_from_row)
            .collect::<DbResult<Vec<_>>>()?;

        tx.commit().await?;

        let document = BackupDocument {
            vendors,
            products,
            transactions,
        };

        info!(entries = document.len(), "Backup exported");
        Ok(document)
    }

    /// Restores a document into the store.
    ///
    /// All-or-nothing: on any failure every insertion is rolled back and the
    /// cause is reported as [`DbError::RestoreFailed`].
    pub async fn restore(&self, document: &RestoreDocument) -> DbResult<RestoreSummary> {
        info!(
            vendors = document.vendors.len(),
            products = document.products.len(),
            transactions = document.transactions.len(),
            "Starting restore"
        );

        let mut tx = begin_write(&self.pool)
            .await
            .map_err(|e| DbError::RestoreFailed(e.to_string()))?;

        let summary = match restore_all(&mut tx, document).await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(error = %err, "Restore failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                return Err(DbError::RestoreFailed(err.to_string()));
            }
        };

        tx.commit()
            .await
            .map_err(|e| DbError::RestoreFailed(e.to_string()))?;

        info!(
            inserted = summary.inserted(),
            skipped = summary.skipped(),
            "Restore complete"
        );
        Ok(summary)
    }
}

// =============================================================================
// Restore Steps
// =============================================================================

async fn restore_all(
    tx: &mut SqlTransaction<'_, Sqlite>,
    document: &RestoreDocument,
) -> DbResult<RestoreSummary> {
    let mut summary = RestoreSummary::default();

    for vendor in &document.vendors {
        let inserted = restore_vendor(tx, vendor).await?;
        tally(&mut summary.vendors, inserted);
    }

    for product in &document.products {
        let inserted = restore_product(tx, product).await?;
        tally(&mut summary.products, inserted);
    }

    for record in &document.transactions {
        let inserted = restore_transaction(tx, record).await?;
        tally(&mut summary.transactions, inserted);
    }

    Ok(summary)
}

fn tally(kind: &mut KindSummary, inserted: bool) {
    if inserted {
        kind.inserted += 1;
    } else {
        kind.skipped += 1;
    }
}

async fn id_exists(
    tx: &mut SqlTransaction<'_, Sqlite>,
    table: &'static str,
    id: i64,
) -> DbResult<bool> {
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");

    let found = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .is_some();

    Ok(found)
}

async fn restore_vendor(tx: &mut SqlTransaction<'_, Sqlite>, vendor: &Vendor) -> DbResult<bool> {
    if id_exists(tx, "vendors", vendor.id).await? {
        return Ok(false);
    }

    sqlx::query("INSERT INTO vendors (id, name, contact_email, phone) VALUES (?1, ?2, ?3, ?4)")
        .bind(vendor.id)
        .bind(&vendor.name)
        .bind(&vendor.contact_email)
        .bind(&vendor.phone)
        .execute(&mut **tx)
        .await?;

    Ok(true)
}

async fn restore_product(
    tx: &mut SqlTransaction<'_, Sqlite>,
    product: &Product,
) -> DbResult<bool> {
    if id_exists(tx, "products", product.id).await? {
        return Ok(false);
    }

    validate_restored_product(product)?;

    sqlx::query(
        r#"
        INSERT INTO products (id, name, description, price_cents, quantity, vendor_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price.cents())
    .bind(product.quantity)
    .bind(product.vendor_id)
    .execute(&mut **tx)
    .await?;

    Ok(true)
}

async fn restore_transaction(
    tx: &mut SqlTransaction<'_, Sqlite>,
    record: &TransactionRecord,
) -> DbResult<bool> {
    if id_exists(tx, "transactions", record.id).await? {
        return Ok(false);
    }

    let stamp = match &record.timestamp {
        Some(restored) => restored.to_text(),
        None => timestamp::format(&timestamp::now()),
    };

    sqlx::query(
        r#"
        INSERT INTO transactions (id, product_id, vendor_id, quantity, total_cost_cents, timestamp)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(record.id)
    .bind(record.product_id)
    .bind(record.vendor_id)
    .bind(record.quantity)
    .bind(record.total_cost.cents())
    .bind(stamp)
    .execute(&mut **tx)
    .await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use stockroom_core::timestamp::StoredTimestamp;
    use stockroom_core::{Money, NewProduct, NewTransaction, NewVendor, Page};

    async fn populated() -> Database {
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
        let product = db
            .products()
            .create(&NewProduct {
                name: "Widget".to_string(),
                description: Some("Blue".to_string()),
                price: Money::from_cents(999),
                quantity: 5,
                vendor_id: vendor.id,
            })
            .await
            .unwrap();
        db.transactions()
            .record(&NewTransaction {
                product_id: product.id,
                vendor_id: None,
                quantity: -3,
            })
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_export_then_restore_into_empty_store() {
        let source = populated().await;
        let exported = source.backups().export().await.unwrap();
        assert_eq!(exported.len(), 3);

        // Through JSON, the way the HTTP layer moves it.
        let json = serde_json::to_vec(&exported).unwrap();
        let document = RestoreDocument::from_json_slice(&json).unwrap();

        let target = Database::new(DbConfig::in_memory()).await.unwrap();
        let summary = target.backups().restore(&document).await.unwrap();
        assert_eq!(summary.inserted(), 3);
        assert_eq!(summary.skipped(), 0);

        let round_trip = target.backups().export().await.unwrap();
        assert_eq!(round_trip, exported);

        // Quantities are restored as recorded, not re-derived from deltas.
        let products = target.products().list(Page::default()).await.unwrap();
        assert_eq!(products[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_restore_skips_existing_ids() {
        let db = populated().await;
        let mut document = RestoreDocument::from(db.backups().export().await.unwrap());
        document.vendors[0].name = "Renamed".to_string();

        let summary = db.backups().restore(&document).await.unwrap();
        assert_eq!(summary.inserted(), 0);
        assert_eq!(summary.vendors.skipped, 1);

        let vendor = db.vendors().get_by_id(document.vendors[0].id).await.unwrap().unwrap();
        assert_eq!(vendor.name, "Acme");
    }

    #[tokio::test]
    async fn test_restore_rolls_back_on_failure() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let document = RestoreDocument::from_json_slice(
            br#"{
                "vendors": [{"id": 1, "name": "Acme", "contact_email": "a@b", "phone": "1"}],
                "products": [{"id": 1, "name": "Orphan", "description": null,
                              "price": 1.0, "quantity": 1, "vendor_id": 42}]
            }"#,
        )
        .unwrap();

        let err = db.backups().restore(&document).await.unwrap_err();
        assert!(matches!(err, DbError::RestoreFailed(_)));

        // The vendor inserted before the failure is gone too.
        assert_eq!(db.vendors().count().await.unwrap(), 0);
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_timestamp_defaults_to_restore_time() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let document = RestoreDocument::from_json_slice(
            br#"{
                "vendors": [{"id": 1, "name": "Acme", "contact_email": "a@b", "phone": "1"}],
                "products": [{"id": 1, "name": "W", "description": null,
                              "price": 1.0, "quantity": 1, "vendor_id": 1}],
                "transactions": [{"id": 7, "product_id": 1, "vendor_id": 1,
                                  "quantity": 1, "total_cost": 1.0}]
            }"#,
        )
        .unwrap();

        let before = timestamp::now();
        db.backups().restore(&document).await.unwrap();

        let restored = db.transactions().get_by_id(7).await.unwrap().unwrap();
        let instant = restored.timestamp.instant().unwrap();
        assert!(instant >= before);
    }

    #[tokio::test]
    async fn test_unparseable_timestamp_survives_export() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let document = RestoreDocument::from_json_slice(
            br#"{
                "vendors": [{"id": 1, "name": "Acme", "contact_email": "a@b", "phone": "1"}],
                "products": [{"id": 1, "name": "W", "description": null,
                              "price": 2.5, "quantity": 1, "vendor_id": 1}],
                "transactions": [{"id": 7, "product_id": 1, "vendor_id": 1, "quantity": 1,
                                  "total_cost": 2.5, "timestamp": "last tuesday"}]
            }"#,
        )
        .unwrap();

        let summary = db.backups().restore(&document).await.unwrap();
        assert_eq!(summary.transactions.inserted, 1);

        let listed = db.transactions().list(Page::default()).await.unwrap();
        assert_eq!(
            listed[0].timestamp,
            StoredTimestamp::Verbatim("last tuesday".to_string())
        );

        let exported = db.backups().export().await.unwrap();
        let json = serde_json::to_value(&exported).unwrap();
        assert_eq!(json["transactions"][0]["timestamp"], "last tuesday");

        // The exported document restores cleanly into a fresh store.
        let again = RestoreDocument::from_json_slice(&serde_json::to_vec(&exported).unwrap())
            .unwrap();
        let target = Database::new(DbConfig::in_memory()).await.unwrap();
        target.backups().restore(&again).await.unwrap();
        assert_eq!(target.backups().export().await.unwrap(), exported);
    }

    #[tokio::test]
    async fn test_restore_rejects_negative_stock_and_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        for product in [
            r#"{"id": 1, "name": "W", "description": null, "price": 1.0, "quantity": -5, "vendor_id": 1}"#,
            r#"{"id": 1, "name": "W", "description": null, "price": -1.0, "quantity": 5, "vendor_id": 1}"#,
        ] {
            let raw = format!(
                r#"{{"vendors": [{{"id": 1, "name": "Acme", "contact_email": "a@b", "phone": "1"}}],
                    "products": [{product}]}}"#
            );
            let document = RestoreDocument::from_json_slice(raw.as_bytes()).unwrap();

            let err = db.backups().restore(&document).await.unwrap_err();
            assert!(matches!(err, DbError::RestoreFailed(_)));
        }

        assert_eq!(db.vendors().count().await.unwrap(), 0);
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_restore_accepts_decimal_document() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let document = RestoreDocument::from_json_slice(
            br#"{
                "vendors": [{"id": 3, "name": "Acme", "contact_email": "a@b", "phone": "1"}],
                "products": [{"id": 5, "name": "W", "description": "Blue",
                              "price": 9.99, "quantity": 2, "vendor_id": 3}],
                "transactions": [{"id": 9, "product_id": 5, "vendor_id": 3, "quantity": -3,
                                  "total_cost": -29.97,
                                  "timestamp": "2026-01-31T09:05:00.000000"}]
            }"#,
        )
        .unwrap();

        db.backups().restore(&document).await.unwrap();

        let product = db.products().get_by_id(5).await.unwrap().unwrap();
        assert_eq!(product.price, Money::from_cents(999));
        let tx = db.transactions().get_by_id(9).await.unwrap().unwrap();
        assert_eq!(tx.total_cost, Money::from_cents(-2997));
        assert_eq!(tx.timestamp.to_text(), "2026-01-31T09:05:00.000000");
    }
}

//! # Vendor Repository
//!
//! Database operations for vendors.
//!
//! Vendors are never cascaded: deleting one that still owns products or
//! transactions fails with [`DbError::ForeignKeyViolation`].

use sqlx::SqlitePool;
use stockroom_core::validation::validate_new_vendor;
use stockroom_core::{NewVendor, Page, Vendor};
use tracing::debug;

use super::page_bounds;
use super::rows::{vendor_from_row, VENDOR_COLUMNS};
use crate::error::DbResult;

/// Repository for vendor database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.vendors();
/// let vendor = repo.create(&NewVendor { .. }).await?;
/// let same = repo.get_by_id(vendor.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct VendorRepository {
    pool: SqlitePool,
}

impl VendorRepository {
    /// Creates a new VendorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VendorRepository { pool }
    }

    /// Validates and inserts a vendor, returning it with its assigned id.
    pub async fn create(&self, vendor: &NewVendor) -> DbResult<Vendor> {
        validate_new_vendor(vendor)?;

        debug!(name = %vendor.name, "Inserting vendor");

        let result = sqlx::query(
            r#"
            INSERT INTO vendors (name, contact_email, phone)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&vendor.name)
        .bind(&vendor.contact_email)
        .bind(&vendor.phone)
        .execute(&self.pool)
        .await?;

        Ok(Vendor {
            id: result.last_insert_rowid(),
            name: vendor.name.clone(),
            contact_email: vendor.contact_email.clone(),
            phone: vendor.phone.clone(),
        })
    }

    /// Gets a vendor by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Vendor))` - Vendor found
    /// * `Ok(None)` - Vendor not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Vendor>> {
        let sql = format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = ?1");

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(vendor_from_row).transpose()
    }

    /// Lists vendors in insertion order.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Vendor>> {
        let (limit, offset) = page_bounds(page);
        let sql = format!("SELECT {VENDOR_COLUMNS} FROM vendors ORDER BY id LIMIT ?1 OFFSET ?2");

        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(vendor_from_row).collect()
    }

    /// Deletes a vendor. Returns `false` when no such vendor exists.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting vendor");

        let result = sqlx::query("DELETE FROM vendors WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts vendors (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vendors")
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
    use stockroom_core::{CoreError, Money, NewProduct};

    fn acme() -> NewVendor {
        NewVendor {
            name: "Acme Supply".to_string(),
            contact_email: "orders@acme.test".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.vendors();

        let created = repo.create(&acme()).await.unwrap();
        assert!(created.id > 0);

        let loaded = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(loaded, Some(created));
        assert_eq!(repo.get_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_payload_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.vendors();

        let mut bad = acme();
        bad.contact_email = "not-an-email".to_string();

        let err = repo.create(&bad).await.unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::Validation(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.vendors();

        for n in 0..5 {
            let mut v = acme();
            v.name = format!("Vendor {n}");
            repo.create(&v).await.unwrap();
        }

        let page = repo.list(Page::new(1, 2)).await.unwrap();
        let names: Vec<_> = page.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["Vendor 1", "Vendor 2"]);

        assert_eq!(repo.list(Page::default()).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.vendors();

        let vendor = repo.create(&acme()).await.unwrap();
        assert!(repo.delete(vendor.id).await.unwrap());
        assert!(!repo.delete(vendor.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_with_products_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vendor = db.vendors().create(&acme()).await.unwrap();
        db.products()
            .create(&NewProduct {
                name: "Widget".to_string(),
                description: None,
                price: Money::from_cents(100),
                quantity: 1,
                vendor_id: vendor.id,
            })
            .await
            .unwrap();

        let err = db.vendors().delete(vendor.id).await.unwrap_err();
        assert!(err.is_foreign_key_violation());
        assert!(db.vendors().get_by_id(vendor.id).await.unwrap().is_some());
    }
}

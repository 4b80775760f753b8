//! # Backup Document
//!
//! Shape of the full-store export and of the document accepted by restore.
//!
//! ## Format
//! ```text
//! {
//!   "vendors":      [ { "id": 1, "name": "...", "contact_email": "...", "phone": "..." } ],
//!   "products":     [ { "id": 1, "name": "...", "description": null,
//!                       "price": 9.99, "quantity": 5, "vendor_id": 1 } ],
//!   "transactions": [ { "id": 1, "product_id": 1, "vendor_id": 1, "quantity": -3,
//!                       "total_cost": -29.97,
//!                       "timestamp": "2026-01-31T09:05:00.000000" } ]
//! }
//! ```
//!
//! Export writes [`BackupDocument`]. Restore reads [`RestoreDocument`], which
//! is the same shape but tolerant: missing lists are empty, a missing
//! transaction timestamp is allowed, and one that does not parse is carried
//! verbatim instead of failing the whole document.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::timestamp::StoredTimestamp;
use crate::types::{Product, Transaction, Vendor};

// =============================================================================
// Export
// =============================================================================

/// A full snapshot of the store, lists in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BackupDocument {
    pub vendors: Vec<Vendor>,
    pub products: Vec<Product>,
    pub transactions: Vec<Transaction>,
}

impl BackupDocument {
    /// Total number of entries across the three lists.
    pub fn len(&self) -> usize {
        self.vendors.len() + self.products.len() + self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Restore
// =============================================================================

/// A restore input document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestoreDocument {
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

impl RestoreDocument {
    /// Parses an uploaded JSON document.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(bytes).map_err(|e| ValidationError::InvalidFormat {
            field: "backup document".to_string(),
            reason: e.to_string(),
        })
    }
}

impl From<BackupDocument> for RestoreDocument {
    fn from(doc: BackupDocument) -> Self {
        RestoreDocument {
            vendors: doc.vendors,
            products: doc.products,
            transactions: doc
                .transactions
                .into_iter()
                .map(TransactionRecord::from)
                .collect(),
        }
    }
}

/// A transaction entry as read from a restore document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub product_id: i64,
    pub vendor_id: i64,
    pub quantity: i64,
    pub total_cost: Money,
    #[serde(default)]
    pub timestamp: Option<StoredTimestamp>,
}

impl From<Transaction> for TransactionRecord {
    fn from(tx: Transaction) -> Self {
        TransactionRecord {
            id: tx.id,
            product_id: tx.product_id,
            vendor_id: tx.vendor_id,
            quantity: tx.quantity,
            total_cost: tx.total_cost,
            timestamp: Some(tx.timestamp),
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Inserted/skipped counts for one entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KindSummary {
    pub inserted: u64,
    pub skipped: u64,
}

/// Outcome of a successful restore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RestoreSummary {
    pub vendors: KindSummary,
    pub products: KindSummary,
    pub transactions: KindSummary,
}

impl RestoreSummary {
    pub fn inserted(&self) -> u64 {
        self.vendors.inserted + self.products.inserted + self.transactions.inserted
    }

    pub fn skipped(&self) -> u64 {
        self.vendors.skipped + self.products.skipped + self.transactions.skipped
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_missing_lists_default_to_empty() {
        let doc = RestoreDocument::from_json_slice(br#"{"vendors": []}"#).unwrap();
        assert!(doc.products.is_empty());
        assert!(doc.transactions.is_empty());
    }

    #[test]
    fn test_malformed_document_is_a_validation_error() {
        let err = RestoreDocument::from_json_slice(b"not json").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));

        // A vendor entry without an id cannot be restored id-preserving.
        let err = RestoreDocument::from_json_slice(
            br#"{"vendors": [{"name": "Acme", "contact_email": "a@b", "phone": "1"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn test_unparseable_timestamp_is_kept_verbatim() {
        let doc = RestoreDocument::from_json_slice(
            br#"{"transactions": [
                {"id": 1, "product_id": 1, "vendor_id": 1, "quantity": 2,
                 "total_cost": 0.1, "timestamp": "last tuesday"},
                {"id": 2, "product_id": 1, "vendor_id": 1, "quantity": 2,
                 "total_cost": 0.1, "timestamp": "2026-01-31T09:05:00"},
                {"id": 3, "product_id": 1, "vendor_id": 1, "quantity": 2,
                 "total_cost": 0.1}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            doc.transactions[0].timestamp,
            Some(StoredTimestamp::Verbatim("last tuesday".to_string()))
        );
        assert_eq!(
            doc.transactions[1].timestamp,
            Some(StoredTimestamp::Parsed(
                Utc.with_ymd_and_hms(2026, 1, 31, 9, 5, 0).unwrap()
            ))
        );
        assert_eq!(doc.transactions[2].timestamp, None);
    }

    #[test]
    fn test_exported_json_reads_back_as_restore_document() {
        let backup = BackupDocument {
            vendors: vec![Vendor {
                id: 4,
                name: "Acme".to_string(),
                contact_email: "a@acme.test".to_string(),
                phone: "555".to_string(),
            }],
            products: vec![],
            transactions: vec![Transaction {
                id: 9,
                product_id: 1,
                vendor_id: 4,
                quantity: -1,
                total_cost: Money::from_cents(-250),
                timestamp: timestamp::now().into(),
            }],
        };

        let json = serde_json::to_vec(&backup).unwrap();
        let parsed = RestoreDocument::from_json_slice(&json).unwrap();
        let direct = RestoreDocument::from(backup.clone());

        assert_eq!(parsed.vendors, direct.vendors);
        assert_eq!(parsed.transactions, direct.transactions);
        assert_eq!(backup.len(), 2);
    }

    #[test]
    fn test_summary_totals() {
        let summary = RestoreSummary {
            vendors: KindSummary { inserted: 2, skipped: 1 },
            products: KindSummary { inserted: 3, skipped: 0 },
            transactions: KindSummary { inserted: 4, skipped: 2 },
        };
        assert_eq!(summary.inserted(), 9);
        assert_eq!(summary.skipped(), 3);
    }
}

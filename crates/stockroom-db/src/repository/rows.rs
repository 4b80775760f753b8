//! Row-to-struct mapping.
//!
//! Every table has one mapping function and one column list; repositories
//! never read columns by hand.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use stockroom_core::timestamp::StoredTimestamp;
use stockroom_core::{Money, Product, Transaction, Vendor};

use crate::error::DbResult;

pub(crate) const VENDOR_COLUMNS: &str = "id, name, contact_email, phone";

pub(crate) const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, quantity, vendor_id";

pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, product_id, vendor_id, quantity, total_cost_cents, timestamp";

pub(crate) fn vendor_from_row(row: &SqliteRow) -> DbResult<Vendor> {
    Ok(Vendor {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        contact_email: row.try_get("contact_email")?,
        phone: row.try_get("phone")?,
    })
}

pub(crate) fn product_from_row(row: &SqliteRow) -> DbResult<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: Money::from_cents(row.try_get("price_cents")?),
        quantity: row.try_get("quantity")?,
        vendor_id: row.try_get("vendor_id")?,
    })
}

/// Maps a transaction row. Timestamp text that does not parse (restored as
/// supplied) comes back as [`StoredTimestamp::Verbatim`].
pub(crate) fn transaction_from_row(row: &SqliteRow) -> DbResult<Transaction> {
    let raw: String = row.try_get("timestamp")?;

    Ok(Transaction {
        id: row.try_get("id")?,
        product_id: row.try_get("product_id")?,
        vendor_id: row.try_get("vendor_id")?,
        quantity: row.try_get("quantity")?,
        total_cost: Money::from_cents(row.try_get("total_cost_cents")?),
        timestamp: StoredTimestamp::from_text(&raw),
    })
}

//! # Validation Module
//!
//! Input validation for creation payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary (apps/api)                                     │
//! │  └── JSON deserialization (types, required keys)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Field rules (non-empty names, non-negative price, ...)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK (price_cents >= 0), CHECK (quantity >= 0)                   │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_name, validate_quantity_delta};
//!
//! assert!(validate_name("name", "Acme Supply").is_ok());
//! assert!(validate_quantity_delta(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewProduct, NewTransaction, NewVendor, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name, email or phone string.
pub const MAX_TEXT_LEN: usize = 200;

/// Longest accepted product description.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, bounded text field.
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Validates a contact email.
///
/// Only the shape `local@domain` is checked; deliverability is not.
///
/// ```rust
/// use stockroom_core::validation::validate_email;
///
/// assert!(validate_email("orders@acme.test").is_ok());
/// assert!(validate_email("acme.test").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_name("contact_email", email)?;

    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "contact_email".to_string(),
            reason: "expected local@domain".to_string(),
        }),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level: an initial quantity or a restored one.
pub fn validate_initial_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a ledger delta. Any sign is fine; zero is not.
pub fn validate_quantity_delta(delta: i64) -> ValidationResult<()> {
    if delta == 0 {
        return Err(ValidationError::MustBeNonZero {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

pub fn validate_new_vendor(vendor: &NewVendor) -> ValidationResult<()> {
    validate_name("name", &vendor.name)?;
    validate_email(&vendor.contact_email)?;
    validate_name("phone", &vendor.phone)?;
    Ok(())
}

pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_name("name", &product.name)?;

    if let Some(description) = &product.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LEN,
            });
        }
    }

    validate_price(product.price)?;
    validate_initial_quantity(product.quantity)?;
    Ok(())
}

/// Validates a product entry from a restore document.
///
/// Only the stored invariants are checked (price and stock never negative);
/// names are taken as they were exported.
pub fn validate_restored_product(product: &Product) -> ValidationResult<()> {
    validate_price(product.price)?;
    validate_initial_quantity(product.quantity)?;
    Ok(())
}

pub fn validate_new_transaction(transaction: &NewTransaction) -> ValidationResult<()> {
    validate_quantity_delta(transaction.quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================

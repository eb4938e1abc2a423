//! # Validation Module
//!
//! Input validation for entity payloads, plus the "is this optional field
//! present?" rule shared by the query engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP layer (outside this workspace)                          │
//! │  └── Deserialization, required keys                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Lengths, blanks, positive prices                                  │
//! │  └── Criteria: blank optional text counts as absent                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (customers.dni, products.name)                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use store_core::validation::validate_text;
//!
//! assert!(validate_text("name", "Ana", 50).is_ok());
//! assert!(validate_text("name", "   ", 50).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CustomerUpdate, NewCustomer, NewProduct, NewSale, ProductUpdate};
use crate::{
    MAX_CUSTOMER_LAST_NAME_LEN, MAX_CUSTOMER_NAME_LEN, MAX_DESCRIPTION_LEN, MAX_DNI_LEN,
    MAX_PRODUCT_NAME_LEN, MAX_STOCK, MAX_TRADE_MARK_LEN,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Optional Criteria Fields
// =============================================================================

/// Returns the text if it is present and not blank.
///
/// Criteria fields are optional. `None`, `""` and `"   "` all mean "no
/// filter on this field". The returned value is not trimmed.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required text field.
///
/// ## Rules
/// - Must not be blank
/// - At most `max` characters (not bytes)
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product price. Zero is not a valid price.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }
    Ok(())
}

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use store_core::validation::validate_uuid;
///
/// assert!(validate_uuid("customer_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("customer_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Canonical text form of an identifier.
///
/// Ids are stored as lower-case hyphenated UUIDs. Any notation
/// `Uuid::parse_str` accepts (upper-case, braced, `urn:uuid:`, simple) maps
/// to that form. Anything else is returned unchanged and matches no row.
///
/// ```rust
/// use store_core::validation::canonical_id;
///
/// assert_eq!(
///     canonical_id("550E8400-E29B-41D4-A716-446655440000"),
///     "550e8400-e29b-41d4-a716-446655440000"
/// );
/// assert_eq!(canonical_id("s-1"), "s-1");
/// ```
pub fn canonical_id(id: &str) -> String {
    uuid::Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .unwrap_or_else(|_| id.to_string())
}

// =============================================================================
// Payload Validators
// =============================================================================

pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_text("name", &customer.name, MAX_CUSTOMER_NAME_LEN)?;
    validate_text("last_name", &customer.last_name, MAX_CUSTOMER_LAST_NAME_LEN)?;
    validate_text("dni", &customer.dni, MAX_DNI_LEN)
}

pub fn validate_customer_update(update: &CustomerUpdate) -> ValidationResult<()> {
    validate_text("name", &update.name, MAX_CUSTOMER_NAME_LEN)?;
    validate_text("last_name", &update.last_name, MAX_CUSTOMER_LAST_NAME_LEN)
}

pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_text("name", &product.name, MAX_PRODUCT_NAME_LEN)?;
    validate_text("trade_mark", &product.trade_mark, MAX_TRADE_MARK_LEN)?;
    validate_price(product.price)?;
    validate_text("description", &product.description, MAX_DESCRIPTION_LEN)?;
    validate_stock(product.stock)
}

pub fn validate_product_update(update: &ProductUpdate) -> ValidationResult<()> {
    validate_text("name", &update.name, MAX_PRODUCT_NAME_LEN)?;
    validate_text("trade_mark", &update.trade_mark, MAX_TRADE_MARK_LEN)?;
    validate_price(update.price)?;
    validate_text("description", &update.description, MAX_DESCRIPTION_LEN)
}

/// A sale needs a customer and at least one product, all valid UUIDs.
pub fn validate_new_sale(sale: &NewSale) -> ValidationResult<()> {
    validate_uuid("customer_id", &sale.customer_id)?;

    if sale.product_ids.is_empty() {
        return Err(ValidationError::Required {
            field: "product_ids".to_string(),
        });
    }

    for id in &sale.product_ids {
        validate_uuid("product_ids", id)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const UUID_A: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_present() {
        assert_eq!(present(Some("Ana")), Some("Ana"));
        assert_eq!(present(Some(" Ana ")), Some(" Ana "));
        assert_eq!(present(Some("")), None);
        assert_eq!(present(Some("  ")), None);
        assert_eq!(present(None), None);
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("name", "Laptop", 50).is_ok());
        assert!(matches!(
            validate_text("name", "", 50),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_text("dni", &"9".repeat(13), MAX_DNI_LEN),
            Err(ValidationError::TooLong { max: 12, .. })
        ));
        // Counted in characters, not bytes.
        assert!(validate_text("name", &"ñ".repeat(50), 50).is_ok());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_cents(1)).is_ok());
        assert!(validate_price(Money::zero()).is_err());
        assert!(validate_price(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(MAX_STOCK).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_new_sale() {
        let sale = NewSale {
            customer_id: UUID_A.to_string(),
            product_ids: vec![UUID_A.to_string()],
            creation_date: None,
        };
        assert!(validate_new_sale(&sale).is_ok());

        let empty = NewSale {
            product_ids: Vec::new(),
            ..sale.clone()
        };
        assert!(matches!(
            validate_new_sale(&empty),
            Err(ValidationError::Required { .. })
        ));

        let bad_id = NewSale {
            customer_id: "42".to_string(),
            ..sale
        };
        assert!(matches!(
            validate_new_sale(&bad_id),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_new_product() {
        let product = NewProduct {
            name: "Laptop".to_string(),
            trade_mark: "Lenovo".to_string(),
            price: Money::from_cents(120000),
            description: "14 inch".to_string(),
            stock: 5,
            creation_date: None,
        };
        assert!(validate_new_product(&product).is_ok());

        let free = NewProduct {
            price: Money::zero(),
            ..product
        };
        assert!(matches!(
            validate_new_product(&free),
            Err(ValidationError::MustBePositive { .. })
        ));
    }
}

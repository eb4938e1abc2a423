//! # Domain Types
//!
//! Entities served by the store search endpoints.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Sale       │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  customer (1)   │   │  id (UUID)      │       │
//! │  │  name           │   │  products (N) ──┼──►│  name (unique)  │       │
//! │  │  last_name      │   │  total_amount   │   │  trade_mark     │       │
//! │  │  dni (unique)   │   │  creation_date  │   │  price_cents    │       │
//! │  │  creation_date  │   └─────────────────┘   │  stock          │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Write payloads (`NewCustomer`, `ProductUpdate`, ...) are separate from the
//! entities: ids and creation dates are assigned by the repository.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Entity Kind
// =============================================================================

/// The three entity families the query engine can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Customer,
    Product,
    Sale,
}

impl EntityKind {
    /// Table holding this entity's rows.
    pub const fn table(&self) -> &'static str {
        match self {
            EntityKind::Customer => "customers",
            EntityKind::Product => "products",
            EntityKind::Sale => "sales",
        }
    }

    /// Alias used for the entity's table in generated SQL.
    ///
    /// Sale queries reuse the customer and product aliases for their joins,
    /// so all three must stay distinct.
    pub const fn alias(&self) -> &'static str {
        match self {
            EntityKind::Customer => "c",
            EntityKind::Product => "p",
            EntityKind::Sale => "s",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Customer => "Customer",
            EntityKind::Product => "Product",
            EntityKind::Sale => "Sale",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    pub last_name: String,

    /// National ID. Unique across all customers.
    pub dni: String,

    #[ts(as = "String")]
    pub creation_date: NaiveDate,
}

/// Payload for registering a customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub last_name: String,
    pub dni: String,
    /// Defaults to today (UTC) when absent.
    #[ts(as = "Option<String>")]
    pub creation_date: Option<NaiveDate>,
}

/// Editable customer fields. The DNI is immutable once registered.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerUpdate {
    pub name: String,
    pub last_name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name. Unique across all products.
    pub name: String,

    pub trade_mark: String,

    /// Price in cents. Always positive.
    pub price_cents: i64,

    pub description: String,

    /// Units on hand.
    pub stock: i64,

    #[ts(as = "String")]
    pub creation_date: NaiveDate,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub trade_mark: String,
    #[ts(as = "String")]
    pub price: Money,
    pub description: String,
    #[serde(default)]
    pub stock: i64,
    #[ts(as = "Option<String>")]
    pub creation_date: Option<NaiveDate>,
}

/// Editable product fields. Stock is managed separately from catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdate {
    pub name: String,
    pub trade_mark: String,
    #[ts(as = "String")]
    pub price: Money,
    pub description: String,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale, hydrated with its customer and products.
///
/// ## Invariants
/// - Always has exactly one customer
/// - `products` is ordered by price ascending (ties by name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,

    #[ts(as = "String")]
    pub creation_date: NaiveDate,

    /// Sum of product prices at the time of the sale, in cents.
    pub total_amount_cents: i64,

    pub customer: Customer,

    pub products: Vec<Product>,
}

impl Sale {
    /// Returns the total as a Money type.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// Payload for recording (or replacing) a sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub customer_id: String,
    pub product_ids: Vec<String>,
    #[ts(as = "Option<String>")]
    pub creation_date: Option<NaiveDate>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_aliases_are_distinct() {
        let aliases = [
            EntityKind::Customer.alias(),
            EntityKind::Product.alias(),
            EntityKind::Sale.alias(),
        ];
        assert_ne!(aliases[0], aliases[1]);
        assert_ne!(aliases[0], aliases[2]);
        assert_ne!(aliases[1], aliases[2]);
    }

    #[test]
    fn test_product_price() {
        let product = Product {
            id: "p1".to_string(),
            name: "Mouse".to_string(),
            trade_mark: "Logi".to_string(),
            price_cents: 2550,
            description: "Wireless mouse".to_string(),
            stock: 3,
            creation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(product.price(), Money::from_cents(2550));
    }

    #[test]
    fn test_new_sale_deserializes_without_date() {
        let json = r#"{"customer_id":"c1","product_ids":["p1","p2"]}"#;
        let sale: NewSale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.product_ids.len(), 2);
        assert!(sale.creation_date.is_none());
    }
}

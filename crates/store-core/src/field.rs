//! # Entity Fields
//!
//! Typed column accessors for each entity, doubling as the allow-list of
//! sortable fields.
//!
//! ## Why an Allow-List?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Free-text sort field from the caller                    │
//! │                                                                         │
//! │  "price"              → ProductField::Price  → p.price_cents   ✅       │
//! │  "creationDate"       → ProductField::CreationDate             ✅       │
//! │  "nonexistentColumn"  → ValidationError::FieldNotFound         ❌       │
//! │  "name; DROP TABLE"   → ValidationError::FieldNotFound         ❌       │
//! │                                                                         │
//! │  Only `Column` values built from these enums are ever spliced into     │
//! │  SQL text. Everything the caller types goes through push_bind.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both the attribute name (`lastName`) and the column name (`last_name`)
//! are accepted.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::EntityKind;

// =============================================================================
// Column
// =============================================================================

/// A qualified column reference (`alias.name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    pub table: &'static str,
    pub name: &'static str,
}

impl Column {
    pub const fn new(table: &'static str, name: &'static str) -> Self {
        Column { table, name }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}

// =============================================================================
// Sortable Field Trait
// =============================================================================

/// A field of entity `ENTITY` that can be filtered and sorted on.
pub trait SortableField: Copy + fmt::Debug + FromStr<Err = ValidationError> {
    /// The entity this field belongs to.
    const ENTITY: EntityKind;

    /// The column backing this field.
    fn column(&self) -> Column;

    /// The entity's primary key field, used as the sort tie-breaker.
    fn id() -> Self;

    /// Whether this is the primary key field.
    fn is_id(&self) -> bool;
}

// =============================================================================
// Customer Fields
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    Id,
    Name,
    LastName,
    Dni,
    CreationDate,
}

impl FromStr for CustomerField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(CustomerField::Id),
            "name" => Ok(CustomerField::Name),
            "lastName" | "last_name" => Ok(CustomerField::LastName),
            "dni" => Ok(CustomerField::Dni),
            "creationDate" | "creation_date" => Ok(CustomerField::CreationDate),
            other => Err(ValidationError::field_not_found(EntityKind::Customer, other)),
        }
    }
}

impl CustomerField {
    /// Case-folded copy of the name. Filter-only, never sortable.
    pub const fn folded_name() -> Column {
        Column::new(EntityKind::Customer.alias(), "name_folded")
    }
}

impl SortableField for CustomerField {
    const ENTITY: EntityKind = EntityKind::Customer;

    fn column(&self) -> Column {
        let name = match self {
            CustomerField::Id => "id",
            CustomerField::Name => "name",
            CustomerField::LastName => "last_name",
            CustomerField::Dni => "dni",
            CustomerField::CreationDate => "creation_date",
        };
        Column::new(Self::ENTITY.alias(), name)
    }

    fn id() -> Self {
        CustomerField::Id
    }

    fn is_id(&self) -> bool {
        matches!(self, CustomerField::Id)
    }
}

// =============================================================================
// Product Fields
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Id,
    Name,
    TradeMark,
    Price,
    Description,
    Stock,
    CreationDate,
}

impl FromStr for ProductField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(ProductField::Id),
            "name" => Ok(ProductField::Name),
            "tradeMark" | "trade_mark" => Ok(ProductField::TradeMark),
            "price" => Ok(ProductField::Price),
            "description" => Ok(ProductField::Description),
            "stock" => Ok(ProductField::Stock),
            "creationDate" | "creation_date" => Ok(ProductField::CreationDate),
            other => Err(ValidationError::field_not_found(EntityKind::Product, other)),
        }
    }
}

impl SortableField for ProductField {
    const ENTITY: EntityKind = EntityKind::Product;

    fn column(&self) -> Column {
        let name = match self {
            ProductField::Id => "id",
            ProductField::Name => "name",
            ProductField::TradeMark => "trade_mark",
            ProductField::Price => "price_cents",
            ProductField::Description => "description",
            ProductField::Stock => "stock",
            ProductField::CreationDate => "creation_date",
        };
        Column::new(Self::ENTITY.alias(), name)
    }

    fn id() -> Self {
        ProductField::Id
    }

    fn is_id(&self) -> bool {
        matches!(self, ProductField::Id)
    }
}

// =============================================================================
// Sale Fields
// =============================================================================

/// Sale fields live on the sales table only; related-entity attributes are
/// reachable for filtering through joins, not for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaleField {
    Id,
    CreationDate,
    TotalAmount,
}

impl FromStr for SaleField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SaleField::Id),
            "creationDate" | "creation_date" => Ok(SaleField::CreationDate),
            "totalAmount" | "total_amount" => Ok(SaleField::TotalAmount),
            other => Err(ValidationError::field_not_found(EntityKind::Sale, other)),
        }
    }
}

impl SortableField for SaleField {
    const ENTITY: EntityKind = EntityKind::Sale;

    fn column(&self) -> Column {
        let name = match self {
            SaleField::Id => "id",
            SaleField::CreationDate => "creation_date",
            SaleField::TotalAmount => "total_amount_cents",
        };
        Column::new(Self::ENTITY.alias(), name)
    }

    fn id() -> Self {
        SaleField::Id
    }

    fn is_id(&self) -> bool {
        matches!(self, SaleField::Id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_attribute_and_column_names() {
        assert_eq!("lastName".parse::<CustomerField>().unwrap(), CustomerField::LastName);
        assert_eq!("last_name".parse::<CustomerField>().unwrap(), CustomerField::LastName);
        assert_eq!("tradeMark".parse::<ProductField>().unwrap(), ProductField::TradeMark);
        assert_eq!("totalAmount".parse::<SaleField>().unwrap(), SaleField::TotalAmount);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = "nonexistentColumn".parse::<ProductField>().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::FieldNotFound { entity: EntityKind::Product, ref field }
                if field == "nonexistentColumn"
        ));

        // Fields of related entities are not sortable on Sale.
        assert!("customerName".parse::<SaleField>().is_err());
        // Names are case-sensitive.
        assert!("Price".parse::<ProductField>().is_err());
    }

    #[test]
    fn test_columns_are_qualified() {
        assert_eq!(ProductField::Price.column().to_string(), "p.price_cents");
        assert_eq!(CustomerField::Dni.column().to_string(), "c.dni");
        assert_eq!(SaleField::TotalAmount.column().to_string(), "s.total_amount_cents");
    }
}

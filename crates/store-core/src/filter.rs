//! # Predicate Builder
//!
//! Builds the conjunction of predicates for a criteria object.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CustomerCriteria { name: Some("Ana"), dni: None, last_name: Some("") } │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  one predicate per PRESENT field (None / blank text are skipped)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Filter { predicates: [c.name = 'Ana'], joins: {} }                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WHERE c.name = ?        (rendered by store-db, values bound)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every field is an exact equality. The one exception is the Sale
//! customer-name filter, which is a case-insensitive substring match on the
//! joined customer (see [`crate::join`]).

use chrono::NaiveDate;

use crate::criteria::{CustomerCriteria, ProductCriteria, SaleCriteria};
use crate::field::{Column, CustomerField, ProductField, SaleField, SortableField};
use crate::join::{resolve_sale_joins, JoinSet};
use crate::money::Money;
use crate::validation::{canonical_id, present};

// =============================================================================
// Values and Predicates
// =============================================================================

/// A value compared against a column. Always bound, never spliced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<Money> for Value {
    fn from(value: Money) -> Self {
        Value::Integer(value.cents())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

/// A single boolean condition over one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = value`
    Eq { column: Column, value: Value },

    /// `column` contains `needle`. The column holds case-folded text and the
    /// needle is folded the same way with [`fold_case`].
    ContainsIgnoreCase { column: Column, needle: String },

    /// `column IN (values...)`. Never built with an empty list.
    In { column: Column, values: Vec<Value> },
}

impl Predicate {
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            column,
            value: value.into(),
        }
    }

    pub fn contains_ignore_case(column: Column, needle: &str) -> Self {
        Predicate::ContainsIgnoreCase {
            column,
            needle: fold_case(needle),
        }
    }

    pub fn in_list<V: Into<Value>>(column: Column, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::In {
            column,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The column this predicate tests.
    pub fn column(&self) -> Column {
        match self {
            Predicate::Eq { column, .. }
            | Predicate::ContainsIgnoreCase { column, .. }
            | Predicate::In { column, .. } => *column,
        }
    }
}

/// Unicode lower-casing used for case-insensitive matching.
///
/// SQLite's `lower()` only folds ASCII, so folded copies of searchable text
/// are written next to the original and compared against needles folded here.
///
/// ```rust
/// use store_core::filter::fold_case;
///
/// assert_eq!(fold_case("NÚÑEZ"), "núñez");
/// ```
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

// =============================================================================
// Filter
// =============================================================================

/// Root predicates plus the joins (each carrying its own predicates).
///
/// All of them form one conjunction. An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    predicates: Vec<Predicate>,
    joins: JoinSet,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate on the root entity.
    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Adds `column = value` when `value` is present.
    fn push_eq<V: Into<Value>>(&mut self, column: Column, value: Option<V>) {
        if let Some(value) = value {
            self.push(Predicate::eq(column, value));
        }
    }

    /// Predicates on the root entity.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn joins(&self) -> &JoinSet {
        &self.joins
    }

    pub fn set_joins(&mut self, joins: JoinSet) {
        self.joins = joins;
    }

    /// Total number of predicates, root and joined.
    pub fn len(&self) -> usize {
        self.predicates.len() + self.joins.iter().map(|j| j.predicates().len()).sum::<usize>()
    }

    /// True when neither the root nor any join carries a predicate.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Per-Entity Builders
// =============================================================================

pub fn customer_filter(criteria: &CustomerCriteria) -> Filter {
    let mut filter = Filter::new();
    filter.push_eq(
        CustomerField::Id.column(),
        present(criteria.id.as_deref()).map(canonical_id),
    );
    filter.push_eq(CustomerField::Name.column(), present(criteria.name.as_deref()));
    filter.push_eq(
        CustomerField::LastName.column(),
        present(criteria.last_name.as_deref()),
    );
    filter.push_eq(CustomerField::Dni.column(), present(criteria.dni.as_deref()));
    filter.push_eq(CustomerField::CreationDate.column(), criteria.creation_date);
    filter
}

pub fn product_filter(criteria: &ProductCriteria) -> Filter {
    let mut filter = Filter::new();
    filter.push_eq(
        ProductField::Id.column(),
        present(criteria.id.as_deref()).map(canonical_id),
    );
    filter.push_eq(ProductField::Name.column(), present(criteria.name.as_deref()));
    filter.push_eq(
        ProductField::TradeMark.column(),
        present(criteria.trade_mark.as_deref()),
    );
    filter.push_eq(ProductField::Price.column(), criteria.price);
    filter.push_eq(ProductField::Stock.column(), criteria.stock);
    filter.push_eq(ProductField::CreationDate.column(), criteria.creation_date);
    filter
}

/// Sale filter: root predicates plus the joins required by the
/// relationship fields.
pub fn sale_filter(criteria: &SaleCriteria) -> Filter {
    let mut filter = Filter::new();
    filter.push_eq(
        SaleField::Id.column(),
        present(criteria.id.as_deref()).map(canonical_id),
    );
    filter.push_eq(SaleField::CreationDate.column(), criteria.creation_date);
    filter.set_joins(resolve_sale_joins(criteria));
    filter
}

// =============================================================================
// Unit Tests
// =============================================================================

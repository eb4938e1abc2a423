//! # store-core: Pure Query-Engine Logic for the Store API
//!
//! This crate turns a caller's sparse search criteria into a typed,
//! storage-independent [`QuerySpec`]. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store API Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                HTTP layer (outside this workspace)              │   │
//! │  │   GET /customers  GET /products  GET /sales  (+ CRUD routes)    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CustomerCriteria / ProductCriteria /  │
//! │                                │ SaleCriteria                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ store-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  filter   │  │   join    │  │   sort    │  │pagination │  │   │
//! │  │   │ Predicate │  │  JoinSet  │  │ SortSpec  │  │   Page    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                         ──► QuerySpec                           │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    store-db (Database Layer)                    │   │
//! │  │         QuerySpec → SQL, repositories, migrations               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Customer, Product, Sale) and write payloads
//! - [`criteria`] - Criteria value objects, one per entity
//! - [`field`] - Sortable-field allow-lists and typed columns
//! - [`filter`] - Predicate builder
//! - [`join`] - Join resolver for Sale relationship filters
//! - [`sort`] - Sort resolver
//! - [`pagination`] - Paginator
//! - [`query`] - `QuerySpec` and the `SearchCriteria` trait
//! - [`money`] - Integer-cent money
//! - [`validation`] - Payload validation
//! - [`error`] - Validation error taxonomy
//!
//! ## Example Usage
//!
//! ```rust
//! use store_core::{ProductCriteria, SearchCriteria};
//!
//! let criteria = ProductCriteria {
//!     sort_field: Some("price".to_string()),
//!     sorting_direction: Some("asc".to_string()),
//!     page_size: 2,
//!     ..Default::default()
//! };
//!
//! let spec = criteria.to_query_spec().unwrap();
//! assert!(spec.filter.is_empty());
//! assert_eq!(spec.page.limit(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod criteria;
pub mod error;
pub mod field;
pub mod filter;
pub mod join;
pub mod money;
pub mod pagination;
pub mod query;
pub mod sort;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use criteria::{CustomerCriteria, ProductCriteria, SaleCriteria};
pub use error::ValidationError;
pub use field::{Column, CustomerField, ProductField, SaleField, SortableField};
pub use filter::{Filter, Predicate, Value};
pub use join::{Join, JoinSet, Relation};
pub use money::Money;
pub use pagination::Page;
pub use query::{QuerySpec, SearchCriteria};
pub use sort::{SortDirection, SortSpec};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a customer's first name.
pub const MAX_CUSTOMER_NAME_LEN: usize = 50;

/// Maximum length of a customer's last name.
pub const MAX_CUSTOMER_LAST_NAME_LEN: usize = 80;

/// Maximum length of a national ID.
pub const MAX_DNI_LEN: usize = 12;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 50;

/// Maximum length of a product trade mark.
pub const MAX_TRADE_MARK_LEN: usize = 50;

/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Upper bound on a single product's stock level.
///
/// ## Business Reason
/// Catches typos (an extra zero or two) on restock entry.
pub const MAX_STOCK: i64 = 1_000_000;

//! # store-db: Database Layer for the Store API
//!
//! Executes store-core query specifications against SQLite with sqlx and
//! owns the repositories for customers, products and sales.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Data Flow                                  │
//! │                                                                         │
//! │  GET /sales?customerName=doe&sortField=totalAmount                     │
//! │       │                                                                 │
//! │       ▼  SaleCriteria                                                   │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     store-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Query     │  │   │
//! │  │   │   (pool.rs)   │    │               │    │   executor   │  │   │
//! │  │   │               │    │ CustomerRepo  │───►│ QuerySpec →  │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ QueryBuilder │  │   │
//! │  │   │ Migrations    │    │ SaleRepo      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (store.db)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Environment-driven configuration
//! - [`migrations`] - Embedded database migrations
//! - [`query`] - QuerySpec rendering and execution
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use store_db::{Database, DbConfig};
//! use store_core::ProductCriteria;
//!
//! let db = Database::new(DbConfig::new("store.db")).await?;
//!
//! let page = db.products().search(&ProductCriteria {
//!     sort_field: Some("price".into()),
//!     page_size: 2,
//!     ..Default::default()
//! }).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, StoreConfig};
pub use error::{DbError, DbResult, ErrorKind};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;

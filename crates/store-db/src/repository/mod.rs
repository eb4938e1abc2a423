//! # Repository Module
//!
//! Database repository implementations for the store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler (outside this workspace)                                 │
//! │       │                                                                 │
//! │       │  db.sales().search(&criteria)                                  │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── search(&self, criteria)    → QuerySpec → query executor           │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert / update / delete                                          │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer CRUD and search
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and search
//! - [`SaleRepository`](sale::SaleRepository) - Sale writes, hydrated search

pub mod customer;
pub mod product;
pub mod sale;

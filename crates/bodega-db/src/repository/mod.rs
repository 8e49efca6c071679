//! # Repository Module
//!
//! SQL for the catalog tables, one repository per aggregate.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  CatalogSource for Database                                            │
//! │       │                                                                 │
//! │       │  db.products().list(&filter)                                   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, filter)                                               │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── upsert(&self, product)                                            │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`merchant::MerchantRepository`] - Bodegones and restaurants
//! - [`category::CategoryRepository`] - Categories and subcategories
//! - [`product::ProductRepository`] - Products and filtered listings
//!
//! Listings are ordered by `(name, id)` so paging is stable.

pub mod category;
pub mod merchant;
pub mod product;

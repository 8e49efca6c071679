//! # bodega-db: Catalog Data Sources for the Bodega Admin
//!
//! Everything the admin dashboard needs from the outside world: the
//! catalog (SQLite or in-memory), image storage and configuration.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bodega Admin Data Flow                           │
//! │                                                                         │
//! │  Admin screen (products table, merchant form)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bodega-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   BackendConfig ──► open_catalog() ──► Arc<dyn CatalogSource>   │   │
//! │  │                                           │                     │   │
//! │  │                          ┌────────────────┴──────────┐          │   │
//! │  │                          ▼                           ▼          │   │
//! │  │                 ┌───────────────┐          ┌──────────────┐     │   │
//! │  │                 │   Database    │          │ MockCatalog  │     │   │
//! │  │                 │  repositories │          │ sample data  │     │   │
//! │  │                 │  migrations   │          │ RwLock state │     │   │
//! │  │                 └───────┬───────┘          └──────────────┘     │   │
//! │  │                         │                                       │   │
//! │  │   LocalImageStorage (logos, product images)                     │   │
//! │  └─────────────────────────┼───────────────────────────────────────┘   │
//! │                            ▼                                           │
//! │                     SQLite Database                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - TOML/env backend configuration
//! - [`source`] - The `CatalogSource` trait, source selection, paging helper
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQL per entity
//! - [`mock`] - In-memory catalog
//! - [`sample`] - Sample catalog data
//! - [`storage`] - Image upload/delete
//! - [`error`] - Error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bodega_db::{open_catalog, paginate_products, BackendConfig};
//! use bodega_core::ProductFilter;
//!
//! let config = BackendConfig::load(None)?;
//! let catalog = open_catalog(&config).await?;
//!
//! let filter = ProductFilter::for_merchant(merchant_id).with_search("harina");
//! let mut paginator = config.catalog.paginator(filter.clone());
//! let page = paginate_products(catalog.as_ref(), &filter, &mut paginator).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod mock;
pub mod pool;
pub mod repository;
pub mod sample;
pub mod source;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{BackendConfig, CatalogSettings, DatabaseSettings, StorageSettings};
pub use error::{DbError, DbResult};
pub use mock::MockCatalog;
pub use pool::{Database, DbConfig};
pub use source::{open_catalog, paginate_products, CatalogSource, SourceMode};
pub use storage::{object_path, ImageStorage, LocalImageStorage, StoredImage};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::merchant::MerchantRepository;
pub use repository::product::ProductRepository;

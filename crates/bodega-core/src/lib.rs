//! # bodega-core: Pure Logic for the Bodega Admin
//!
//! Everything in this crate is deterministic and free of I/O. The React
//! admin dashboard and the storefront shell call into it (through the
//! generated TypeScript bindings and through `bodega-db`) for the pieces
//! that have an exact contract: price strings and page slicing.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bodega Admin Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front end (admin dashboard / storefront)           │   │
//! │  │   Product form ──► Price mask     Product table ──► Pager      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bodega-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐ │   │
//! │  │   │   price   │  │ pagination │  │   types   │  │ validation│ │   │
//! │  │   │ format    │  │ Paginator  │  │ Merchant  │  │ form      │ │   │
//! │  │   │ parse     │  │ PageItem   │  │ Product   │  │ rules     │ │   │
//! │  │   │ mask      │  │            │  │ Category  │  │           │ │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              bodega-db (catalog sources, storage)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`price`] - Locale price formatting, parsing and the live input mask
//! - [`pagination`] - Client-side paginator and page-control window
//! - [`types`] - Merchants, categories, subcategories, products
//! - [`validation`] - Form validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bodega_core::price::{format_price, parse_price};
//! use bodega_core::pagination::Paginator;
//!
//! assert_eq!(format_price(1250.0), "$1.250,00");
//! assert_eq!(parse_price("$1.250,00"), 1250.0);
//!
//! let items: Vec<u32> = (1..=23).collect();
//! let mut pager = Paginator::new(10);
//! pager.set_page(3);
//! assert_eq!(pager.page(&items).paginated_data, &[21, 22, 23]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pagination;
pub mod price;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use pagination::{visible_pages, Page, PageItem, PageResponse, Paginator};
pub use price::PriceFormat;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default number of rows per page in admin tables.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// How many page numbers are shown on each side of the current page.
pub const VISIBLE_PAGE_RADIUS: usize = 2;

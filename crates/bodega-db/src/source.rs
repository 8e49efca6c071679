//! # Catalog Source
//!
//! The admin screens talk to one trait, [`CatalogSource`], and never learn
//! whether a database is configured.
//!
//! ## Source Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      open_catalog(&config)                              │
//! │                                                                         │
//! │  config.database.path?                                                 │
//! │       │                                                                 │
//! │       ├── Some(path) → Database (SQLite, migrations)   mode = Database │
//! │       │                                                                 │
//! │       └── None       → MockCatalog (sample data)       mode = Mock     │
//! │                         + warn! so nobody mistakes it for real data    │
//! │                                                                         │
//! │  Both: same ordering, same cascade rules, same error variants.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use bodega_core::price::MAX_PRICE_CENTS;
use bodega_core::validation::validate_search_query;
use bodega_core::{
    Category, Merchant, MerchantKind, PageResponse, Paginator, Product, ProductFilter,
    Subcategory, ValidationError,
};

use crate::config::BackendConfig;
use crate::error::{DbError, DbResult};
use crate::mock::MockCatalog;
use crate::pool::Database;

/// Where catalog data is coming from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// A real SQLite database.
    Database,
    /// In-memory sample data; changes are lost on exit.
    Mock,
}

/// Catalog operations used by the admin dashboard.
///
/// `get_*` and `delete_*` fail with [`DbError::NotFound`] for unknown ids.
/// Listings are ordered by name.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Which implementation this is.
    fn mode(&self) -> SourceMode;

    /// True when the source can serve requests.
    async fn health_check(&self) -> bool;

    // Merchants

    async fn list_merchants(&self, kind: MerchantKind) -> DbResult<Vec<Merchant>>;

    async fn get_merchant(&self, id: &str) -> DbResult<Merchant>;

    /// Inserts or replaces a merchant.
    async fn save_merchant(&self, merchant: &Merchant) -> DbResult<()>;

    /// Deletes a merchant together with its products.
    async fn delete_merchant(&self, id: &str) -> DbResult<()>;

    // Categories

    async fn list_categories(&self, kind: MerchantKind) -> DbResult<Vec<Category>>;

    async fn save_category(&self, category: &Category) -> DbResult<()>;

    /// Deletes a category and its subcategories.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while products use it.
    async fn delete_category(&self, id: &str) -> DbResult<()>;

    // Subcategories

    async fn list_subcategories(&self, category_id: &str) -> DbResult<Vec<Subcategory>>;

    /// Fails with [`DbError::ForeignKeyViolation`] when the category is missing.
    ///
    /// Moving an existing subcategory to another category is refused while
    /// products still use it.
    async fn save_subcategory(&self, subcategory: &Subcategory) -> DbResult<()>;

    /// Deletes a subcategory; its products stay, without a subcategory.
    async fn delete_subcategory(&self, id: &str) -> DbResult<()>;

    // Products

    async fn list_products(&self, filter: &ProductFilter) -> DbResult<Vec<Product>>;

    async fn get_product(&self, id: &str) -> DbResult<Product>;

    /// Inserts or replaces a product.
    ///
    /// The merchant and category must exist; a subcategory, when set, must
    /// exist and belong to the product's category.
    async fn save_product(&self, product: &Product) -> DbResult<()>;

    async fn delete_product(&self, id: &str) -> DbResult<()>;
}

// =============================================================================
// Shared Rules
// =============================================================================

/// Record-level checks both sources run before writing a product.
pub(crate) fn check_product_record(product: &Product) -> DbResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&product.price_cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS / 100,
        }
        .into());
    }
    Ok(())
}

/// The error returned when moving a subcategory products still use.
pub(crate) fn subcategory_in_use(id: &str, products: usize) -> DbError {
    DbError::foreign_key(format!(
        "subcategory {id} is still used by {products} product(s)"
    ))
}

/// The error returned when deleting a category products still use.
pub(crate) fn category_in_use(id: &str, products: usize) -> DbError {
    DbError::foreign_key(format!(
        "category {id} is still used by {products} product(s)"
    ))
}

// =============================================================================
// SQLite Source
// =============================================================================

#[async_trait]
impl CatalogSource for Database {
    fn mode(&self) -> SourceMode {
        SourceMode::Database
    }

    async fn health_check(&self) -> bool {
        Database::health_check(self).await
    }

    async fn list_merchants(&self, kind: MerchantKind) -> DbResult<Vec<Merchant>> {
        self.merchants().list(kind).await
    }

    async fn get_merchant(&self, id: &str) -> DbResult<Merchant> {
        self.merchants()
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Merchant", id))
    }

    async fn save_merchant(&self, merchant: &Merchant) -> DbResult<()> {
        self.merchants().upsert(merchant).await
    }

    async fn delete_merchant(&self, id: &str) -> DbResult<()> {
        self.merchants().delete(id).await
    }

    async fn list_categories(&self, kind: MerchantKind) -> DbResult<Vec<Category>> {
        self.categories().list(kind).await
    }

    async fn save_category(&self, category: &Category) -> DbResult<()> {
        self.categories().upsert(category).await
    }

    async fn delete_category(&self, id: &str) -> DbResult<()> {
        let in_use = self.products().count_in_category(id).await?;
        if in_use > 0 {
            return Err(category_in_use(id, in_use as usize));
        }
        self.categories().delete(id).await
    }

    async fn list_subcategories(&self, category_id: &str) -> DbResult<Vec<Subcategory>> {
        self.categories().list_subcategories(category_id).await
    }

    async fn save_subcategory(&self, subcategory: &Subcategory) -> DbResult<()> {
        let categories = self.categories();

        if let Some(existing) = categories.get_subcategory(&subcategory.id).await? {
            if existing.category_id != subcategory.category_id {
                let used = self.products().count_in_subcategory(&subcategory.id).await?;
                if used > 0 {
                    return Err(subcategory_in_use(&subcategory.id, used as usize));
                }
            }
        }

        categories.upsert_subcategory(subcategory).await
    }

    async fn delete_subcategory(&self, id: &str) -> DbResult<()> {
        self.categories().delete_subcategory(id).await
    }

    async fn list_products(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        self.products().list(filter).await
    }

    async fn get_product(&self, id: &str) -> DbResult<Product> {
        self.products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    async fn save_product(&self, product: &Product) -> DbResult<()> {
        check_product_record(product)?;

        if let Some(subcategory_id) = &product.subcategory_id {
            let subcategory = self
                .categories()
                .get_subcategory(subcategory_id)
                .await?
                .ok_or_else(|| DbError::not_found("Subcategory", subcategory_id))?;
            product.check_subcategory(&subcategory)?;
        }

        self.products().upsert(product).await
    }

    async fn delete_product(&self, id: &str) -> DbResult<()> {
        self.products().delete(id).await
    }
}

// =============================================================================
// Construction & Helpers
// =============================================================================

/// Opens the catalog the configuration asks for.
///
/// A configured database path gives the SQLite source; without one the
/// in-memory sample catalog is used.
pub async fn open_catalog(config: &BackendConfig) -> DbResult<Arc<dyn CatalogSource>> {
    match config.database.db_config() {
        Some(db_config) => {
            let db = Database::new(db_config).await?;
            info!("Catalog source: database");
            Ok(Arc::new(db))
        }
        None => {
            warn!("No database configured, serving in-memory sample catalog");
            Ok(Arc::new(MockCatalog::with_sample_data()))
        }
    }
}

/// Loads the products matching `filter` and returns the paginator's
/// current page.
///
/// A filter different from the last one sends the paginator back to
/// page 1 before slicing.
pub async fn paginate_products(
    source: &dyn CatalogSource,
    filter: &ProductFilter,
    paginator: &mut Paginator<ProductFilter>,
) -> DbResult<PageResponse<Product>> {
    if let Some(search) = &filter.search {
        validate_search_query(search)?;
    }

    paginator.sync_dependencies(filter.clone());

    let products = source.list_products(filter).await?;
    Ok(paginator.page(&products).to_response())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use bodega_core::{CategoryInput, CoreError, MerchantInput, ProductInput, SubcategoryInput};

    struct Fixture {
        merchant: Merchant,
        category: Category,
        subcategory: Subcategory,
    }

    async fn fixture(source: &dyn CatalogSource) -> Fixture {
        let merchant = MerchantInput {
            kind: MerchantKind::Bodegon,
            name: "Bodegón La Esquina".to_string(),
            address: None,
            phone_number: None,
            logo_url: None,
            is_active: true,
        }
        .into_merchant()
        .unwrap();
        source.save_merchant(&merchant).await.unwrap();

        let category = CategoryInput {
            kind: MerchantKind::Bodegon,
            name: "Víveres".to_string(),
            image_url: None,
            is_active: true,
        }
        .into_category()
        .unwrap();
        source.save_category(&category).await.unwrap();

        let subcategory = SubcategoryInput {
            category_id: category.id.clone(),
            name: "Harinas".to_string(),
            is_active: true,
        }
        .into_subcategory()
        .unwrap();
        source.save_subcategory(&subcategory).await.unwrap();

        Fixture {
            merchant,
            category,
            subcategory,
        }
    }

    fn product(fx: &Fixture, name: &str, price: &str) -> Product {
        ProductInput {
            merchant_id: fx.merchant.id.clone(),
            category_id: fx.category.id.clone(),
            subcategory_id: Some(fx.subcategory.id.clone()),
            name: name.to_string(),
            description: None,
            price: price.to_string(),
            image_url: None,
            is_available: true,
        }
        .into_product()
        .unwrap()
    }

    /// Runs the same scenario against any source.
    async fn exercise(source: &dyn CatalogSource) {
        let fx = fixture(source).await;

        let pan = product(&fx, "Harina PAN 1kg", "1.250,50");
        let arroz = product(&fx, "Arroz Mary 1kg", "980");
        source.save_product(&pan).await.unwrap();
        source.save_product(&arroz).await.unwrap();

        // Ordered by name
        let all = source.list_products(&ProductFilter::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Arroz Mary 1kg", "Harina PAN 1kg"]);

        // Case-insensitive search over non-ASCII text
        let found = source
            .list_products(&ProductFilter::default().with_search("HARINA"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].formatted_price(), "$1.250,50");

        // Upsert keeps one row
        let mut edited = pan.clone();
        edited.price_cents = 130_000;
        source.save_product(&edited).await.unwrap();
        assert_eq!(
            source.get_product(&pan.id).await.unwrap().price_cents,
            130_000
        );

        // Category in use
        let err = source.delete_category(&fx.category.id).await.unwrap_err();
        assert!(err.is_foreign_key());

        // Subcategory delete clears the reference
        source.delete_subcategory(&fx.subcategory.id).await.unwrap();
        assert_eq!(source.get_product(&pan.id).await.unwrap().subcategory_id, None);

        // Missing ids
        assert!(source.get_product("nope").await.unwrap_err().is_not_found());
        assert!(source.delete_product("nope").await.unwrap_err().is_not_found());

        // Merchant delete cascades
        source.delete_merchant(&fx.merchant.id).await.unwrap();
        assert!(source
            .list_products(&ProductFilter::default())
            .await
            .unwrap()
            .is_empty());
        assert!(source
            .get_merchant(&fx.merchant.id)
            .await
            .unwrap_err()
            .is_not_found());

        // Category now free
        source.delete_category(&fx.category.id).await.unwrap();
        assert!(source
            .list_categories(MerchantKind::Bodegon)
            .await
            .unwrap()
            .is_empty());
    }

    async fn exercise_reference_checks(source: &dyn CatalogSource) {
        let fx = fixture(source).await;

        // Unknown merchant
        let mut orphan = product(&fx, "Huérfano", "10");
        orphan.merchant_id = bodega_core::new_id();
        assert!(source.save_product(&orphan).await.unwrap_err().is_foreign_key());

        // Unknown subcategory
        let mut lost = product(&fx, "Perdido", "10");
        lost.subcategory_id = Some(bodega_core::new_id());
        assert!(source.save_product(&lost).await.unwrap_err().is_not_found());

        // Subcategory of another category
        let other = CategoryInput {
            kind: MerchantKind::Bodegon,
            name: "Bebidas".to_string(),
            image_url: None,
            is_active: true,
        }
        .into_category()
        .unwrap();
        source.save_category(&other).await.unwrap();
        let mut mismatched = product(&fx, "Malta", "10");
        mismatched.category_id = other.id.clone();
        assert!(matches!(
            source.save_product(&mismatched).await,
            Err(DbError::Core(CoreError::SubcategoryMismatch { .. }))
        ));

        // Moving a subcategory that products still use
        let pan = product(&fx, "Harina PAN", "10");
        source.save_product(&pan).await.unwrap();
        let mut moved = fx.subcategory.clone();
        moved.category_id = other.id.clone();
        assert!(source.save_subcategory(&moved).await.unwrap_err().is_foreign_key());
        assert_eq!(
            source.get_product(&pan.id).await.unwrap().subcategory_id,
            Some(fx.subcategory.id.clone())
        );

        let mut renamed = fx.subcategory.clone();
        renamed.name = "Harinas de maíz".to_string();
        source.save_subcategory(&renamed).await.unwrap();

        source.delete_product(&pan.id).await.unwrap();
        source.save_subcategory(&moved).await.unwrap();
        assert_eq!(source.list_subcategories(&other.id).await.unwrap().len(), 1);

        // Subcategory for a missing category
        let dangling = SubcategoryInput {
            category_id: bodega_core::new_id(),
            name: "Nada".to_string(),
            is_active: true,
        }
        .into_subcategory()
        .unwrap();
        assert!(source
            .save_subcategory(&dangling)
            .await
            .unwrap_err()
            .is_foreign_key());

        // Category delete cascades to subcategories
        source.delete_category(&other.id).await.unwrap();
        source.delete_category(&fx.category.id).await.unwrap();
        assert!(source
            .list_subcategories(&fx.category.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_database_source() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.mode(), SourceMode::Database);
        exercise(&db).await;
    }

    #[tokio::test]
    async fn test_mock_source() {
        let mock = MockCatalog::empty();
        assert_eq!(mock.mode(), SourceMode::Mock);
        exercise(&mock).await;
    }

    #[tokio::test]
    async fn test_database_reference_checks() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        exercise_reference_checks(&db).await;
    }

    #[tokio::test]
    async fn test_mock_reference_checks() {
        exercise_reference_checks(&MockCatalog::empty()).await;
    }

    #[tokio::test]
    async fn test_open_catalog_without_database_is_mock() {
        let config = BackendConfig::default();
        let source = open_catalog(&config).await.unwrap();

        assert_eq!(source.mode(), SourceMode::Mock);
        assert!(source.health_check().await);
        assert!(!source
            .list_merchants(MerchantKind::Bodegon)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_paginate_products_resets_on_filter_change() {
        let mock = MockCatalog::empty();
        let fx = fixture(&mock).await;
        for i in 0..12 {
            mock.save_product(&product(&fx, &format!("Producto {i:02}"), "5"))
                .await
                .unwrap();
        }

        let filter = ProductFilter::for_merchant(fx.merchant.id.clone());
        let mut paginator = Paginator::with_dependencies(10, filter.clone());

        paginator.set_page(2);
        let page = paginate_products(&mock, &filter, &mut paginator).await.unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_items, 12);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].name, "Producto 10");

        let narrowed = filter.clone().with_search("producto 1");
        let page = paginate_products(&mock, &narrowed, &mut paginator).await.unwrap();
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_items, 2);
        assert_eq!(page.data[0].name, "Producto 10");

        let too_long = filter.with_search("x".repeat(500));
        assert!(paginate_products(&mock, &too_long, &mut paginator)
            .await
            .is_err());
    }
}

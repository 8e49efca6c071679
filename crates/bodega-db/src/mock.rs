//! # Mock Catalog
//!
//! In-memory [`CatalogSource`] used when no database is configured, and in
//! tests. It enforces the same rules the SQLite schema does:
//!
//! ```text
//! save_product      merchant + category must exist     → ForeignKeyViolation
//! save_subcategory  category must exist                → ForeignKeyViolation
//! delete_merchant   products of the merchant removed   (CASCADE)
//! delete_category   refused while products use it      → ForeignKeyViolation
//!                   subcategories removed              (CASCADE)
//! delete_subcategory products keep existing, no sub    (SET NULL)
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use bodega_core::{Category, Merchant, MerchantKind, Product, ProductFilter, Subcategory};

use crate::error::{DbError, DbResult};
use crate::sample;
use crate::source::{
    category_in_use, check_product_record, subcategory_in_use, CatalogSource, SourceMode,
};

#[derive(Debug, Default)]
struct MockState {
    merchants: HashMap<String, Merchant>,
    categories: HashMap<String, Category>,
    subcategories: HashMap<String, Subcategory>,
    products: HashMap<String, Product>,
}

/// Catalog held in memory behind a `RwLock`.
#[derive(Debug, Default)]
pub struct MockCatalog {
    state: RwLock<MockState>,
}

impl MockCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        MockCatalog::default()
    }

    /// A catalog pre-loaded with the sample bodegones, restaurants and
    /// products.
    pub fn with_sample_data() -> Self {
        let mut state = MockState::default();

        for merchant in sample::merchants() {
            state.merchants.insert(merchant.id.clone(), merchant);
        }
        for category in sample::categories() {
            state.categories.insert(category.id.clone(), category);
        }
        for subcategory in sample::subcategories() {
            state.subcategories.insert(subcategory.id.clone(), subcategory);
        }
        for product in sample::products() {
            state.products.insert(product.id.clone(), product);
        }

        MockCatalog {
            state: RwLock::new(state),
        }
    }
}

/// What the mock needs from every stored record.
trait Record: Clone {
    /// Listing order, matching `ORDER BY name, id`.
    fn sort_key(&self) -> (&str, &str);

    /// Copies the fields an upsert never overwrites.
    fn keep_created_from(&mut self, old: &Self);
}

macro_rules! impl_record {
    ($($ty:ty),*) => {
        $(
            impl Record for $ty {
                fn sort_key(&self) -> (&str, &str) {
                    (self.name.as_str(), self.id.as_str())
                }

                fn keep_created_from(&mut self, old: &Self) {
                    self.created_at = old.created_at;
                }
            }
        )*
    };
}

impl_record!(Merchant, Category, Subcategory, Product);

fn sorted<'a, T: Record + 'a>(items: impl Iterator<Item = &'a T>) -> Vec<T> {
    let mut items: Vec<T> = items.cloned().collect();
    items.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    items
}

fn upsert<T: Record>(map: &mut HashMap<String, T>, id: &str, record: &T) {
    let mut record = record.clone();
    if let Some(old) = map.get(id) {
        record.keep_created_from(old);
    }
    map.insert(id.to_string(), record);
}

#[async_trait]
impl CatalogSource for MockCatalog {
    fn mode(&self) -> SourceMode {
        SourceMode::Mock
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn list_merchants(&self, kind: MerchantKind) -> DbResult<Vec<Merchant>> {
        let state = self.state.read().await;
        Ok(sorted(state.merchants.values().filter(|m| m.kind == kind)))
    }

    async fn get_merchant(&self, id: &str) -> DbResult<Merchant> {
        let state = self.state.read().await;
        state
            .merchants
            .get(id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Merchant", id))
    }

    async fn save_merchant(&self, merchant: &Merchant) -> DbResult<()> {
        debug!(id = %merchant.id, name = %merchant.name, "Saving merchant (mock)");
        let mut state = self.state.write().await;
        upsert(&mut state.merchants, &merchant.id, merchant);
        Ok(())
    }

    async fn delete_merchant(&self, id: &str) -> DbResult<()> {
        let mut state = self.state.write().await;
        if state.merchants.remove(id).is_none() {
            return Err(DbError::not_found("Merchant", id));
        }
        state.products.retain(|_, p| p.merchant_id != id);
        Ok(())
    }

    async fn list_categories(&self, kind: MerchantKind) -> DbResult<Vec<Category>> {
        let state = self.state.read().await;
        Ok(sorted(state.categories.values().filter(|c| c.kind == kind)))
    }

    async fn save_category(&self, category: &Category) -> DbResult<()> {
        let mut state = self.state.write().await;
        upsert(&mut state.categories, &category.id, category);
        Ok(())
    }

    async fn delete_category(&self, id: &str) -> DbResult<()> {
        let mut state = self.state.write().await;

        let in_use = state.products.values().filter(|p| p.category_id == id).count();
        if in_use > 0 {
            return Err(category_in_use(id, in_use));
        }
        if state.categories.remove(id).is_none() {
            return Err(DbError::not_found("Category", id));
        }
        state.subcategories.retain(|_, s| s.category_id != id);
        Ok(())
    }

    async fn list_subcategories(&self, category_id: &str) -> DbResult<Vec<Subcategory>> {
        let state = self.state.read().await;
        Ok(sorted(
            state
                .subcategories
                .values()
                .filter(|s| s.category_id == category_id),
        ))
    }

    async fn save_subcategory(&self, subcategory: &Subcategory) -> DbResult<()> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&subcategory.category_id) {
            return Err(DbError::foreign_key(format!(
                "category {} does not exist",
                subcategory.category_id
            )));
        }
        let moved = state
            .subcategories
            .get(&subcategory.id)
            .is_some_and(|existing| existing.category_id != subcategory.category_id);
        if moved {
            let used = state
                .products
                .values()
                .filter(|p| p.subcategory_id.as_deref() == Some(subcategory.id.as_str()))
                .count();
            if used > 0 {
                return Err(subcategory_in_use(&subcategory.id, used));
            }
        }

        upsert(&mut state.subcategories, &subcategory.id, subcategory);
        Ok(())
    }

    async fn delete_subcategory(&self, id: &str) -> DbResult<()> {
        let mut state = self.state.write().await;
        if state.subcategories.remove(id).is_none() {
            return Err(DbError::not_found("Subcategory", id));
        }
        for product in state.products.values_mut() {
            if product.subcategory_id.as_deref() == Some(id) {
                product.subcategory_id = None;
            }
        }
        Ok(())
    }

    async fn list_products(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let state = self.state.read().await;
        Ok(sorted(state.products.values().filter(|p| filter.matches(p))))
    }

    async fn get_product(&self, id: &str) -> DbResult<Product> {
        let state = self.state.read().await;
        state
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    async fn save_product(&self, product: &Product) -> DbResult<()> {
        check_product_record(product)?;

        let mut state = self.state.write().await;

        if let Some(subcategory_id) = &product.subcategory_id {
            let subcategory = state
                .subcategories
                .get(subcategory_id)
                .ok_or_else(|| DbError::not_found("Subcategory", subcategory_id))?;
            product.check_subcategory(subcategory)?;
        }
        if !state.merchants.contains_key(&product.merchant_id) {
            return Err(DbError::foreign_key(format!(
                "merchant {} does not exist",
                product.merchant_id
            )));
        }
        if !state.categories.contains_key(&product.category_id) {
            return Err(DbError::foreign_key(format!(
                "category {} does not exist",
                product.category_id
            )));
        }

        upsert(&mut state.products, &product.id, product);
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> DbResult<()> {
        let mut state = self.state.write().await;
        state
            .products
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("Product", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

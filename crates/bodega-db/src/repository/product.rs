//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Filtered Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Filtered Listing Runs                          │
//! │                                                                         │
//! │  ProductFilter { merchant_id, category_id, subcategory_id,             │
//! │                  only_available, search }                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQL narrows by ids + availability (indexed)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductFilter::matches() applies the text search                      │
//! │  (Unicode case folding; SQLite lower() is ASCII only)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<Product> ordered by (name, id)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bodega_core::{Product, ProductFilter};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let filter = ProductFilter::for_merchant(merchant_id).with_search("harina");
/// let products = repo.list(&filter).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product matching `filter`, ordered by name.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        debug!(?filter, "Listing products");

        let mut products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, merchant_id, category_id, subcategory_id, name, description,
                price_cents, image_url, is_available, created_at, updated_at
            FROM products
            WHERE (?1 IS NULL OR merchant_id = ?1)
              AND (?2 IS NULL OR category_id = ?2)
              AND (?3 IS NULL OR subcategory_id = ?3)
              AND (?4 = 0 OR is_available = 1)
            ORDER BY name, id
            "#,
        )
        .bind(&filter.merchant_id)
        .bind(&filter.category_id)
        .bind(&filter.subcategory_id)
        .bind(filter.only_available)
        .fetch_all(&self.pool)
        .await?;

        if filter.search_text().is_some() {
            products.retain(|product| filter.matches(product));
        }

        debug!(count = products.len(), "Listing returned products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, merchant_id, category_id, subcategory_id, name, description,
                price_cents, image_url, is_available, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts the product, or overwrites the row with the same id.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - merchant, category or
    ///   subcategory does not exist
    pub async fn upsert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Saving product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, merchant_id, category_id, subcategory_id, name, description,
                price_cents, image_url, is_available, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
                merchant_id = excluded.merchant_id,
                category_id = excluded.category_id,
                subcategory_id = excluded.subcategory_id,
                name = excluded.name,
                description = excluded.description,
                price_cents = excluded.price_cents,
                image_url = excluded.image_url,
                is_available = excluded.is_available,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.merchant_id)
        .bind(&product.category_id)
        .bind(&product.subcategory_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.image_url)
        .bind(product.is_available)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a product.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Number of products a category holds.
    pub async fn count_in_category(&self, category_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Number of products filed under a subcategory.
    pub async fn count_in_subcategory(&self, subcategory_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE subcategory_id = ?1")
                .bind(subcategory_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

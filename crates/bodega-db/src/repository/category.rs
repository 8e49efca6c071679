//! # Category Repository
//!
//! Categories and their subcategories.
//!
//! ## Delete Rules
//! ```text
//! DELETE category     → blocked while any product uses it (RESTRICT)
//!                     → its subcategories go with it (CASCADE)
//! DELETE subcategory  → products keep existing, subcategory_id = NULL
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bodega_core::{Category, MerchantKind, Subcategory};

/// Repository for category and subcategory operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists the categories of one merchant kind, ordered by name.
    pub async fn list(&self, kind: MerchantKind) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, kind, name, image_url, is_active, created_at, updated_at
            FROM categories
            WHERE kind = ?1
            ORDER BY name, id
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, kind, name, image_url, is_active, created_at, updated_at
            FROM categories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts the category, or overwrites the row with the same id.
    pub async fn upsert(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, name = %category.name, "Saving category");

        sqlx::query(
            r#"
            INSERT INTO categories (
                id, kind, name, image_url, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                kind = excluded.kind,
                name = excluded.name,
                image_url = excluded.image_url,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&category.id)
        .bind(category.kind)
        .bind(&category.name)
        .bind(&category.image_url)
        .bind(category.is_active)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a category.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - products still use it
    /// * `Err(DbError::NotFound)` - no such category
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Subcategories
    // -------------------------------------------------------------------------

    /// Lists the subcategories of a category, ordered by name.
    pub async fn list_subcategories(&self, category_id: &str) -> DbResult<Vec<Subcategory>> {
        let subcategories = sqlx::query_as::<_, Subcategory>(
            r#"
            SELECT id, category_id, name, is_active, created_at, updated_at
            FROM subcategories
            WHERE category_id = ?1
            ORDER BY name, id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subcategories)
    }

    /// Gets a subcategory by its ID.
    pub async fn get_subcategory(&self, id: &str) -> DbResult<Option<Subcategory>> {
        let subcategory = sqlx::query_as::<_, Subcategory>(
            r#"
            SELECT id, category_id, name, is_active, created_at, updated_at
            FROM subcategories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subcategory)
    }

    /// Inserts the subcategory, or overwrites the row with the same id.
    ///
    /// Fails with `ForeignKeyViolation` when the parent category is missing.
    pub async fn upsert_subcategory(&self, subcategory: &Subcategory) -> DbResult<()> {
        debug!(id = %subcategory.id, name = %subcategory.name, "Saving subcategory");

        sqlx::query(
            r#"
            INSERT INTO subcategories (
                id, category_id, name, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                category_id = excluded.category_id,
                name = excluded.name,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&subcategory.id)
        .bind(&subcategory.category_id)
        .bind(&subcategory.name)
        .bind(subcategory.is_active)
        .bind(subcategory.created_at)
        .bind(subcategory.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a subcategory; products that used it keep no subcategory.
    pub async fn delete_subcategory(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting subcategory");

        let result = sqlx::query("DELETE FROM subcategories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Subcategory", id));
        }

        Ok(())
    }
}

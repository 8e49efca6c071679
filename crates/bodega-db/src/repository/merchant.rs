//! # Merchant Repository
//!
//! Bodegones and restaurants share one table, told apart by `kind`.
//! Deleting a merchant removes its products (`ON DELETE CASCADE`).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bodega_core::{Merchant, MerchantKind};

const SELECT_MERCHANT: &str = r#"
    SELECT id, kind, name, address, phone_number, logo_url,
           is_active, created_at, updated_at
    FROM merchants
"#;

/// Repository for merchant database operations.
#[derive(Debug, Clone)]
pub struct MerchantRepository {
    pool: SqlitePool,
}

impl MerchantRepository {
    /// Creates a new MerchantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MerchantRepository { pool }
    }

    /// Lists merchants of one kind, ordered by name.
    pub async fn list(&self, kind: MerchantKind) -> DbResult<Vec<Merchant>> {
        let sql = format!("{SELECT_MERCHANT} WHERE kind = ?1 ORDER BY name, id");

        let merchants = sqlx::query_as::<_, Merchant>(&sql)
            .bind(kind)
            .fetch_all(&self.pool)
            .await?;

        debug!(kind = %kind, count = merchants.len(), "Listed merchants");
        Ok(merchants)
    }

    /// Gets a merchant by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Merchant))` - Merchant found
    /// * `Ok(None)` - Merchant not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Merchant>> {
        let sql = format!("{SELECT_MERCHANT} WHERE id = ?1");

        let merchant = sqlx::query_as::<_, Merchant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(merchant)
    }

    /// Inserts the merchant, or overwrites the row with the same id.
    ///
    /// `created_at` is never overwritten.
    pub async fn upsert(&self, merchant: &Merchant) -> DbResult<()> {
        debug!(id = %merchant.id, name = %merchant.name, "Saving merchant");

        sqlx::query(
            r#"
            INSERT INTO merchants (
                id, kind, name, address, phone_number, logo_url,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                kind = excluded.kind,
                name = excluded.name,
                address = excluded.address,
                phone_number = excluded.phone_number,
                logo_url = excluded.logo_url,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&merchant.id)
        .bind(merchant.kind)
        .bind(&merchant.name)
        .bind(&merchant.address)
        .bind(&merchant.phone_number)
        .bind(&merchant.logo_url)
        .bind(merchant.is_active)
        .bind(merchant.created_at)
        .bind(merchant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a merchant and, through the foreign key, its products.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting merchant");

        let result = sqlx::query("DELETE FROM merchants WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Merchant", id));
        }

        Ok(())
    }
}

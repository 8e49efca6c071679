//! # Database Pool Management
//!
//! Connection pool creation for the SQLite catalog.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Startup                                   │
//! │                                                                         │
//! │  BackendConfig.database.path = Some(..)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← pool settings                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                           │
//! │       ├── WAL journal, NORMAL sync, foreign keys ON                    │
//! │       ├── SqlitePool (max_connections)                                 │
//! │       └── embedded migrations                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<dyn CatalogSource> handed to the admin screens                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Foreign keys matter here: deleting a merchant cascades to its products
//! and a category cannot be deleted while products use it.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::category::CategoryRepository;
use crate::repository::merchant::MerchantRepository;
use crate::repository::product::ProductRepository;

const MEMORY: &str = ":memory:";

// =============================================================================
// Pool Settings
// =============================================================================

/// Where the catalog database lives and how the pool behaves.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/bodega/catalog.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    pub max_connections: u32,

    /// How long `acquire` waits before `PoolExhausted`.
    pub acquire_timeout: Duration,

    /// Apply embedded migrations right after connecting.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Settings for the file at `path`, created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// A private in-memory catalog, for tests.
    ///
    /// Limited to one connection: each `:memory:` connection would
    /// otherwise see its own empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(MEMORY)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn is_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY
    }

    /// Connection options: WAL journal, relaxed fsync, foreign keys on.
    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_memory() {
            "sqlite::memory:"
                .parse::<SqliteConnectOptions>()
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };

        // SQLite leaves foreign keys off unless asked per connection
        Ok(options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// SQLite-backed catalog handle.
///
/// Cheap to clone (the pool is reference counted). Repositories are
/// created on demand; [`crate::source::CatalogSource`] is implemented on top
/// of them.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, if enabled, applies migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening catalog database");

        let options = config.connect_options()?;
        debug!(memory = config.is_memory(), "Connection options ready");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            // a closed :memory: connection takes its data with it
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Catalog pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The underlying pool, for queries the repositories don't cover.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bodegones and restaurants.
    pub fn merchants(&self) -> MerchantRepository {
        MerchantRepository::new(self.pool.clone())
    }

    /// Categories and their subcategories.
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Products.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Closes the pool; later operations fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing catalog database");
        self.pool.close().await;
    }

    /// True when the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrated_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/bodega.db")
            .max_connections(8)
            .run_migrations(false);

        assert_eq!(config.max_connections, 8);
        assert!(!config.run_migrations);
        assert!(!config.is_memory());
        assert!(DbConfig::in_memory().is_memory());
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let path = std::env::temp_dir().join(format!("bodega-{}.db", uuid::Uuid::new_v4()));

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        sqlx::query("INSERT INTO categories (id, kind, name, is_active, created_at, updated_at) VALUES ('c1', 'bodegon', 'Bebidas', 1, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')")
            .execute(db.pool())
            .await
            .unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(reopened.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
        reopened.close().await;

        let _ = std::fs::remove_file(&path);
    }
}

//! # Data Source Error Types
//!
//! One error type for every way the outside world can fail: SQLite, the
//! image store, configuration files, plus domain errors bubbling up from
//! bodega-core.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / io::Error / toml::de::Error / CoreError                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← categorised, with entity/id context           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Admin UI shows a toast with `to_string()`                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The SQLite source and the mock source return the same variants for the
//! same situations (`NotFound` on a missing id, `ForeignKeyViolation` when
//! a category still has products), so callers never branch on the mode.

use bodega_core::{CoreError, ValidationError};
use thiserror::Error;

/// Data source, storage and configuration errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the row.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A row is still referenced, or references a missing row.
    ///
    /// ## When This Occurs
    /// - Deleting a category that products still use
    /// - Saving a product whose merchant or category does not exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The pool could not open or reach the database.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// An embedded migration did not apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected the statement.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No connection freed up before the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Image upload/delete failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration could not be read or is inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A domain rule rejected the data.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DbError {
    /// `{entity} not found: {id}`.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a ForeignKeyViolation error.
    pub fn foreign_key(message: impl Into<String>) -> Self {
        DbError::ForeignKeyViolation {
            message: message.into(),
        }
    }

    /// Returns true if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    /// Returns true if this is a ForeignKeyViolation error.
    pub fn is_foreign_key(&self) -> bool {
        matches!(self, DbError::ForeignKeyViolation { .. })
    }
}

/// Maps sqlx failures onto catalog error kinds.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → constraint kind from the SQLite message
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::foreign_key(msg)
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Core(CoreError::Validation(err))
    }
}

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        DbError::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for DbError {
    fn from(err: toml::de::Error) -> Self {
        DbError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DbError {
    fn from(err: toml::ser::Error) -> Self {
        DbError::Config(err.to_string())
    }
}

/// Result type for data source operations.
pub type DbResult<T> = Result<T, DbError>;

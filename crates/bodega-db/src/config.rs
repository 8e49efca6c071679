//! # Backend Configuration
//!
//! Where the catalog lives, where images go, and how tables page.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BODEGA_DB_PATH=/var/lib/bodega/catalog.db                          │
//! │     BODEGA_STORAGE_URL=https://cdn.example.com                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bodega-admin/bodega.toml (Linux)                         │
//! │     ~/Library/Application Support/com.bodega.admin/bodega.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     no database (mock catalog), ./storage, page size 10                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # bodega.toml
//! [database]
//! path = "/var/lib/bodega/catalog.db"
//! max_connections = 5
//!
//! [storage]
//! root_dir = "/var/lib/bodega/storage"
//! public_base_url = "https://cdn.example.com"
//! bucket = "images"
//!
//! [catalog]
//! default_page_size = 10
//! page_size_options = [10, 25, 50, 100]
//! ```
//!
//! Without `database.path` the admin runs on the in-memory sample catalog.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use bodega_core::validation::validate_page_size;
use bodega_core::{Paginator, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

// =============================================================================
// Database Settings
// =============================================================================

/// Catalog database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. `None` selects the mock catalog.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Maximum pool connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseSettings {
    /// Pool configuration, or `None` when no database is configured.
    pub fn db_config(&self) -> Option<DbConfig> {
        self.path
            .as_ref()
            .map(|path| DbConfig::new(path).max_connections(self.max_connections))
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Image storage settings.
///
/// Public URLs follow the object-storage layout
/// `{public_base_url}/storage/v1/object/public/{bucket}/{path}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding one sub-directory per bucket.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Base URL the stored files are served from.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Bucket for logos and product images.
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("storage")
}

fn default_public_base_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_bucket() -> String {
    "images".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            root_dir: default_root_dir(),
            public_base_url: default_public_base_url(),
            bucket: default_bucket(),
        }
    }
}

impl StorageSettings {
    fn public_prefix(&self) -> String {
        format!(
            "{}/storage/v1/object/public/{}/",
            self.public_base_url.trim_end_matches('/'),
            self.bucket
        )
    }

    /// Public URL of the object at `path` inside the bucket.
    ///
    /// ## Example
    /// ```rust
    /// use bodega_db::config::StorageSettings;
    ///
    /// let storage = StorageSettings::default();
    /// assert_eq!(
    ///     storage.public_url("products/a.png"),
    ///     "http://localhost:54321/storage/v1/object/public/images/products/a.png"
    /// );
    /// ```
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_prefix(), path.trim_start_matches('/'))
    }

    /// True when the bucket is one plain directory name, so objects
    /// cannot land outside `root_dir`.
    pub fn has_valid_bucket(&self) -> bool {
        let mut components = Path::new(&self.bucket).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => name == self.bucket.as_str(),
            _ => false,
        }
    }

    /// Object path for a public URL of this bucket; `None` for any other URL.
    pub fn path_from_public_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_prefix())
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

/// Table paging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Rows per page when a table first opens.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Sizes offered by the page-size selector.
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_page_size_options() -> Vec<usize> {
    PAGE_SIZE_OPTIONS.to_vec()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            default_page_size: default_page_size(),
            page_size_options: default_page_size_options(),
        }
    }
}

impl CatalogSettings {
    /// A paginator on page 1 using these settings.
    pub fn paginator<D>(&self, dependencies: D) -> Paginator<D> {
        Paginator::with_dependencies(self.default_page_size, dependencies)
            .with_page_size_options(self.page_size_options.clone())
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete backend configuration, passed explicitly to
/// [`crate::source::open_catalog`] and the image storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl BackendConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (bodega.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading backend config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| DbError::Config(format!("{}: {e}", path.display())))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file, creating the parent directory.
    pub fn save(&self, config_path: Option<PathBuf>) -> DbResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DbError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbError::Config(format!("{}: {e}", parent.display())))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| DbError::Config(format!("{}: {e}", path.display())))?;

        info!(?path, "Backend config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DbResult<()> {
        if self.database.max_connections == 0 {
            return Err(DbError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.storage.bucket.trim().is_empty() || !self.storage.has_valid_bucket() {
            return Err(DbError::Config(format!(
                "Storage bucket must be a single directory name, got: '{}'",
                self.storage.bucket
            )));
        }

        let url = &self.storage.public_base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(DbError::Config(format!(
                "Storage URL must start with http:// or https://, got: {url}"
            )));
        }

        let options = &self.catalog.page_size_options;
        if options.is_empty() || options.contains(&0) {
            return Err(DbError::Config(
                "page_size_options must be non-empty and positive".into(),
            ));
        }
        validate_page_size(self.catalog.default_page_size, options)?;

        Ok(())
    }

    /// Applies `BODEGA_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("BODEGA_DB_PATH") {
            if path.trim().is_empty() {
                debug!("Database disabled from environment");
                self.database.path = None;
            } else {
                debug!(path = %path, "Overriding database path from environment");
                self.database.path = Some(PathBuf::from(path));
            }
        }

        if let Some(max) = lookup("BODEGA_DB_MAX_CONNECTIONS") {
            match max.parse() {
                Ok(max) => self.database.max_connections = max,
                Err(_) => warn!(value = %max, "Ignoring invalid BODEGA_DB_MAX_CONNECTIONS"),
            }
        }

        if let Some(root) = lookup("BODEGA_STORAGE_ROOT") {
            self.storage.root_dir = PathBuf::from(root);
        }

        if let Some(url) = lookup("BODEGA_STORAGE_URL") {
            debug!(url = %url, "Overriding storage URL from environment");
            self.storage.public_base_url = url;
        }

        if let Some(bucket) = lookup("BODEGA_STORAGE_BUCKET") {
            self.storage.bucket = bucket;
        }

        if let Some(size) = lookup("BODEGA_PAGE_SIZE") {
            match size.parse() {
                Ok(size) => self.catalog.default_page_size = size,
                Err(_) => warn!(value = %size, "Ignoring invalid BODEGA_PAGE_SIZE"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bodega", "admin")
            .map(|dirs| dirs.config_dir().join("bodega.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

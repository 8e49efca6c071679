//! # Image Storage
//!
//! Merchant logos and product images.
//!
//! ## Upload Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Image Upload                                         │
//! │                                                                         │
//! │  Admin picks "arepa.JPG" in the product form                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  object_path("products", "arepa.JPG") → "products/<uuid>.jpg"          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  {root_dir}/{bucket}/products/<uuid>.jpg written                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoredImage { path, public_url } → product.image_url = public_url     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Replacing an image deletes the old object through
//! [`StorageSettings::path_from_public_url`].

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::StorageSettings;
use crate::error::{DbError, DbResult};

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Path inside the bucket, e.g. `products/<uuid>.png`.
    pub path: String,
    /// URL the storefront loads the image from.
    pub public_url: String,
}

/// Object storage for catalog images.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Stores `bytes` under `folder` with a fresh name keeping
    /// `file_name`'s extension.
    async fn upload(&self, folder: &str, file_name: &str, bytes: &[u8]) -> DbResult<StoredImage>;

    /// Removes the object at `path`. Missing objects are not an error.
    async fn delete(&self, path: &str) -> DbResult<()>;
}

/// Unique object path `{folder}/{uuid}.{ext}` for an upload.
///
/// The extension is lower-cased; files without one get `bin`.
pub fn object_path(folder: &str, file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "bin".to_string());

    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        format!("{}.{ext}", Uuid::new_v4())
    } else {
        format!("{folder}/{}.{ext}", Uuid::new_v4())
    }
}

/// Checks that `path` stays inside the bucket.
fn checked_relative(path: &str) -> DbResult<&Path> {
    let relative = Path::new(path);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));

    if path.is_empty() || escapes {
        return Err(DbError::Storage(format!("invalid object path: '{path}'")));
    }
    Ok(relative)
}

// =============================================================================
// Local Filesystem Storage
// =============================================================================

/// Stores images under `{root_dir}/{bucket}` on the local disk.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    settings: StorageSettings,
}

impl LocalImageStorage {
    pub fn new(settings: StorageSettings) -> Self {
        LocalImageStorage { settings }
    }

    pub fn settings(&self) -> &StorageSettings {
        &self.settings
    }

    fn bucket_dir(&self) -> DbResult<PathBuf> {
        if !self.settings.has_valid_bucket() {
            return Err(DbError::Storage(format!(
                "invalid bucket name: '{}'",
                self.settings.bucket
            )));
        }
        Ok(self.settings.root_dir.join(&self.settings.bucket))
    }

    /// On-disk location of the object at `path`.
    pub fn file_path(&self, path: &str) -> DbResult<PathBuf> {
        Ok(self.bucket_dir()?.join(checked_relative(path)?))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn upload(&self, folder: &str, file_name: &str, bytes: &[u8]) -> DbResult<StoredImage> {
        if bytes.is_empty() {
            return Err(DbError::Storage(format!("'{file_name}' is empty")));
        }

        let path = object_path(folder, file_name);
        let target = self.file_path(&path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;

        info!(path = %path, size = bytes.len(), "Image stored");
        Ok(StoredImage {
            public_url: self.settings.public_url(&path),
            path,
        })
    }

    async fn delete(&self, path: &str) -> DbResult<()> {
        let target = self.file_path(path)?;

        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                debug!(path = %path, "Image deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> LocalImageStorage {
        LocalImageStorage::new(StorageSettings {
            root_dir: std::env::temp_dir().join(format!("bodega-storage-{}", Uuid::new_v4())),
            ..StorageSettings::default()
        })
    }

    #[test]
    fn test_object_path() {
        let path = object_path("products", "Arepa.JPG");
        let (folder, name) = path.split_once('/').unwrap();
        assert_eq!(folder, "products");
        assert!(name.ends_with(".jpg"));
        assert!(Uuid::parse_str(name.trim_end_matches(".jpg")).is_ok());

        assert!(object_path("logos/", "logo").ends_with(".bin"));
        assert!(!object_path("", "a.png").contains('/'));
        assert_ne!(object_path("x", "a.png"), object_path("x", "a.png"));
    }

    #[test]
    fn test_paths_cannot_escape_bucket() {
        let storage = temp_storage();
        assert!(storage.file_path("../secrets.txt").is_err());
        assert!(storage.file_path("/etc/passwd").is_err());
        assert!(storage.file_path("").is_err());
        assert!(storage.file_path("products/a.png").is_ok());
    }

    #[tokio::test]
    async fn test_upload_and_delete() {
        let storage = temp_storage();

        let stored = storage
            .upload("products", "harina.png", b"\x89PNG fake")
            .await
            .unwrap();
        assert!(stored.path.starts_with("products/"));
        assert_eq!(
            storage.settings().path_from_public_url(&stored.public_url),
            Some(stored.path.clone())
        );

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["path"], stored.path.as_str());

        let on_disk = storage.file_path(&stored.path).unwrap();
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), b"\x89PNG fake");

        storage.delete(&stored.path).await.unwrap();
        assert!(!on_disk.exists());
        // second delete is a no-op
        storage.delete(&stored.path).await.unwrap();

        let _ = tokio::fs::remove_dir_all(&storage.settings().root_dir).await;
    }

    #[tokio::test]
    async fn test_bucket_cannot_escape_root() {
        let mut settings = temp_storage().settings().clone();
        settings.bucket = "..".into();
        let storage = LocalImageStorage::new(settings);

        let err = storage.upload("products", "a.png", b"png").await.unwrap_err();
        assert!(matches!(err, DbError::Storage(_)));
        assert!(storage.delete("products/a.png").await.is_err());
        assert!(!storage.settings().root_dir.exists());
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let storage = temp_storage();
        let err = storage.upload("logos", "logo.png", &[]).await.unwrap_err();
        assert!(matches!(err, DbError::Storage(_)));
    }
}

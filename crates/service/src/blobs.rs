//! Content blob store for uploaded image bytes.
//!
//! A thin wrapper around `object_store`, keyed by the filename locator
//! stored on the image record. The store holds raw bytes only; every
//! access decision has already been made by the time this layer is
//! consulted.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};

/// Configuration for the blob storage backend.
#[derive(Debug, Clone, Default)]
pub enum BlobStoreConfig {
    /// In-memory storage (for testing)
    #[default]
    Memory,

    /// Local filesystem storage
    Local {
        /// Path to the uploads directory
        path: PathBuf,
    },
}

/// Wrapper around the configured storage backend.
#[derive(Debug, Clone)]
pub struct BlobStore {
    inner: Arc<dyn ObjectStore>,
}

impl BlobStore {
    pub async fn new(config: BlobStoreConfig) -> Result<Self, BlobStoreError> {
        let inner: Arc<dyn ObjectStore> = match &config {
            BlobStoreConfig::Memory => Arc::new(InMemory::new()),
            BlobStoreConfig::Local { path } => {
                tokio::fs::create_dir_all(path).await?;
                Arc::new(
                    LocalFileSystem::new_with_prefix(path)
                        .map_err(|e| BlobStoreError::InvalidConfig(e.to_string()))?,
                )
            }
        };
        Ok(Self { inner })
    }

    /// Store uploaded bytes under a locator.
    pub async fn put(&self, locator: &str, bytes: Bytes) -> Result<(), BlobStoreError> {
        let path = ObjectPath::from(locator);
        self.inner.put(&path, PutPayload::from(bytes)).await?;
        Ok(())
    }

    /// Read the full content for a locator.
    pub async fn get(&self, locator: &str) -> Result<Bytes, BlobStoreError> {
        let path = ObjectPath::from(locator);
        let result = self.inner.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => BlobStoreError::NotFound(locator.to_string()),
            other => BlobStoreError::ObjectStore(other),
        })?;
        Ok(result.bytes().await?)
    }

    /// Remove the content for a locator. Missing content is not an
    /// error; the record is authoritative.
    pub async fn delete(&self, locator: &str) -> Result<(), BlobStoreError> {
        let path = ObjectPath::from(locator);
        match self.inner.delete(&path).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(BlobStoreError::ObjectStore(e)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("blob not found: {0}")]
    NotFound(String),
}

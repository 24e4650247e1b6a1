//! Attachment object storage.
//!
//! Handlers talk to an [`AttachmentStore`] held in `AppState`; the server
//! wires in [`LocalAttachmentStore`], which writes under a directory that is
//! also served at the public base URL.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use backoffice_core::attachment::{key_from_public_url, public_url, validate_key};
use backoffice_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    InvalidKey(CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Key/value object store for attachment bytes.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object. Returns the
    /// public URL of the object.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Remove the object at `key`. Removing a missing object succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Whether an object exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Map a URL produced by [`put`](Self::put) back to its key.
    fn key_for_url<'a>(&self, url: &'a str) -> Option<&'a str>;
}

/// Filesystem-backed store rooted at one directory.
#[derive(Debug, Clone)]
pub struct LocalAttachmentStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAttachmentStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key).map_err(StorageError::InvalidKey)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(key, size = bytes.len(), "Attachment stored");
        Ok(public_url(&self.public_base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key, "Attachment removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    fn key_for_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        key_from_public_url(&self.public_base_url, url)
    }
}

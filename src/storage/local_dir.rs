//! Blob store backed by a plain directory, for running without a cloud account.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::{WeedScopeError, WeedScopeResult};
use crate::storage::{validate_blob_name, BlobStore};

pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, name: &str) -> WeedScopeResult<PathBuf> {
        validate_blob_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for LocalDirStore {
    fn name(&self) -> &str {
        "local-dir"
    }

    async fn write(&self, name: &str, data: Vec<u8>, _content_type: &str) -> WeedScopeResult<()> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            WeedScopeError::Storage(format!("creating {}: {e}", self.root.display()))
        })?;
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| WeedScopeError::Storage(format!("writing '{name}': {e}")))?;
        tracing::debug!(path = %path.display(), size = data.len(), "blob written");
        Ok(())
    }

    async fn read(&self, name: &str) -> WeedScopeResult<Vec<u8>> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(WeedScopeError::Storage(format!("blob '{name}' not found")))
            }
            Err(e) => Err(WeedScopeError::Storage(format!("reading '{name}': {e}"))),
        }
    }
}

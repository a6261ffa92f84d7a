pub mod azure_blob;
pub mod local_dir;
#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{StorageBackend, StorageConfig};
use crate::errors::{WeedScopeError, WeedScopeResult};

pub use azure_blob::AzureBlobStore;
pub use local_dir::LocalDirStore;

/// Flat namespace of named blobs. Writes overwrite unconditionally.
#[async_trait]
pub trait BlobStore: Send + Sync {
    fn name(&self) -> &str;

    async fn write(&self, name: &str, data: Vec<u8>, content_type: &str) -> WeedScopeResult<()>;

    async fn read(&self, name: &str) -> WeedScopeResult<Vec<u8>>;
}

/// Blob names are single path segments.
pub fn validate_blob_name(name: &str) -> WeedScopeResult<()> {
    if name.trim().is_empty() {
        return Err(WeedScopeError::InvalidInput("blob name is empty".into()));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(WeedScopeError::InvalidInput(format!(
            "blob name '{name}' must not contain path separators"
        )));
    }
    Ok(())
}

/// Store for analysis artifacts, and the store sample images are read from.
pub struct Stores {
    pub predictions: Arc<dyn BlobStore>,
    pub samples: Arc<dyn BlobStore>,
}

pub fn build_stores(config: &StorageConfig) -> WeedScopeResult<Stores> {
    let predictions: Arc<dyn BlobStore> = match config.backend {
        StorageBackend::Azure => Arc::new(AzureBlobStore::with_sas(
            &config.account_url,
            &config.container,
            &config.sas_token,
        )?),
        StorageBackend::Local => Arc::new(LocalDirStore::new(&config.local_dir)),
    };

    let samples: Arc<dyn BlobStore> = if config.sample_url.trim().is_empty() {
        Arc::new(LocalDirStore::new(config.local_dir.join("samples")))
    } else {
        Arc::new(AzureBlobStore::anonymous(&config.sample_url)?)
    };

    tracing::info!(
        predictions = predictions.name(),
        samples = samples.name(),
        "blob stores ready"
    );
    Ok(Stores { predictions, samples })
}

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{WeedScopeError, WeedScopeResult};
use crate::storage::{validate_blob_name, BlobStore};

/// In-process store for tests. `failing()` rejects every write;
/// `failing_from(n)` accepts the first `n` writes and rejects the rest.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, (Vec<u8>, String)>>,
    writes: Mutex<usize>,
    accepted_writes: Option<usize>,
}

impl MemoryBlobStore {
    pub fn with_blob(name: &str, data: &[u8]) -> Self {
        let store = Self::default();
        store
            .blobs
            .lock()
            .unwrap()
            .insert(name.to_string(), (data.to_vec(), "application/octet-stream".into()));
        store
    }

    pub fn failing() -> Self {
        Self::failing_from(0)
    }

    pub fn failing_from(accepted_writes: usize) -> Self {
        Self {
            accepted_writes: Some(accepted_writes),
            ..Self::default()
        }
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(name).map(|(data, _)| data.clone())
    }

    pub fn content_type(&self, name: &str) -> Option<String> {
        self.blobs.lock().unwrap().get(name).map(|(_, ct)| ct.clone())
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write(&self, name: &str, data: Vec<u8>, content_type: &str) -> WeedScopeResult<()> {
        validate_blob_name(name)?;
        let mut writes = self.writes.lock().unwrap();
        if self.accepted_writes.is_some_and(|limit| *writes >= limit) {
            return Err(WeedScopeError::Storage(format!("upload of '{name}' rejected")));
        }
        *writes += 1;
        self.blobs
            .lock()
            .unwrap()
            .insert(name.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn read(&self, name: &str) -> WeedScopeResult<Vec<u8>> {
        validate_blob_name(name)?;
        self.get(name)
            .ok_or_else(|| WeedScopeError::Storage(format!("blob '{name}' not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_blobs_and_rejects_after_limit() {
        let store = MemoryBlobStore::failing_from(1);
        assert!(store.is_empty());

        store.write("a.json", b"{}".to_vec(), "application/json").await.unwrap();
        assert!(!store.is_empty());
        assert_eq!(store.len(), 1);

        let err = store.write("b.jpg", vec![1], "image/jpeg").await.unwrap_err();
        assert!(matches!(err, WeedScopeError::Storage(_)));
        assert_eq!(store.write_count(), 1);
    }
}

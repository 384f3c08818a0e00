use crate::{MemoryObjectStore, ObjectStore, S3Config, S3ObjectStore, StorageResult};
use std::sync::Arc;

/// Storage backend type
pub enum StorageBackend {
    /// S3-compatible object storage
    S3(S3Config),
    /// Process-local store; contents are lost on exit
    Memory,
}

impl StorageBackend {
    /// Build the backend and make sure its bucket is usable
    pub async fn initialize(self) -> StorageResult<Arc<dyn ObjectStore>> {
        let store: Arc<dyn ObjectStore> = match self {
            StorageBackend::S3(config) => Arc::new(S3ObjectStore::new(config).await),
            StorageBackend::Memory => Arc::new(MemoryObjectStore::new()),
        };
        store.ensure_bucket().await?;
        Ok(store)
    }
}

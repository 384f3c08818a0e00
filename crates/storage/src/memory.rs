//! In-process object store for local runs and tests

use crate::{ObjectStore, ObjectStream, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Size of the chunks `get` yields
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, Bytes>>,
    bucket_ready: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    pub fn bucket_ready(&self) -> bool {
        self.bucket_ready.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn ensure_bucket(&self) -> StorageResult<()> {
        self.bucket_ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn put(&self, key: &str, source: &Path) -> StorageResult<()> {
        let content = tokio::fs::read(source)
            .await
            .map_err(|e| StorageError::Backend(format!("read upload for {}: {}", key, e)))?;
        self.objects
            .write()
            .await
            .insert(key.to_string(), Bytes::from(content));
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<ObjectStream> {
        let content = self
            .objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        let chunks: Vec<Result<Bytes, std::io::Error>> = (0..content.len())
            .step_by(CHUNK_SIZE)
            .map(|start| {
                let end = (start + CHUNK_SIZE).min(content.len());
                Ok(content.slice(start..end))
            })
            .collect();

        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}

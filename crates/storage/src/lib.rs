pub mod backend;
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;

pub use backend::StorageBackend;
pub use memory::MemoryObjectStore;
pub use s3::{S3Config, S3ObjectStore};

/// Object body delivered chunk by chunk
pub type ObjectStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object {0} not found")]
    NotFound(String),
    #[error("{0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Object-storage capability used by the gateway.
/// Keys are `folder/filename` paths inside a single bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Check the bucket and create it when absent. Safe to call repeatedly.
    async fn ensure_bucket(&self) -> StorageResult<()>;

    /// Write the file at `source` under `key`, replacing any existing object
    async fn put(&self, key: &str, source: &Path) -> StorageResult<()>;

    /// Open the object under `key` as a stream
    async fn get(&self, key: &str) -> StorageResult<ObjectStream>;

    /// Remove the object under `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;
}

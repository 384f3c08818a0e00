//! S3-compatible object storage
//!
//! Talks to any S3 endpoint (AWS, MinIO, RustFS) through `aws-sdk-s3` using
//! path-style addressing.

use crate::{ObjectStore, ObjectStream, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use std::fmt;
use std::path::Path;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

/// Region whose buckets are created without a location constraint
const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Connection settings for an S3-compatible endpoint
#[derive(Clone)]
pub struct S3Config {
    /// Custom endpoint; `None` uses AWS
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
}

impl S3ObjectStore {
    pub async fn new(config: S3Config) -> Self {
        let credentials = Credentials::new(
            config.access_key,
            config.secret_key,
            None,
            None,
            "fileuploader-gateway",
        );

        let mut builder = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = config.endpoint.as_deref().map(normalize_endpoint) {
            info!("Using custom S3 endpoint: {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        } else {
            info!("Using default AWS S3 endpoint");
        }

        let aws_config = builder.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket,
            region: config.region,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn ensure_bucket(&self) -> StorageResult<()> {
        info!("Checking if bucket '{}' exists...", self.bucket);
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                info!("Bucket '{}' already exists", self.bucket);
                return Ok(());
            }
            Err(e) => debug!("Bucket check failed: {}", DisplayErrorContext(&e)),
        }

        info!("Creating bucket '{}'", self.bucket);
        let request = self
            .client
            .create_bucket()
            .bucket(&self.bucket)
            .set_create_bucket_configuration(bucket_configuration(&self.region));
        match request.send().await {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket);
                Ok(())
            }
            Err(e) => {
                let details = format!("{:?}", e);
                if details.contains("BucketAlreadyOwnedByYou")
                    || details.contains("BucketAlreadyExists")
                {
                    info!("Bucket '{}' already exists", self.bucket);
                    Ok(())
                } else {
                    Err(StorageError::Backend(format!(
                        "create bucket {}: {}",
                        self.bucket,
                        DisplayErrorContext(&e)
                    )))
                }
            }
        }
    }

    async fn put(&self, key: &str, source: &Path) -> StorageResult<()> {
        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| StorageError::Backend(format!("read upload for {}: {}", key, e)))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("put {}: {}", key, DisplayErrorContext(&e))))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<ObjectStream> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::Backend(format!("get {}: {}", key, DisplayErrorContext(&e)))
                }
            })?;

        Ok(Box::pin(ReaderStream::new(resp.body.into_async_read())))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                StorageError::Backend(format!("delete {}: {}", key, DisplayErrorContext(&e)))
            })?;
        Ok(())
    }
}

fn is_not_found<E>(err: &SdkError<E>) -> bool {
    matches!(err, SdkError::ServiceError(e) if e.raw().status().as_u16() == 404)
}

/// AWS rejects CreateBucket outside `us-east-1` unless the region is named
/// as the location constraint; `us-east-1` itself must not be sent.
fn bucket_configuration(region: &str) -> Option<CreateBucketConfiguration> {
    if region.is_empty() || region == DEFAULT_AWS_REGION {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}

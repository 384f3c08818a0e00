//! Upload, render and delete operations.
//!
//! Clients only ever see tokens; the gateway turns them back into storage
//! keys, performs a single bounded backend call per file and maps every
//! outcome onto a [`GatewayError`].

use crate::error::GatewayError;
use common::file_utils::{sanitize_filename, validate_folder, FolderValidationError};
use common::{
    DeleteResponse, FailedFile, StorageKey, UploadMultiResponse, UploadResponse, UploadedFile,
};
use crypto::TokenCodec;
use futures::{StreamExt, TryStreamExt};
use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use storage::{ObjectStore, ObjectStream, StorageError, StorageResult};
use tracing::{error, info, warn};

/// A file received from a client, already spooled to disk
#[derive(Debug, Clone, Copy)]
pub struct FileUpload<'a> {
    /// Name as sent by the client, unsanitized
    pub name: Option<&'a str>,
    pub path: &'a Path,
}

/// A stored object ready to be streamed back
pub struct RenderedObject {
    pub filename: String,
    pub content_type: String,
    pub body: ObjectStream,
}

pub struct Gateway {
    store: Arc<dyn ObjectStore>,
    codec: TokenCodec,
    render_base: String,
    backend_timeout: Duration,
}

impl Gateway {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        codec: TokenCodec,
        base_url: &str,
        route_prefix: &str,
        backend_timeout: Duration,
    ) -> Self {
        Self {
            store,
            codec,
            render_base: format!("{}{}/render/", base_url, route_prefix),
            backend_timeout,
        }
    }

    pub fn render_url(&self, token: &str) -> String {
        format!("{}{}", self.render_base, token)
    }

    /// Store one file under `folder` and return its render URL
    pub async fn upload(
        &self,
        folder: Option<&str>,
        file: Option<FileUpload<'_>>,
    ) -> Result<UploadResponse, GatewayError> {
        let folder = checked_folder(folder)?;
        let file = file
            .filter(|f| client_filename(f).is_some())
            .ok_or_else(|| GatewayError::validation("No file provided"))?;
        let key = client_filename(&file)
            .and_then(|name| storage_key(folder, name))
            .ok_or_else(|| GatewayError::validation("Invalid filename"))?;

        let url = self.store_file(&key, file.path).await?;

        info!(key = ?key.to_string(), "File uploaded");
        Ok(UploadResponse {
            message: "File uploaded".to_string(),
            url,
        })
    }

    /// Store several files under `folder`, one backend write each.
    /// Unnamed entries are skipped; a failed write is reported per file and
    /// the remaining files are still attempted.
    pub async fn upload_multiple(
        &self,
        folder: Option<&str>,
        files: &[FileUpload<'_>],
    ) -> Result<UploadMultiResponse, GatewayError> {
        let folder = checked_folder(folder)?;
        if files.is_empty() {
            return Err(GatewayError::validation("No files uploaded"));
        }

        let mut uploaded = Vec::new();
        let mut failed = Vec::new();

        for file in files {
            let Some(key) = client_filename(file).and_then(|name| storage_key(folder, name))
            else {
                continue;
            };

            match self.store_file(&key, file.path).await {
                Ok(url) => uploaded.push(UploadedFile {
                    filename: key.filename,
                    url,
                }),
                Err(e) => failed.push(FailedFile {
                    filename: key.filename,
                    error: e.to_string(),
                }),
            }
        }

        info!(
            folder = ?folder,
            uploaded = uploaded.len(),
            failed = failed.len(),
            "Multi-file upload finished"
        );

        Ok(UploadMultiResponse {
            message: format!("{} files uploaded", uploaded.len()),
            files: uploaded,
            errors: failed,
        })
    }

    /// Resolve a token and open the object it points at
    pub async fn render(&self, token: &str) -> Result<RenderedObject, GatewayError> {
        let key = self.decode(token)?;
        let path = key.to_string();

        let body = match self.bounded("get", self.store.get(&path)).await {
            Ok(body) => body,
            Err(e) => {
                warn!(key = ?path, error = %e, "Failed to fetch object");
                return Err(GatewayError::NotFound);
            }
        };

        let content_type = mime_guess::from_path(&key.filename)
            .first_or_octet_stream()
            .to_string();

        // Read failures after the headers are sent abort the response.
        // A backend that stops sending data counts as a read failure.
        let stall_limit = self.backend_timeout;
        let body = tokio_stream::StreamExt::timeout(body, stall_limit)
            .map(move |chunk| {
                chunk.unwrap_or_else(|_| {
                    Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("no data for {}s", stall_limit.as_secs_f32()),
                    ))
                })
            })
            .inspect_err(move |e| error!(key = ?path, error = %e, "Object stream aborted"))
            .boxed();

        Ok(RenderedObject {
            filename: key.filename,
            content_type,
            body,
        })
    }

    pub async fn delete(&self, token: &str) -> Result<DeleteResponse, GatewayError> {
        let key = self.decode(token)?;
        let path = key.to_string();

        self.bounded("delete", self.store.delete(&path))
            .await
            .map_err(|e| {
                error!(key = ?path, error = %e, "Failed to delete object");
                GatewayError::Backend(e.to_string())
            })?;

        info!(key = ?path, "File deleted");
        Ok(DeleteResponse {
            message: format!("{} deleted", key.filename),
        })
    }

    async fn store_file(&self, key: &StorageKey, source: &Path) -> Result<String, GatewayError> {
        let token = self.codec.encode_key(key)?;
        let path = key.to_string();

        self.bounded("put", self.store.put(&path, source))
            .await
            .map_err(|e| {
                error!(key = ?path, error = %e, "Failed to store file");
                GatewayError::Backend(e.to_string())
            })?;

        Ok(self.render_url(&token))
    }

    fn decode(&self, token: &str) -> Result<StorageKey, GatewayError> {
        self.codec.decode(token).map_err(|e| {
            warn!("Rejected token: {}", e);
            GatewayError::validation("Invalid token")
        })
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = StorageResult<T>>,
    ) -> StorageResult<T> {
        tokio::time::timeout(self.backend_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(StorageError::Backend(format!(
                    "{} timed out after {}s",
                    operation,
                    self.backend_timeout.as_secs_f32()
                )))
            })
    }
}

fn checked_folder(folder: Option<&str>) -> Result<&str, GatewayError> {
    let folder = folder.unwrap_or_default();
    match validate_folder(folder) {
        Ok(()) => Ok(folder),
        Err(FolderValidationError::Empty) => Err(GatewayError::validation("No folder specified")),
        Err(e) => Err(GatewayError::validation(format!("Invalid folder: {}", e))),
    }
}

fn client_filename<'a>(file: &FileUpload<'a>) -> Option<&'a str> {
    file.name.filter(|name| !name.is_empty())
}

fn storage_key(folder: &str, client_name: &str) -> Option<StorageKey> {
    let filename = sanitize_filename(client_name);
    (!filename.is_empty()).then(|| StorageKey::new(folder, filename))
}

use crate::config::api_base;
use crate::constants::{UPLOAD_ENDPOINT, UPLOAD_MULTI_ENDPOINT};
use crate::response;
use anyhow::{Context, Result};
use common::{UploadMultiResponse, UploadResponse};
use log::{info, warn};
use reqwest::blocking::{multipart, Client};
use std::path::{Path, PathBuf};

/// Handles file uploads to the server
pub struct FileUploader {
    client: Client,
    api_base: String,
    folder: String,
}

impl FileUploader {
    /// Create a new file uploader targeting `folder` on `server`
    pub fn new(server: &str, folder: String) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base(server),
            folder,
        }
    }

    /// Upload a single file and return its render URL
    pub fn upload(&self, path: &Path) -> Result<String> {
        let form = multipart::Form::new()
            .text("folder", self.folder.clone())
            .file("file", path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;

        let url = format!("{}{}", self.api_base, UPLOAD_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .context("Failed to connect to server")?;
        let result: UploadResponse = response::check(response, "Upload")?
            .json()
            .context("Unexpected upload response")?;

        info!("{}: {:?}", result.message, path);
        println!("URL: {}", result.url);
        Ok(result.url)
    }

    /// Upload several files in one request and return the stored files' URLs
    pub fn upload_multi(&self, paths: &[PathBuf]) -> Result<Vec<String>> {
        if paths.is_empty() {
            anyhow::bail!("No files given");
        }

        let mut form = multipart::Form::new().text("folder", self.folder.clone());
        for path in paths {
            form = form
                .file("files", path)
                .with_context(|| format!("Failed to read file: {:?}", path))?;
        }

        let url = format!("{}{}", self.api_base, UPLOAD_MULTI_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .context("Failed to connect to server")?;
        let result: UploadMultiResponse = response::check(response, "Upload")?
            .json()
            .context("Unexpected upload response")?;

        info!("{}", result.message);
        for file in &result.files {
            println!("{} URL: {}", file.filename, file.url);
        }
        for failed in &result.errors {
            warn!("Upload failed for {}: {}", failed.filename, failed.error);
            println!("{} FAILED: {}", failed.filename, failed.error);
        }

        Ok(result.files.into_iter().map(|f| f.url).collect())
    }
}

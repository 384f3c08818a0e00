pub mod file_utils;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend object path: `folder/filename`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StorageKey {
    pub folder: String,
    pub filename: String,
}

impl StorageKey {
    pub fn new(folder: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            filename: filename.into(),
        }
    }

    /// Split a raw `folder/filename` path on its last separator.
    /// Folders may be nested; filenames never contain `/`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.rsplit_once('/')
            .map(|(folder, filename)| Self::new(folder, filename))
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.folder, self.filename)
    }
}

/// Response to a single-file upload
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UploadResponse {
    pub message: String,
    pub url: String, // render URL embedding the file token
}

/// One successfully stored file in a multi-file upload
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String, // sanitized filename
    pub url: String,
}

/// One file whose backend write failed in a multi-file upload
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FailedFile {
    pub filename: String,
    pub error: String,
}

/// Response to a multi-file upload
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UploadMultiResponse {
    pub message: String, // "<N> files uploaded"
    pub files: Vec<UploadedFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FailedFile>,
}

/// Response to a delete request
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeleteResponse {
    pub message: String, // "<filename> deleted"
}

/// JSON body of every error response
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response from health check endpoint
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String, // "ok" when healthy
}

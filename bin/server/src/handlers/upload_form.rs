use crate::gateway::FileUpload;
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm, MultipartFormConfig};
use actix_multipart::MultipartError;
use actix_web::error::{InternalError, PayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::ErrorResponse;

/// Multipart form for a single-file upload.
/// Fields are optional so missing ones reach the gateway's validation.
#[derive(MultipartForm)]
pub struct UploadForm {
    /// Target folder
    pub folder: Option<Text<String>>,

    /// The file being uploaded
    #[multipart(limit = "100MB")]
    pub file: Option<TempFile>,
}

impl UploadForm {
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_ref().map(|folder| folder.0.as_str())
    }

    pub fn file(&self) -> Option<FileUpload<'_>> {
        self.file.as_ref().map(as_upload)
    }
}

/// Multipart form for a multi-file upload
#[derive(MultipartForm)]
pub struct UploadMultiForm {
    /// Target folder shared by all files
    pub folder: Option<Text<String>>,

    /// Files being uploaded; the field repeats once per file
    #[multipart(limit = "100MB")]
    pub files: Vec<TempFile>,
}

impl UploadMultiForm {
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_ref().map(|folder| folder.0.as_str())
    }

    pub fn files(&self) -> Vec<FileUpload<'_>> {
        self.files.iter().map(as_upload).collect()
    }
}

fn as_upload(file: &TempFile) -> FileUpload<'_> {
    FileUpload {
        name: file.file_name.as_deref(),
        path: file.file.path(),
    }
}

/// Multipart limits with JSON error bodies
pub fn multipart_config(total_limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(total_limit)
        .error_handler(|err, _req| {
            let (status, message) = upload_error(&err);
            let response = HttpResponse::build(status).json(ErrorResponse { error: message });
            InternalError::from_response(err, response).into()
        })
}

/// Status and client message for a rejected multipart request.
/// Both the per-field and the total limit surface as a payload overflow.
fn upload_error(err: &MultipartError) -> (StatusCode, String) {
    match err {
        MultipartError::Payload(PayloadError::Overflow) => {
            (StatusCode::PAYLOAD_TOO_LARGE, "File too large".to_string())
        }
        _ => (err.status_code(), format!("Invalid upload: {}", err)),
    }
}

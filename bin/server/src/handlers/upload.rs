use crate::error::GatewayError;
use crate::handlers::upload_form::{UploadForm, UploadMultiForm};
use crate::state::AppState;
use actix_multipart::form::MultipartForm;
use actix_web::{post, web, HttpResponse};
use tracing::info;

/// Handle single-file upload (multipart/form-data: `folder`, `file`)
#[post("/upload")]
pub async fn upload(
    form: MultipartForm<UploadForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    // Debug formatting escapes control characters in client-supplied names
    info!(
        folder = ?form.folder(),
        filename = ?form.file.as_ref().and_then(|f| f.file_name.as_deref()),
        "POST /upload - Request received"
    );

    let response = state.gateway.upload(form.folder(), form.file()).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Handle multi-file upload (multipart/form-data: `folder`, repeated `files`)
#[post("/upload_multi")]
pub async fn upload_multi(
    form: MultipartForm<UploadMultiForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let files = form.files();

    info!(
        folder = ?form.folder(),
        count = files.len(),
        "POST /upload_multi - Request received"
    );

    let response = state.gateway.upload_multiple(form.folder(), &files).await?;

    Ok(HttpResponse::Ok().json(response))
}

use crate::error::GatewayError;
use crate::state::AppState;
use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{get, web, HttpResponse};
use tracing::info;

/// Stream a stored file back inline.
/// `Accept-Ranges` is advertised, but range requests are answered in full.
#[get("/render/{token}")]
pub async fn render(
    token: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let object = state.gateway.render(&token).await?;

    info!(
        filename = ?object.filename,
        content_type = %object.content_type,
        "GET /render - Streaming file"
    );

    Ok(HttpResponse::Ok()
        .content_type(object.content_type.as_str())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(object.filename)],
        })
        .insert_header((header::ACCEPT_RANGES, "bytes"))
        .streaming(object.body))
}

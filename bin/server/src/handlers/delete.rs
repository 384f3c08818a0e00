use crate::error::GatewayError;
use crate::state::AppState;
use actix_web::{delete, web, HttpResponse};

/// Delete the file a token points at
#[delete("/delete/{token}")]
pub async fn delete(
    token: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let response = state.gateway.delete(&token).await?;
    Ok(HttpResponse::Ok().json(response))
}

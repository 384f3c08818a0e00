use crate::state::AppState;
use actix_web::http::header::ContentType;
use actix_web::{get, web, HttpResponse};

const DOCS_TEMPLATE: &str = include_str!("../../docs/index.html");

/// Fill the documentation template with the public base URL and route prefix
pub fn render_docs_page(base_url: &str, route_prefix: &str) -> String {
    DOCS_TEMPLATE
        .replace("{base}", base_url)
        .replace("{prefix}", route_prefix)
}

/// API documentation page
#[get("/")]
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(state.docs_page.clone())
}

//! HTTP request handlers

pub mod delete;
pub mod docs;
pub mod health;
pub mod render;
pub mod upload;
pub mod upload_form;

use actix_web::web;

/// Register every route. File routes are mounted under `route_prefix`;
/// the documentation page and health check stay at the root.
pub fn configure(cfg: &mut web::ServiceConfig, route_prefix: &str) {
    cfg.service(docs::index).service(health::health).service(
        web::scope(route_prefix)
            .service(upload::upload)
            .service(upload::upload_multi)
            .service(render::render)
            .service(delete::delete),
    );
}

mod config;
mod constants;
mod error;
mod gateway;
mod handlers;
mod state;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use config::ServerConfig;
use crypto::TokenCodec;
use gateway::Gateway;
use handlers::docs::render_docs_page;
use handlers::upload_form::multipart_config;
use state::AppState;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    // Filter out actix-server worker shutdown messages
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,actix_server::worker=warn,actix_server::accept=warn",
                )
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting file uploader server (PID: {})", std::process::id());

    let config = ServerConfig::load()?;

    let codec = TokenCodec::new(config.encryption_key.as_deref().unwrap_or_default())
        .map_err(|e| {
            error!("Invalid encryption key: {}", e);
            e
        })
        .context("ENCRYPTION_KEY must be set to a non-empty secret")?;

    info!(storage = ?config.storage_type, "Initializing storage backend...");
    let store = config
        .storage_backend()
        .initialize()
        .await
        .map_err(|e| {
            error!("Failed to initialize storage backend: {}", e);
            e
        })
        .context("failed to initialize storage backend")?;
    info!("Storage backend initialized successfully");

    let gateway = Gateway::new(
        store,
        codec,
        &config.base_url,
        &config.route_prefix,
        config.backend_timeout,
    );
    let state = web::Data::new(AppState::new(
        gateway,
        render_docs_page(&config.base_url, &config.route_prefix),
    ));

    let bind_address = config.bind_address();
    let route_prefix = config.route_prefix.clone();
    let max_request_bytes = config.max_request_bytes;

    info!("Starting server on http://{}", bind_address);
    info!(
        "Public URLs: {}{}/render/<token>",
        config.base_url, config.route_prefix
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(multipart_config(max_request_bytes))
            .configure(|cfg| handlers::configure(cfg, &route_prefix))
    })
    .bind(&bind_address)
    .map_err(|e| {
        error!("Failed to bind to {}: {}", bind_address, e);
        e
    })?;

    info!("Server bound successfully to http://{}", bind_address);

    let server = match config.workers {
        Some(workers) => server.workers(workers),
        None => server,
    };

    server.run().await?;
    Ok(())
}

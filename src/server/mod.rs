//! HTTP surface: an upload form, a results page and a CSV download.
//!
//! Nothing is stored server-side. The results page embeds the clustered CSV
//! in its download link, and `/download` echoes it back as an attachment.

pub mod pages;
pub mod routes;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Builds the application router.
pub fn build_router(config: &ServerConfig) -> Router {
    Router::new()
        .route(
            "/",
            get(routes::upload_form)
                .post(routes::upload)
                .layer(DefaultBodyLimit::max(config.max_upload_size)),
        )
        .route("/download", get(routes::download))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
}

/// Binds to the configured address and serves until the process exits.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let router = build_router(&config);
    let address = config.address();

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", address, e))?;

    tracing::info!("Starting noise clustering server on http://{}", address);
    axum::serve(listener, router).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

//! Noise clustering HTTP server.
//!
//! Run with: cargo run --bin noise-clusters-server -- --port 5000

use anyhow::Context;
use clap::Parser;
use noise_clusters::{config::ServerConfig, server};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "Serve DBSCAN clustering of day/night noise levels")]
struct CliArgs {
    /// TOML file with server settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interface to bind, overrides the config file.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides the config file.
    #[arg(short, long)]
    port: Option<u16>,

    /// Largest accepted upload in bytes, overrides the config file.
    #[arg(long)]
    max_upload_size: Option<usize>,
}

impl CliArgs {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("Loading config from {}", path.display()))?,
            None => ServerConfig::default(),
        };
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(max_upload_size) = self.max_upload_size {
            config.max_upload_size = max_upload_size;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noise_clusters=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CliArgs::parse().into_config()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  - Address: {}", config.address());
    tracing::info!("  - Max upload size: {} bytes", config.max_upload_size);

    server::run_server(config).await
}

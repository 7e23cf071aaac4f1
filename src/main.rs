use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::EnvFilter;

use booking_engine::adapters::memory_store::MemoryStore;
use booking_engine::adapters::seed::load_catalog;
use booking_engine::config::load_config;
use booking_engine::mcp::server::BookingMcpServer;
use booking_engine::ports::catalog_store::CatalogStore;
use booking_engine::service::BookingService;

fn find_config_path() -> PathBuf {
    let candidates = [
        PathBuf::from("config.yaml"),
        binary_dir().join("config.yaml"),
    ];

    for path in &candidates {
        if path.exists() {
            return path.clone();
        }
    }

    candidates[0].clone()
}

fn binary_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries MCP JSON-RPC, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting booking-engine server");

    let config_path = find_config_path();
    let config = load_config(&config_path)?;

    let store: Arc<dyn CatalogStore> = Arc::new(MemoryStore::new());
    match &config.catalog.seed_path {
        Some(seed_path) => {
            load_catalog(store.as_ref(), seed_path).await?;
        }
        None => tracing::info!("No catalog seed configured, starting with an empty store"),
    }

    let policy = config.availability.overlap_policy;
    tracing::info!(?policy, "Overlap policy");
    let server = BookingMcpServer::new(BookingService::new(store, policy));

    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}

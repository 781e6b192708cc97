//! Availability API server: serves `GET /service/{id}/availability` over a
//! snapshot directory loaded at startup.

use std::sync::Arc;

use anyhow::{Context, Result};
use avail_engine::cache::MemoryCache;
use avail_server::{app, AppState, CachingStore, Directory, InMemoryStore, SystemClock};
use clap::Parser;

#[derive(Parser)]
#[command(name = "avail-server", version, about = "Bookable availability API")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Snapshot directory file (JSON: { "companies": { id: snapshot } })
    #[arg(long)]
    data: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.data)
        .with_context(|| format!("Failed to read snapshot file: {}", args.data))?;
    let directory: Directory = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot file: {}", args.data))?;
    tracing::info!(companies = directory.companies.len(), "snapshot directory loaded");

    let store = CachingStore::new(InMemoryStore::new(directory), Arc::new(MemoryCache::new()));
    let state = AppState {
        store: Arc::new(store),
        clock: Arc::new(SystemClock),
    };

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("availability API listening on http://{addr}");

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;
    Ok(())
}

//! Checkpoint API Server
//!
//! Run with: cargo run --bin checkpoint-api
//!
//! # Configuration
//!
//! Settings come from `--config`, else the first config file found in the
//! default locations, else built-in defaults. Environment variables override
//! any of them:
//! - `CHECKPOINT_DATABASE`: SQLite database path (default: ./data/traffic_stops.db)
//! - `CHECKPOINT_API_HOST`: Host to bind to (default: 127.0.0.1)
//! - `CHECKPOINT_API_PORT`: Port to listen on (default: 8501)
//! - `CHECKPOINT_LOG_LEVEL` / `CHECKPOINT_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full tracing filter, wins over the log level

use anyhow::Context;
use checkpoint::api::{serve, AppState};
use checkpoint::config::Config;
use checkpoint::store::Store;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "checkpoint-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Traffic-stop analytics API server")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::resolve(args.config.as_deref())?;
    checkpoint::logging::init(&config.logging);

    tracing::info!("Starting Checkpoint API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Database: {:?}", config.store.database_path);

    let store = Store::from_config(&config.store).with_context(|| {
        format!(
            "Failed to open record store at {:?}",
            config.store.database_path
        )
    })?;
    let store = Arc::new(store);

    let state = AppState::new(Arc::clone(&store), config.api.clone());

    tracing::info!("Starting server on {}", config.api.addr());
    serve(state, &config.api).await?;

    tracing::info!("Checkpoint API server stopped");
    Ok(())
}

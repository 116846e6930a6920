//! Tilefarm Render Coordinator
//!
//! This binary hands out image tiles to a cluster of render workers.
//!
//! # Usage
//!
//! ```bash
//! # 1920x1080 image, 4 machines with 8 render threads each
//! tilefarm-coordinator 8080 1920 1080 4 8
//!
//! # Smaller tiles and a reproducible tile order
//! tilefarm-coordinator 8080 1920 1080 4 8 --tile-size 16 --seed 42
//!
//! # Defaults for optional settings from a file
//! tilefarm-coordinator 8080 1920 1080 4 8 --config tilefarm.toml
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tilefarm_core::CoordinatorConfig;
use tilefarm_coordinator::{serve, spawn_status_reporter, CoordinatorState};

/// Tilefarm Render Coordinator
#[derive(Parser, Debug)]
#[command(name = "tilefarm-coordinator")]
#[command(about = "Distributes image tiles to a cluster of render workers")]
struct Args {
    /// Port to listen on
    port: u16,

    /// Image width in pixels
    width: u32,

    /// Image height in pixels
    height: u32,

    /// Number of worker machines
    machines: u32,

    /// Render threads per machine
    threads_per_machine: u32,

    /// Address to bind to
    #[arg(short, long)]
    address: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Tile edge length in pixels
    #[arg(long)]
    tile_size: Option<u32>,

    /// Status line interval in milliseconds
    #[arg(long)]
    status_interval_ms: Option<u64>,

    /// Seed for the tile shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn load_config(&self) -> Result<CoordinatorConfig, Box<dyn std::error::Error>> {
        let config = match &self.config {
            Some(path) => CoordinatorConfig::from_file(path)?,
            None => CoordinatorConfig::default(),
        };
        let mut config = config.with_env_overrides();

        config.server.port = self.port;
        config.image.width = self.width;
        config.image.height = self.height;
        config.cluster.machines = self.machines;
        config.cluster.threads_per_machine = self.threads_per_machine;

        if let Some(address) = &self.address {
            config.server.address = address.clone();
        }
        if let Some(tile_size) = self.tile_size {
            config.image.tile_size = tile_size;
        }
        if let Some(interval) = self.status_interval_ms {
            config.status.interval_ms = interval;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.load_config()?;
    let (tiles_x, tiles_y, total_tiles) = config.grid().grid_dimensions();

    tracing::info!("Starting tilefarm coordinator");
    tracing::info!("  Image size: {}x{}", config.image.width, config.image.height);
    tracing::info!(
        "  Cluster size: {}x{}",
        config.cluster.threads_per_machine,
        config.cluster.machines
    );
    tracing::info!(
        "  Tiles: {}x{} = {} (tile size {})",
        tiles_x,
        tiles_y,
        total_tiles,
        config.image.tile_size
    );
    if config.cluster.expected_workers() == 0 {
        tracing::warn!("No workers expected; tiles are available immediately");
    }

    let state = Arc::new(CoordinatorState::from_config(&config));

    let addr: SocketAddr = format!("{}:{}", config.server.address, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", listener.local_addr()?);

    let reporter = spawn_status_reporter(
        state.clone(),
        Duration::from_millis(config.status.interval_ms),
    );

    serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutting down coordinator...");
    })
    .await?;

    reporter.abort();
    Ok(())
}

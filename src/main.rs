//! Airlog API Server
//!
//! Run with: cargo run -- --config config.toml
//!
//! # Configuration
//!
//! Settings are read from a TOML file, then `AIRLOG_*` environment
//! variables, then the flags below. See [`airlog::config`].
//! - `RUST_LOG`: Log filter (default: `airlog=<logging.level>,tower_http=debug`)

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airlog::api::{serve, AppState};
use airlog::config::{generate_default_config, Config, LoggingConfig};
use airlog::storage::MeasurementStore;

#[derive(Parser)]
#[command(name = "airlog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Environmental sensor logging service")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long)]
    db: Option<String>,

    /// Directory served for non-API paths
    #[arg(long)]
    static_dir: Option<String>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.api.host = host;
        }
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(db) = self.db {
            config.storage.db_path = db;
        }
        if let Some(dir) = self.static_dir {
            config.api.static_dir = Some(dir);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = Config::resolve(args.config.as_deref()).context("Failed to load config")?;
    args.apply(&mut config);

    init_tracing(&config.logging);

    tracing::info!("Starting Airlog API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Database: {}", config.storage.db_path);

    let store = Arc::new(
        MeasurementStore::open(&config.storage.db_path)
            .with_context(|| format!("Failed to open store at {}", config.storage.db_path))?,
    );

    let state = AppState::new(Arc::clone(&store), config.api.clone());
    serve(state, &config.api).await?;

    tracing::info!("Closing measurement store...");
    store.shutdown().await?;
    tracing::info!("Airlog API server stopped");

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("airlog={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

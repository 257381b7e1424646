//! COOL STUFF! blind auction party game server
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores games from the snapshot (if any), serves the JSON API and
//! snapshots games again on graceful shutdown.

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use coolstuff::api;
use coolstuff::catalog::Catalog;
use coolstuff::config;
use coolstuff::engine::GameRegistry;
use coolstuff::storage;

const BANNER: &str = r#"
  ___ ___   ___  _      ___ _____ _   _ ___ ___ _
 / __/ _ \ / _ \| |    / __|_   _| | | | __| __| |
| (_| (_) | (_) | |__  \__ \ | | | |_| | _|| _||_|
 \___\___/ \___/|____| |___/ |_|  \___/|_| |_| (_)

  Blind auction party game
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path =
        std::env::var("COOLSTUFF_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = config::AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        rounds = cfg.game.rounds,
        starting_budget = cfg.game.starting_budget,
        players = format!("{}-{}", cfg.game.min_players, cfg.game.max_players),
        "COOL STUFF! starting up"
    );

    let catalog = Catalog::load(cfg.catalog.path.as_deref())?;
    if catalog.items().len() < cfg.game.rounds {
        bail!(
            "Item catalog has {} items but games need {} rounds",
            catalog.items().len(),
            cfg.game.rounds
        );
    }

    let registry = Arc::new(GameRegistry::new(cfg.game.clone(), catalog));

    // -- Restore games ---------------------------------------------------

    if let Some(path) = cfg.storage.snapshot_path.as_deref() {
        if let Some(games) = storage::load_games(path)? {
            registry.restore(games).await;
        }
    }

    // -- Serve -----------------------------------------------------------

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cfg.server.host, cfg.server.port))?;

    api::serve(registry.clone(), addr, shutdown_signal()).await?;

    // -- Snapshot --------------------------------------------------------

    if let Some(path) = cfg.storage.snapshot_path.as_deref() {
        let games = registry.snapshot().await;
        storage::save_games(&games, path)?;
        info!(path, games = games.len(), "Games saved");
    }

    info!("COOL STUFF! shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("coolstuff=info,tower_http=info"));

    let json_logging = std::env::var("COOLSTUFF_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

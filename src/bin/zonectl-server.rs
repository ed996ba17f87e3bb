use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use zonectl::{AppState, SharedState, api, config::AppConfig, db, service};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, value_name = "PATH")]
    db_path: PathBuf,
    /// Listen address for the HTTP server
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,
    /// Root of the generated zone tree (master/, slave/, forward/, reverse/)
    #[arg(long, value_name = "DIR", env = "BIND_ZONES_PATH")]
    zones_root: PathBuf,
    /// Regenerate every zone's configuration before serving requests
    #[arg(long)]
    resync_on_start: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::new(&cli.zones_root);
    let state = init_shared_state(&cli, config).await?;

    if cli.resync_on_start {
        let report = service::resync(&state)
            .await
            .context("initial resync failed")?;
        if !report.pending.is_empty() {
            warn!("zones left pending after resync: {}", report.pending.join(", "));
        }
    }

    let app = Router::new().merge(api::create_router(state));

    let listener = TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind to {}", cli.listen))?;

    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")?;

    Ok(())
}

async fn init_shared_state(cli: &Cli, config: AppConfig) -> Result<SharedState> {
    if let Some(parent) = cli.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create db directory {}", parent.display()))?;
    }

    let db = db::init_db(&cli.db_path).await?;
    let state = AppState::new(config, db);

    // Not fatal: writes are retried on every change and on resync.
    if let Err(e) = state.writer.ensure_layout() {
        warn!("zone tree not ready: {e}");
    }

    Ok(Arc::new(state))
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to install CTRL+C handler: {err}");
    }
    info!("shutdown signal received");
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

//! gflash-server - Song catalog service
//!
//! Serves the song catalog JSON file on `GET /songs`, restricted by CORS
//! to a single origin.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use gflash_common::config::{resolve_catalog_path, CATALOG_ENV_VAR};
use gflash_server::{build_router, AppState, RouterOptions, DEFAULT_CORS_ORIGIN};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for gflash-server
#[derive(Parser, Debug)]
#[command(name = "gflash-server")]
#[command(about = "Song catalog service for the gflash alert player")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "GFLASH_PORT")]
    port: u16,

    /// Catalog JSON file (falls back to GFLASH_CATALOG, config file, then data/music.json)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Origin allowed to read responses cross-site
    #[arg(long, default_value = DEFAULT_CORS_ORIGIN, env = "GFLASH_CORS_ORIGIN")]
    cors_origin: String,

    /// Directory of audio assets served for non-API paths
    #[arg(long, env = "GFLASH_ASSETS_DIR")]
    assets_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gflash_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting gflash-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let catalog_path = resolve_catalog_path(args.catalog.as_deref(), CATALOG_ENV_VAR);
    info!("Catalog file: {}", catalog_path.display());
    if !catalog_path.exists() {
        // Not fatal: the file is read per request and may appear later
        warn!("Catalog file does not exist yet: {}", catalog_path.display());
    }

    let cors_origin = HeaderValue::from_str(&args.cors_origin)
        .with_context(|| format!("Invalid CORS origin: {}", args.cors_origin))?;
    info!("CORS origin: {}", args.cors_origin);

    if let Some(dir) = &args.assets_dir {
        info!("Serving audio assets from {}", dir.display());
    }

    let options = RouterOptions {
        cors_origin,
        assets_dir: args.assets_dir,
    };
    let app = build_router(AppState::new(catalog_path), &options);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("gflash-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

//! gflash-player - terminal alert player
//!
//! Fetches the catalog, selects a song and plays it on a simulated clock,
//! logging the timeline, progress and every alert as it fires.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use gflash_player::alert::HIGHLIGHT_DURATION;
use gflash_player::client::CatalogClient;
use gflash_player::media::{MediaEventBus, SimulatedMedia};
use gflash_player::surface::{LogSurface, Surface};
use gflash_player::PlaybackSynchronizer;
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for gflash-player
#[derive(Parser, Debug)]
#[command(name = "gflash-player")]
#[command(about = "Terminal alert player for the gflash song catalog")]
#[command(version)]
struct Args {
    /// Catalog service base URL
    #[arg(short, long, default_value = "http://127.0.0.1:3000", env = "GFLASH_SERVER")]
    server: String,

    /// Song id to play; lists the catalog when omitted
    #[arg(long)]
    song: Option<String>,

    /// Simulated audio duration in seconds
    #[arg(short, long, default_value = "30")]
    duration: f64,

    /// Enter alert mode before playing
    #[arg(long)]
    alerts: bool,

    /// Start with audio muted
    #[arg(long)]
    muted: bool,

    /// Time-update cadence in milliseconds
    #[arg(long, default_value = "250")]
    update_interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gflash_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("Duration must be a positive number of seconds");
    }
    if args.update_interval_ms == 0 {
        anyhow::bail!("Time-update interval must be at least 1 ms");
    }

    info!(
        "Starting gflash-player v{} against {}",
        env!("CARGO_PKG_VERSION"),
        args.server
    );

    let catalog = CatalogClient::new(args.server.clone()).fetch().await;

    let mut surface = LogSurface::default();
    info!("Songs:");
    surface.populate_selector(&catalog.options());

    let Some(song_id) = args.song else {
        return Ok(());
    };

    let bus = MediaEventBus::new(256);
    let media = SimulatedMedia::new(bus.clone(), args.duration);
    let mut sync = PlaybackSynchronizer::new(media.clone(), surface);

    if let Err(e) = sync.select_from_catalog(&catalog, &song_id) {
        error!("{}", e);
        return Ok(());
    }

    if args.alerts {
        let entered = sync
            .play_alerts()
            .context("Failed to enter alert mode")?;
        if !entered {
            warn!("Alert mode not entered");
        }
    }

    if args.muted {
        sync.toggle_mute();
    }

    let events = bus.subscribe();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let runner = tokio::spawn(sync.run_until(events, async move {
        let _ = stop_rx.await;
    }));

    media.load_metadata();
    media.play();

    tokio::select! {
        _ = media.drive(Duration::from_millis(args.update_interval_ms)) => {
            // Let the last highlight revert before stopping
            tokio::time::sleep(HIGHLIGHT_DURATION).await;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, stopping playback");
            media.pause();
        }
    }

    // The loop applies queued events, the pause included, before it exits
    let _ = stop_tx.send(());
    let sync = runner.await.context("Synchronizer task failed")?;

    info!(
        "Playback finished: {} alerts fired, {} timings armed",
        sync.fired_total(),
        sync.session().active_timings().len()
    );

    Ok(())
}

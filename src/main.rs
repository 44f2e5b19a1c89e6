use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use videocourse::ui::VideoBounds;
use videocourse::{Config, ControllerHandle, MediaPlayer, PlaybackController, TracingView};

/// How the command reader stopped
enum ReaderExit {
    Quit,
    EndOfInput,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("videocourse=debug")),
        )
        .init();

    info!("Starting videocourse");

    let config = Config::load()?;

    // UI callbacks are serialized on one thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(async {
        let player = build_player(&config)?;
        run(config, player).await
    })
}

#[cfg(feature = "gstreamer")]
fn build_player(_config: &Config) -> Result<videocourse::player::GStreamerPlayer> {
    videocourse::player::GStreamerPlayer::new()
}

#[cfg(not(feature = "gstreamer"))]
fn build_player(config: &Config) -> Result<videocourse::SimulatedPlayer> {
    info!("Built without GStreamer, using the simulated player");
    Ok(videocourse::SimulatedPlayer::new(
        config.simulation.duration(),
        config.simulation.load_delay(),
    ))
}

async fn run<P: MediaPlayer + 'static>(config: Config, player: P) -> Result<()> {
    let (handle, mut controller) = PlaybackController::new(&config, player, TracingView::new());
    controller
        .setup()
        .await
        .context("Failed to set up playback")?;

    let shutdown = CancellationToken::new();
    let controller_task = tokio::spawn(controller.run(shutdown.clone()));

    handle.layout_changed(VideoBounds::new(0.0, 0.0, 1280.0, 720.0))?;
    info!("Commands: p play/pause, r rewind, f fast-forward, t tap, s <0-1> scrub, i info, q quit");

    tokio::select! {
        exit = read_commands(&handle) => {
            if let ReaderExit::EndOfInput = exit? {
                info!("Input closed, press Ctrl-C to quit");
                tokio::signal::ctrl_c().await?;
            }
        }
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    shutdown.cancel();
    controller_task
        .await
        .context("Playback controller task failed")?;
    Ok(())
}

async fn read_commands(handle: &ControllerHandle) -> Result<ReaderExit> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("p") => handle.play_pause()?,
            Some("r") => handle.rewind()?,
            Some("f") => handle.fast_forward()?,
            Some("t") => handle.tap()?,
            Some("s") => match parts.next().and_then(|value| value.parse::<f64>().ok()) {
                Some(fraction) => {
                    handle.scrub_started()?;
                    handle.scrub(fraction)?;
                    handle.scrub_ended()?;
                }
                None => warn!("Usage: s <fraction between 0 and 1>"),
            },
            Some("i") => {
                let snapshot = handle.snapshot().await?;
                info!("{:?}", snapshot);
            }
            Some("q") => return Ok(ReaderExit::Quit),
            Some(other) => warn!("Unknown command '{}'", other),
            None => {}
        }
    }

    Ok(ReaderExit::EndOfInput)
}

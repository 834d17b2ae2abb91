mod app;
mod app_state;
mod components;
mod mpv;
mod theme;

use std::sync::Arc;

use heaven_core::config::Config;
use heaven_core::fetch::{Fetcher, HttpFetcher};
use heaven_core::listeners::{ListenerCountEstimator, ListenerTicker};
use heaven_core::schedule::load_schedule;
use heaven_core::stream::{PlaybackController, StreamUrlResolver};
use heaven_core::tracks::{PollerOptions, TrackListPoller};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = heaven_core::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("tui.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // stdout belongs to the terminal UI, so logs go to a file.  RUST_LOG
    // overrides; connection-level chatter from the HTTP stack is muted.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("heavenradio log: {}", log_path.display());
    tracing::info!("heavenradio starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config unreadable ({}), using defaults", e);
        Config::default()
    });
    tracing::info!("config: {:?}", Config::config_path());

    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::from_config(&config)?);

    // ── Track poller ─────────────────────────────────────────────────────────
    let mut poller = TrackListPoller::new(Arc::clone(&fetcher), PollerOptions::from_config(&config));
    let tracks_rx = poller.subscribe();
    let poll_errors = poller.subscribe_errors();
    poller.start();

    // ── Listener count, same cadence as the poller ───────────────────────────
    let listeners = ListenerTicker::spawn(
        ListenerCountEstimator::from_config(&config.listeners),
        config.poller.interval(),
    );

    // ── Playback controller task ─────────────────────────────────────────────
    let controller = PlaybackController::new(
        StreamUrlResolver::from_config(Arc::clone(&fetcher), &config),
        mpv::MpvPlayer::new(&config.player),
    );
    let playback_rx = controller.subscribe();
    let (playback_tx, playback_cmd_rx) = mpsc::channel(16);
    let controller_task = tokio::spawn(controller.run(playback_cmd_rx));

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let schedule = load_schedule(&config.schedule.schedule_toml);
    let app = app::App::new(schedule, config.links.clone(), playback_tx);
    let result = app
        .run(app::Feeds {
            tracks: tracks_rx,
            poll_errors,
            listeners: listeners.subscribe(),
            playback: playback_rx,
        })
        .await;

    poller.stop();
    drop(listeners);
    // The App sent Shutdown on exit; wait for mpv to be stopped.
    let _ = controller_task.await;
    tracing::info!("heavenradio exiting");

    result
}

//! TrackListPoller — keeps the "next tracks" listing fresh.
//!
//! A timer task ticks every `interval` (first tick immediately).  Each tick
//! publishes `Loading` and spawns a fetch task; the timer never waits for a
//! fetch, so a slow response cannot push back the next attempt.  Overlapping
//! fetches are allowed and, unless `discard_stale_responses` is set, the last
//! response to arrive wins.
//!
//! Teardown bumps a generation counter under the state channel's lock, and
//! every publish re-checks the generation under that same lock: fetches
//! that complete after `stop()` (or after a restart) drop their result.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{Config, MIN_INTERVAL};
use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::protocol::{TrackEntry, TrackListState};

/// Decode a track-listing body.  `null` is an empty listing; entries
/// without a `title` reject the whole body.
pub fn parse_track_listing(body: &str) -> Result<Vec<TrackEntry>> {
    let entries: Option<Vec<TrackEntry>> = serde_json::from_str(body)?;
    Ok(entries.unwrap_or_default())
}

#[derive(Debug, Clone)]
pub struct PollerOptions {
    pub url: String,
    pub limit: u32,
    pub interval: Duration,
    pub keep_last_good: bool,
    pub discard_stale_responses: bool,
}

impl PollerOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            limit: 2,
            interval: Duration::from_secs(30),
            keep_last_good: false,
            discard_stale_responses: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.endpoints.track_listing_url.clone(),
            limit: config.endpoints.track_limit,
            interval: config.poller.interval(),
            keep_last_good: config.poller.keep_last_good,
            discard_stale_responses: config.poller.discard_stale_responses,
        }
    }
}

struct Shared {
    fetcher: Arc<dyn Fetcher>,
    options: PollerOptions,
    state_tx: watch::Sender<TrackListState>,
    error_tx: broadcast::Sender<Error>,
    running: AtomicBool,
    generation: AtomicU64,
    next_request_id: AtomicU64,
    newest_applied: AtomicU64,
}

pub struct TrackListPoller {
    shared: Arc<Shared>,
    timer: Option<JoinHandle<()>>,
}

impl TrackListPoller {
    pub fn new(fetcher: Arc<dyn Fetcher>, options: PollerOptions) -> Self {
        let (state_tx, _) = watch::channel(TrackListState::Loading);
        let (error_tx, _) = broadcast::channel(16);
        Self {
            shared: Arc::new(Shared {
                fetcher,
                options,
                state_tx,
                error_tx,
                running: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                next_request_id: AtomicU64::new(1),
                newest_applied: AtomicU64::new(0),
            }),
            timer: None,
        }
    }

    /// Begin polling.  No-op if already running.
    pub fn start(&mut self) {
        if self.timer.is_some() {
            return;
        }
        let shared = Arc::clone(&self.shared);
        let mut generation = 0;
        shared.state_tx.send_if_modified(|_| {
            generation = shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
            shared.running.store(true, Ordering::SeqCst);
            false
        });
        let interval = shared.options.interval.max(MIN_INTERVAL);
        info!(
            "track poller: starting, url={} every {:?}",
            shared.options.url, interval
        );

        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                spawn_cycle(Arc::clone(&shared), generation);
            }
        }));
    }

    /// Cancel the timer.  In-flight fetches finish but their results are ignored.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            // Under the state lock, so no publish can interleave with it.
            let shared = &self.shared;
            shared.state_tx.send_if_modified(|_| {
                shared.running.store(false, Ordering::SeqCst);
                shared.generation.fetch_add(1, Ordering::SeqCst);
                false
            });
            info!("track poller: stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TrackListState {
        self.shared.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackListState> {
        self.shared.state_tx.subscribe()
    }

    /// Typed failure channel: every failed cycle is sent here as well as
    /// being rendered as `TrackListState::Failed`.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<Error> {
        self.shared.error_tx.subscribe()
    }
}

impl Drop for TrackListPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    /// Checked while holding the state channel's write lock.
    fn is_current(&self, generation: u64) -> bool {
        self.running.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }
}

fn spawn_cycle(shared: Arc<Shared>, generation: u64) {
    let request_id = shared.next_request_id.fetch_add(1, Ordering::SeqCst);

    shared.state_tx.send_if_modified(|state| {
        if !shared.is_current(generation) {
            return false;
        }
        if shared.options.keep_last_good && state.is_ready() {
            return false;
        }
        *state = TrackListState::Loading;
        true
    });

    tokio::spawn(async move {
        let query = [("limit", shared.options.limit.to_string())];
        let outcome = match shared.fetcher.get_text(&shared.options.url, &query).await {
            Ok(body) => parse_track_listing(&body),
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            warn!("track poller: request {} failed: {}", request_id, e);
        }

        let mut dropped = None;
        let mut failure = None;
        shared.state_tx.send_if_modified(|state| {
            if !shared.is_current(generation) {
                dropped = Some("after teardown");
                return false;
            }
            if shared.options.discard_stale_responses
                && shared.newest_applied.fetch_max(request_id, Ordering::SeqCst) > request_id
            {
                dropped = Some("as stale");
                return false;
            }
            *state = match outcome {
                Ok(entries) => TrackListState::Ready(entries),
                Err(e) => {
                    let message = e.to_string();
                    failure = Some(e);
                    TrackListState::Failed(message)
                }
            };
            true
        });

        match dropped {
            Some(reason) => debug!("track poller: dropping request {} {}", request_id, reason),
            None => debug!("track poller: applied request {}", request_id),
        }
        if let Some(e) = failure {
            let _ = shared.error_tx.send(e);
        }
    });
}

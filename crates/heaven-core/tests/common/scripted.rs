//! Scripted fetcher and player for driving components under a paused clock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use heaven_core::fetch::Fetcher;
use heaven_core::protocol::StreamHandle;
use heaven_core::stream::Player;
use heaven_core::{Error, Result};
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Call {
    pub at: Instant,
    pub url: String,
    pub query: Vec<(String, String)>,
}

/// Each call pops the next `(latency, outcome)`; an exhausted script
/// answers with a network error.
#[derive(Default)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<(Duration, Result<String>)>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, latency: Duration, body: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back((latency, Ok(body.to_string())));
        self
    }

    pub fn push_err(&self, latency: Duration, err: Error) -> &Self {
        self.script.lock().unwrap().push_back((latency, Err(err)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Call times relative to `origin`.
    pub fn offsets(&self, origin: Instant) -> Vec<Duration> {
        self.calls().iter().map(|c| c.at - origin).collect()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        self.calls.lock().unwrap().push(Call {
            at: Instant::now(),
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        let next = self.script.lock().unwrap().pop_front();
        let (latency, outcome) =
            next.unwrap_or((Duration::ZERO, Err(Error::network("script exhausted"))));
        tokio::time::sleep(latency).await;
        outcome
    }
}

/// Player whose `play` outcomes are scripted in order; unscripted calls succeed.
#[derive(Clone, Default)]
pub struct ScriptedPlayer {
    outcomes: Arc<Mutex<VecDeque<Result<()>>>>,
    plays: Arc<Mutex<Vec<StreamHandle>>>,
    pauses: Arc<Mutex<usize>>,
}

impl ScriptedPlayer {
    pub fn failing(times: usize) -> Self {
        let player = Self::default();
        for i in 0..times {
            player
                .outcomes
                .lock()
                .unwrap()
                .push_back(Err(Error::playback(format!("unplayable #{}", i + 1))));
        }
        player
    }

    pub fn plays(&self) -> Vec<StreamHandle> {
        self.plays.lock().unwrap().clone()
    }

    pub fn pauses(&self) -> usize {
        *self.pauses.lock().unwrap()
    }
}

#[async_trait]
impl Player for ScriptedPlayer {
    async fn play(&mut self, handle: &StreamHandle) -> Result<()> {
        self.plays.lock().unwrap().push(handle.clone());
        self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn pause(&mut self) {
        *self.pauses.lock().unwrap() += 1;
    }
}

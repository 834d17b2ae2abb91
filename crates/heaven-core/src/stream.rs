//! Stream resolution and the play/pause control path.
//!
//! `StreamUrlResolver` turns the playlist descriptor into a [`StreamHandle`],
//! substituting the configured fallback when the descriptor is unreachable
//! or lists no stream.  `PlaybackController` owns the cached handle and the
//! [`Player`]; it resolves lazily on the first toggle and retries a failed
//! start exactly once with a fresh fallback handle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::protocol::{PlaybackStatus, StreamHandle};

/// First line of a playlist descriptor that, once trimmed, starts with `http`.
/// Comment lines (`#EXTM3U`, `#EXTINF`, …) and blanks never match.
pub fn first_stream_line(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|line| line.starts_with("http"))
        .map(str::to_string)
}

pub struct StreamUrlResolver {
    fetcher: Arc<dyn Fetcher>,
    descriptor_url: String,
    fallback_url: String,
}

impl StreamUrlResolver {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        descriptor_url: impl Into<String>,
        fallback_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            descriptor_url: descriptor_url.into(),
            fallback_url: fallback_url.into(),
        }
    }

    pub fn from_config(fetcher: Arc<dyn Fetcher>, config: &Config) -> Self {
        Self::new(
            fetcher,
            config.endpoints.playlist_descriptor_url.clone(),
            config.endpoints.fallback_stream_url.clone(),
        )
    }

    /// Resolve a playable handle.  Never fails: any error yields the fallback.
    pub async fn resolve(&self) -> StreamHandle {
        match self.resolve_primary().await {
            Ok(handle) => {
                info!("stream resolved from descriptor: {}", handle.url);
                handle
            }
            Err(e) => {
                warn!("stream resolution failed ({}), using fallback", e);
                self.fallback()
            }
        }
    }

    /// Only the descriptor path, with its error.
    pub async fn resolve_primary(&self) -> Result<StreamHandle> {
        let body = self.fetcher.get_text(&self.descriptor_url, &[]).await?;
        first_stream_line(&body)
            .map(StreamHandle::primary)
            .ok_or_else(|| Error::parse("playlist descriptor lists no http stream"))
    }

    pub fn fallback(&self) -> StreamHandle {
        StreamHandle::fallback(self.fallback_url.clone())
    }
}

/// The audio backend.  `play` must return once playback has started (or
/// failed to); `pause` stops audio output but keeps nothing else.
#[async_trait]
pub trait Player: Send + 'static {
    async fn play(&mut self, handle: &StreamHandle) -> Result<()>;
    async fn pause(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Toggle,
    Shutdown,
}

pub struct PlaybackController<P: Player> {
    resolver: StreamUrlResolver,
    player: P,
    handle: Option<StreamHandle>,
    status_tx: watch::Sender<PlaybackStatus>,
}

impl<P: Player> PlaybackController<P> {
    pub fn new(resolver: StreamUrlResolver, player: P) -> Self {
        let (status_tx, _) = watch::channel(PlaybackStatus::Idle);
        Self {
            resolver,
            player,
            handle: None,
            status_tx,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        *self.status_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.status_tx.subscribe()
    }

    /// The handle currently cached for this session, if any.
    pub fn handle(&self) -> Option<&StreamHandle> {
        self.handle.as_ref()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    fn set_status(&self, status: PlaybackStatus) {
        debug!("playback: {:?}", status);
        self.status_tx.send_replace(status);
    }

    pub async fn toggle_playback(&mut self) -> PlaybackStatus {
        match self.status() {
            PlaybackStatus::Playing => {
                self.player.pause().await;
                self.set_status(PlaybackStatus::Paused);
            }
            PlaybackStatus::Unavailable => {
                // A manual retry starts over from the descriptor.
                self.handle = None;
                self.start().await;
            }
            PlaybackStatus::Idle | PlaybackStatus::Paused | PlaybackStatus::Resolving => {
                self.start().await;
            }
        }
        self.status()
    }

    async fn start(&mut self) {
        let handle = match self.handle.clone() {
            Some(handle) => handle,
            None => {
                self.set_status(PlaybackStatus::Resolving);
                let handle = self.resolver.resolve().await;
                self.handle = Some(handle.clone());
                handle
            }
        };

        let err = match self.player.play(&handle).await {
            Ok(()) => {
                self.set_status(PlaybackStatus::Playing);
                return;
            }
            Err(e) => e,
        };
        warn!(
            "playback of {} stream failed: {}; retrying with fallback",
            handle.source.label(),
            err
        );

        let fallback = self.resolver.fallback();
        self.handle = Some(fallback.clone());
        match self.player.play(&fallback).await {
            Ok(()) => self.set_status(PlaybackStatus::Playing),
            Err(e) => {
                warn!("fallback playback failed: {}; giving up until next toggle", e);
                self.set_status(PlaybackStatus::Unavailable);
            }
        }
    }

    /// Run as the single owner of the playback path, serving commands until
    /// `Shutdown` or until every sender is gone.  Playback is paused on exit.
    pub async fn run(mut self, mut commands: mpsc::Receiver<PlaybackCommand>) {
        while let Some(command) = commands.recv().await {
            match command {
                PlaybackCommand::Toggle => {
                    self.toggle_playback().await;
                }
                PlaybackCommand::Shutdown => break,
            }
        }
        if self.status() == PlaybackStatus::Playing {
            self.player.pause().await;
        }
        self.set_status(PlaybackStatus::Idle);
        info!("playback controller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_stream_line_skips_comments() {
        let body = "#EXTM3U\n#EXTINF:-1,Heaven Radio\nhttp://stream.example/a\nhttp://stream.example/b\n";
        assert_eq!(
            first_stream_line(body).as_deref(),
            Some("http://stream.example/a")
        );
    }

    #[test]
    fn test_first_stream_line_trims() {
        let body = "\r\n   https://stream.example/live  \r\n";
        assert_eq!(
            first_stream_line(body).as_deref(),
            Some("https://stream.example/live")
        );
    }

    #[test]
    fn test_first_stream_line_none() {
        assert_eq!(first_stream_line("#EXTM3U\n\nftp://nope\n"), None);
        assert_eq!(first_stream_line(""), None);
    }
}

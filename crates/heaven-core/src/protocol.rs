use serde::{Deserialize, Serialize};

/// One upcoming broadcast item from the track-listing endpoint.
///
/// `artist` and `album` are optional on the wire; a missing `title` makes
/// the whole listing fail to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
}

impl TrackEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: None,
            album: None,
        }
    }

    /// "Artist – Title" when the artist is known, otherwise just the title.
    pub fn display(&self) -> String {
        match self.artist.as_deref() {
            Some(artist) if !artist.is_empty() => format!("{} – {}", artist, self.title),
            _ => self.title.clone(),
        }
    }
}

/// What the "next tracks" widget shows.  Exactly one variant holds at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackListState {
    #[default]
    Loading,
    Ready(Vec<TrackEntry>),
    Failed(String),
}

/// Render-oriented view of [`TrackListState`].  An empty listing is its own
/// case, distinct from both a failure and a populated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackListView<'a> {
    Loading,
    Failed(&'a str),
    Empty,
    Tracks(&'a [TrackEntry]),
}

impl TrackListState {
    pub fn view(&self) -> TrackListView<'_> {
        match self {
            Self::Loading => TrackListView::Loading,
            Self::Failed(description) => TrackListView::Failed(description),
            Self::Ready(entries) if entries.is_empty() => TrackListView::Empty,
            Self::Ready(entries) => TrackListView::Tracks(entries),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Where a [`StreamHandle`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamSource {
    /// Parsed from the playlist descriptor.
    Primary,
    /// The configured constant, used when resolution or playback failed.
    Fallback,
}

impl StreamSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
        }
    }
}

/// Resolved audio endpoint, cached by the playback controller for the
/// rest of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamHandle {
    pub url: String,
    pub source: StreamSource,
}

impl StreamHandle {
    pub fn primary(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source: StreamSource::Primary,
        }
    }

    pub fn fallback(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source: StreamSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == StreamSource::Fallback
    }
}

/// Playback state machine:
///
/// ```text
///   Idle -> Resolving -> Playing | Unavailable
///   Playing <-> Paused
///   Unavailable -> Resolving
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Resolving,
    Playing,
    Paused,
    /// Both the resolved stream and the fallback failed; waits for the user.
    Unavailable,
}

impl PlaybackStatus {
    /// Short label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "stopped",
            Self::Resolving => "connecting…",
            Self::Playing => "on air",
            Self::Paused => "paused",
            Self::Unavailable => "unavailable",
        }
    }
}

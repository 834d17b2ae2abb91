//! AppState — the data every panel renders from.
//!
//! Only the App event loop writes it; panels read it during draw.

use heaven_core::config::LinksConfig;
use heaven_core::protocol::{PlaybackStatus, TrackListState};
use heaven_core::schedule::ProgrammeSlot;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tracks: TrackListState,
    pub listeners: u32,
    pub playback: PlaybackStatus,
    pub schedule: Vec<ProgrammeSlot>,
    /// Local hour used to highlight the slot on air.
    pub hour: u8,
    /// Most recent poller failure, kept for the status bar after the
    /// panel has recovered.
    pub last_error: Option<String>,
    pub links: LinksConfig,
    /// Donation overlay is open.
    pub donation_prompt: bool,
}

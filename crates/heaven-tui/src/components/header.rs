//! Header — one row: station name, playback badge, listener count.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use heaven_core::protocol::PlaybackStatus;

use crate::{
    app_state::AppState,
    theme::{style_accent, style_secondary, C_CONNECTING, C_ERROR, C_MUTED, C_PLAYING},
};

fn status_style(status: PlaybackStatus) -> Style {
    let color = match status {
        PlaybackStatus::Playing => C_PLAYING,
        PlaybackStatus::Resolving => C_CONNECTING,
        PlaybackStatus::Unavailable => C_ERROR,
        PlaybackStatus::Idle | PlaybackStatus::Paused => C_MUTED,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn status_glyph(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Playing => "▶",
        PlaybackStatus::Resolving => "…",
        PlaybackStatus::Paused => "⏸",
        PlaybackStatus::Unavailable => "✕",
        PlaybackStatus::Idle => "■",
    }
}

pub fn header_line(state: &AppState) -> Line<'static> {
    Line::from(vec![
        Span::styled(" ✝ Heaven Radio ", style_accent()),
        Span::raw(" "),
        Span::styled(
            format!("{} {}", status_glyph(state.playback), state.playback.label()),
            status_style(state.playback),
        ),
        Span::styled("  ·  ", style_secondary()),
        Span::styled(format!("{} listening", state.listeners), style_secondary()),
    ])
}

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(Paragraph::new(header_line(state)), area);
}

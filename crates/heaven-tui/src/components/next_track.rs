//! NextTrack panel — upcoming titles from the track poller.
//!
//! Four renderings, one per `TrackListView`: spinner text while loading,
//! the error description, "no information available" for an empty
//! listing, or one block per entry (title, then artist and album if known).

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use heaven_core::protocol::TrackListView;

use crate::{
    app_state::AppState,
    theme::{style_border, style_default, style_muted, style_secondary, C_ERROR},
};

pub fn track_lines(state: &AppState) -> Vec<Line<'static>> {
    match state.tracks.view() {
        TrackListView::Loading => vec![Line::styled("Loading…", style_muted())],
        TrackListView::Failed(description) => vec![Line::styled(
            format!("Error: {}", description),
            Style::default().fg(C_ERROR),
        )],
        TrackListView::Empty => vec![Line::styled("No information available", style_muted())],
        TrackListView::Tracks(entries) => {
            let mut lines = Vec::new();
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::raw(""));
                }
                lines.push(Line::from(Span::styled(
                    entry.title.clone(),
                    style_default().add_modifier(Modifier::BOLD),
                )));
                if let Some(artist) = entry.artist.as_deref().filter(|a| !a.is_empty()) {
                    lines.push(Line::styled(artist.to_string(), style_secondary()));
                }
                if let Some(album) = entry.album.as_deref().filter(|a| !a.is_empty()) {
                    lines.push(Line::styled(album.to_string(), style_muted()));
                }
            }
            lines
        }
    }
}

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Next tracks ")
        .borders(Borders::ALL)
        .border_style(style_border(false));
    let paragraph = Paragraph::new(track_lines(state))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use heaven_core::protocol::{TrackEntry, TrackListState};

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn with_tracks(tracks: TrackListState) -> AppState {
        AppState {
            tracks,
            ..Default::default()
        }
    }

    #[test]
    fn test_each_view_renders_differently() {
        assert_eq!(
            text(&track_lines(&with_tracks(TrackListState::Loading))),
            vec!["Loading…"]
        );
        assert_eq!(
            text(&track_lines(&with_tracks(TrackListState::Ready(vec![])))),
            vec!["No information available"]
        );
        assert_eq!(
            text(&track_lines(&with_tracks(TrackListState::Failed(
                "HTTP error: status 500".into()
            )))),
            vec!["Error: HTTP error: status 500"]
        );
    }

    #[test]
    fn test_optional_fields_only_when_present() {
        let mut first = TrackEntry::new("Ave Maria");
        first.artist = Some("Schubert".into());
        first.album = Some("Lieder".into());
        let second = TrackEntry::new("Salve Regina");
        let lines = track_lines(&with_tracks(TrackListState::Ready(vec![first, second])));
        assert_eq!(
            text(&lines),
            vec!["Ave Maria", "Schubert", "Lieder", "", "Salve Regina"]
        );
    }
}

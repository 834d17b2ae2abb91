//! Status bar — keybindings, plus the last poller error if any.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    app_state::AppState,
    theme::{style_muted, style_secondary, C_ERROR},
};

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.donation_prompt {
        let spans = vec![
            Span::styled(" esc", style_secondary()),
            Span::styled(" close  ", style_muted()),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        return;
    }
    let mut spans = vec![
        Span::styled(" space", style_secondary()),
        Span::styled(" play/pause  ", style_muted()),
        Span::styled("q", style_secondary()),
        Span::styled(" quit", style_muted()),
    ];
    if let Some(err) = state.last_error.as_deref() {
        spans.push(Span::styled("  ·  last error: ", style_muted()));
        spans.push(Span::styled(err.to_string(), Style::default().fg(C_ERROR)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

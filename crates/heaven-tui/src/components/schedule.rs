//! Schedule panel — the daily programme grid, slot on air highlighted.

use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use heaven_core::schedule::slot_at;

use crate::{
    app_state::AppState,
    theme::{style_accent, style_border, style_default, style_muted, style_secondary},
};

pub fn schedule_lines(state: &AppState) -> Vec<Line<'static>> {
    let on_air = slot_at(&state.schedule, state.hour);
    let mut lines = Vec::new();
    for slot in &state.schedule {
        let live = on_air.is_some_and(|s| std::ptr::eq(s, slot));
        let marker = if live { "● " } else { "  " };
        let label_style = if live { style_accent() } else { style_secondary() };
        lines.push(Line::from(vec![
            Span::styled(marker, style_accent()),
            Span::styled(format!("{:<10}", slot.label), label_style),
            Span::styled(slot.title.clone(), style_default().add_modifier(Modifier::BOLD)),
        ]));
        if live {
            for item in &slot.items {
                lines.push(Line::styled(format!("              {}", item), style_muted()));
            }
        }
    }
    lines
}

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Programme ")
        .borders(Borders::ALL)
        .border_style(style_border(true));
    frame.render_widget(
        Paragraph::new(schedule_lines(state))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

//! Donation overlay — centered popup opened once per session by the
//! prompt timer, closed with esc or enter.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    app_state::AppState,
    theme::{style_accent, style_border, style_default, style_muted, style_secondary, C_BG},
};

pub fn donation_lines(state: &AppState) -> Vec<Line<'static>> {
    vec![
        Line::styled(" ♥ Support Heaven Radio", style_accent()),
        Line::raw(""),
        Line::styled(
            " Your generosity keeps the station on the air.",
            style_secondary(),
        ),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" Donate: ", style_muted()),
            Span::styled(
                state.links.donation_url.clone(),
                style_default().add_modifier(Modifier::UNDERLINED),
            ),
        ]),
        Line::raw(""),
        Line::styled(" press esc or enter to close", style_muted()),
    ]
}

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(70, 9, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(donation_lines(state))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style_border(true))
                    .style(ratatui::style::Style::default().bg(C_BG)),
            )
            .wrap(Wrap { trim: false }),
        popup,
    );
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

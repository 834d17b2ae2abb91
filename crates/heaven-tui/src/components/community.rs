//! Community panel — the station's social links from `[links]` config.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    app_state::AppState,
    theme::{style_border, style_default, style_secondary},
};

pub fn community_lines(state: &AppState) -> Vec<Line<'static>> {
    state
        .links
        .community
        .iter()
        .map(|link| {
            Line::from(vec![
                Span::styled(format!("{:<10}", link.name), style_secondary()),
                Span::styled(link.url.clone(), style_default()),
            ])
        })
        .collect()
}

/// Rows the panel needs, borders included.
pub fn height(state: &AppState) -> u16 {
    if state.links.community.is_empty() {
        0
    } else {
        state.links.community.len() as u16 + 2
    }
}

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Community ")
        .borders(Borders::ALL)
        .border_style(style_border(false));
    frame.render_widget(Paragraph::new(community_lines(state)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use heaven_core::config::{CommunityLink, LinksConfig};

    #[test]
    fn test_one_row_per_link() {
        let state = AppState {
            links: LinksConfig {
                community: vec![CommunityLink::new("Discord", "https://discord.test")],
                ..Default::default()
            },
            ..Default::default()
        };
        let lines = community_lines(&state);
        assert_eq!(lines.len(), 1);
        let text: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Discord   https://discord.test");
        assert_eq!(height(&state), 3);
    }

    #[test]
    fn test_no_links_no_panel() {
        let state = AppState {
            links: LinksConfig {
                community: vec![],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(height(&state), 0);
    }
}

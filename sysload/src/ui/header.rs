//! Top header with the stream state and key hints.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};
use sysload::stream::StreamState;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, url: &str, state: StreamState) {
    let (icon, color) = match state {
        StreamState::Active => ("■", Color::Green),
        StreamState::Stopped => ("▶", Color::Yellow),
    };
    let title = Line::from(vec![
        Span::raw(format!("sysload — {url} | ")),
        Span::styled(
            format!("{icon} {}", state.label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  (space: {}, q: quit)",
            state.action_hint()
        )),
    ]);
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}

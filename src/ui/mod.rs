//! Terminal rendering

pub mod icons;
pub mod section_view;
pub mod status_bar;
pub mod tabs;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::app::App;

/// Draw the whole screen: tab bar, active section, status bar
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let area = frame.size();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme().palette.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(5),    // Section body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    tabs::render(frame, chunks[0], app);
    section_view::render(frame, chunks[1], app);
    status_bar::render(frame, chunks[2], app);
}

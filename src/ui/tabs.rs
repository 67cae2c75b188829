use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame,
};

use super::icons;
use crate::app::App;

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = app.theme();
    let active = app.active_section();
    let statuses = app.tab_statuses();

    let titles: Vec<Line> = statuses
        .iter()
        .enumerate()
        .map(|(index, (def, status))| {
            Line::from(vec![
                Span::styled(format!("{} ", index + 1), theme.muted()),
                Span::raw(format!("{} {} ", def.icon, def.title)),
                Span::styled(
                    icons::status_badge(*status),
                    Style::default().fg(theme.status_color(*status)),
                ),
            ])
        })
        .collect();

    let selected = statuses
        .iter()
        .position(|(def, _)| def.id == active)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border(false))
                .title(Span::styled(
                    format!(" {} ", app.kind().title()),
                    theme.header(),
                )),
        )
        .style(theme.text())
        .highlight_style(theme.selected())
        .divider(Span::styled("│", theme.muted()))
        .select(selected);

    frame.render_widget(tabs, area);
}

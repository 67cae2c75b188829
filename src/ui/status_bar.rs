use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::icons;
use crate::app::App;
use crate::events::{key_hints, InputMode};
use crate::format;
use crate::loader::{SectionState, SectionStatus};

/// Text describing the active section, e.g. `✓ ready · loaded 3m ago`
pub fn describe<T>(state: &SectionState<T>) -> String {
    let mut parts = vec![format!(
        "{} {}",
        icons::status_badge(state.status),
        state.status.label()
    )];

    match state.status {
        SectionStatus::Loading => {
            if let Some(elapsed) = state.elapsed() {
                parts.push(format::elapsed(elapsed));
            }
        }
        _ => {
            if let Some(loaded) = state.last_loaded_at {
                parts.push(format!(
                    "loaded {}",
                    format::relative_time(loaded, Local::now())
                ));
            }
        }
    }
    if state.attempts > 1 {
        parts.push(format!("{} attempts", state.attempts));
    }
    parts.join(" · ")
}

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = app.theme();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = match app.input_mode() {
        InputMode::Filter => {
            let filter = app.listing(&app.active_section()).filter;
            Line::from(vec![
                Span::styled(" / ", theme.header()),
                Span::styled(filter, theme.text()),
                Span::styled("▌", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])
        }
        InputMode::Normal => {
            let state = app.active_state();
            Line::from(Span::styled(
                format!(" {}", describe(&state)),
                Style::default().fg(theme.status_color(state.status)),
            ))
        }
    };

    let hints: Vec<Span> = key_hints(app.input_mode())
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(*key, theme.header()),
                Span::styled(format!(" {}  ", action), theme.muted()),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(left).style(theme.bar()), chunks[0]);
    frame.render_widget(
        Paragraph::new(Line::from(hints))
            .alignment(Alignment::Right)
            .style(theme.bar()),
        chunks[1],
    );
}

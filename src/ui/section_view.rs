//! Body of the active section: idle hint, skeleton, error panel or data

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::icons;
use crate::app::App;
use crate::dashboards::{Metric, RecordTable, SectionPayload, Trend};
use crate::format;
use crate::listing::ListingState;
use crate::loader::{SectionState, SectionStatus};
use crate::theme::Theme;

const METRICS_PER_ROW: usize = 3;
const SKELETON_ROWS: usize = 6;

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = app.theme();
    let section = app.active_section();
    let state = app.active_state();

    let title = app
        .active_def()
        .map(|def| format!(" {} {} ", def.icon, def.title))
        .unwrap_or_else(|| format!(" {} ", section));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(true))
        .title(Span::styled(title, theme.header()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let listing = app.listing(&section);
    match (state.status, &state.data) {
        (SectionStatus::Idle, _) => render_idle(frame, inner, theme),
        (SectionStatus::Loading, None) => render_skeleton(frame, inner, &state, theme),
        (SectionStatus::Loading, Some(data)) => {
            let banner = Line::from(Span::styled(
                format!("{} refreshing…", icons::spinner(elapsed_ms(&state))),
                Style::default().fg(theme.palette.info),
            ));
            render_with_banner(frame, inner, banner, data, &listing, theme);
        }
        (SectionStatus::Ready, Some(data)) => render_payload(frame, inner, data, &listing, theme),
        (SectionStatus::Ready, None) => render_idle(frame, inner, theme),
        (SectionStatus::Error, Some(data)) => {
            let message = state.error_message().unwrap_or_default();
            let banner = Line::from(Span::styled(
                format!("⚠ showing earlier data: {} (press r to retry)", message),
                Style::default()
                    .fg(theme.palette.warning)
                    .add_modifier(Modifier::BOLD),
            ));
            render_with_banner(frame, inner, banner, data, &listing, theme);
        }
        (SectionStatus::Error, None) => render_error(frame, inner, &state, theme),
    }
}

fn elapsed_ms(state: &SectionState<SectionPayload>) -> u128 {
    state.elapsed().map(|elapsed| elapsed.as_millis()).unwrap_or(0)
}

fn render_idle(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let hint = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Waiting to load…", theme.muted())),
        Line::from(Span::styled("Stay on this tab or press r to load now", theme.muted())),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(hint, area);
}

fn render_skeleton(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &SectionState<SectionPayload>,
    theme: &Theme,
) {
    let elapsed = state.elapsed().unwrap_or_default();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", icons::spinner(elapsed.as_millis())),
                Style::default().fg(theme.palette.info),
            ),
            Span::styled("Loading ", theme.text()),
            Span::styled(format::elapsed(elapsed), theme.muted()),
        ]),
        Line::from(""),
    ];

    let width = area.width.saturating_sub(2) as usize;
    for row in 0..SKELETON_ROWS {
        // Stagger the bar lengths so the placeholder reads as rows of data
        let length = width * (10 - (row % 3) * 2) / 10;
        lines.push(Line::from(Span::styled(
            "░".repeat(length),
            Style::default().fg(theme.palette.disabled),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_error(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &SectionState<SectionPayload>,
    theme: &Theme,
) {
    let mut lines = vec![Line::from("")];
    if let Some(error) = &state.error {
        lines.push(Line::from(Span::styled(
            format!("{} {}", icons::error_icon(error.kind()), error.message()),
            Style::default()
                .fg(theme.palette.error)
                .add_modifier(Modifier::BOLD),
        )));
        if let Some(cause) = error.cause() {
            lines.push(Line::from(Span::styled(cause.to_string(), theme.muted())));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("press ", theme.muted()),
        Span::styled("r", theme.header()),
        Span::styled(" to retry", theme.muted()),
    ]));
    if state.attempts > 1 {
        lines.push(Line::from(Span::styled(
            format!("attempt {}", state.attempts),
            theme.muted(),
        )));
    }

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(panel, area);
}

fn render_with_banner(
    frame: &mut Frame<'_>,
    area: Rect,
    banner: Line<'_>,
    data: &SectionPayload,
    listing: &ListingState,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    frame.render_widget(Paragraph::new(banner), chunks[0]);
    render_payload(frame, chunks[1], data, listing, theme);
}

fn render_payload(
    frame: &mut Frame<'_>,
    area: Rect,
    data: &SectionPayload,
    listing: &ListingState,
    theme: &Theme,
) {
    match data {
        SectionPayload::Metrics { metrics } => render_metrics(frame, area, metrics, theme),
        SectionPayload::Records { table } => render_table(frame, area, table, listing, theme),
    }
}

fn render_metrics(frame: &mut Frame<'_>, area: Rect, metrics: &[Metric], theme: &Theme) {
    if metrics.is_empty() {
        frame.render_widget(Paragraph::new(Span::styled("No data", theme.muted())), area);
        return;
    }

    let rows: Vec<&[Metric]> = metrics.chunks(METRICS_PER_ROW).collect();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            rows.iter()
                .map(|_| Constraint::Length(5))
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);

    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let card_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                (0..METRICS_PER_ROW).map(|_| Constraint::Ratio(1, METRICS_PER_ROW as u32)),
            )
            .split(*row_area);

        for (metric, card_area) in row.iter().zip(card_areas.iter()) {
            render_metric_card(frame, *card_area, metric, theme);
        }
    }
}

fn render_metric_card(frame: &mut Frame<'_>, area: Rect, metric: &Metric, theme: &Theme) {
    let trend_color = match metric.trend {
        Trend::Up(_) => theme.palette.success,
        Trend::Down(_) => theme.palette.error,
        Trend::Flat => theme.palette.text_muted,
    };

    let card = Paragraph::new(vec![
        Line::from(Span::styled(
            metric.value.display(),
            Style::default()
                .fg(theme.palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            metric.trend.describe(),
            Style::default().fg(trend_color),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border(false))
            .title(Span::styled(format!(" {} ", metric.label), theme.muted())),
    );
    frame.render_widget(card, area);
}

fn render_table(
    frame: &mut Frame<'_>,
    area: Rect,
    table: &RecordTable,
    listing: &ListingState,
    theme: &Theme,
) {
    let view = listing.apply(table);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let header = Row::new(table.columns.iter().enumerate().map(|(index, column)| {
        match listing.sort_column {
            Some(sorted) if sorted == index => {
                format!("{} {}", column, listing.direction.arrow())
            }
            _ => column.clone(),
        }
    }))
    .style(theme.header())
    .bottom_margin(1);

    let rows = view.rows.iter().map(|cells| {
        Row::new(cells.iter().map(|cell| {
            let style = if cell.is_missing() {
                theme.muted()
            } else {
                theme.text()
            };
            ratatui::widgets::Cell::from(cell.display()).style(style)
        }))
    });

    let column_count = table.columns.len().max(1) as u32;
    let widths: Vec<Constraint> = (0..column_count)
        .map(|_| Constraint::Ratio(1, column_count))
        .collect();

    frame.render_widget(Table::new(rows, widths).header(header).column_spacing(2), chunks[0]);

    let mut footer = vec![Span::styled(
        format!(
            "page {}/{} · {} of {} rows",
            view.page + 1,
            view.page_count,
            view.matches,
            table.rows.len()
        ),
        theme.muted(),
    )];
    if !listing.filter.is_empty() {
        footer.push(Span::styled(
            format!(" · filter: {}", listing.filter),
            Style::default().fg(theme.palette.accent),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(footer)), chunks[1]);
}

//! Section payloads rendered by the presentation layer

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

use crate::format;

/// Everything a section can resolve to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionPayload {
    Metrics { metrics: Vec<Metric> },
    Records { table: RecordTable },
}

impl SectionPayload {
    pub fn metrics(metrics: Vec<Metric>) -> Self {
        SectionPayload::Metrics { metrics }
    }

    pub fn records(table: RecordTable) -> Self {
        SectionPayload::Records { table }
    }

    /// Number of items shown, for summaries
    pub fn len(&self) -> usize {
        match self {
            SectionPayload::Metrics { metrics } => metrics.len(),
            SectionPayload::Records { table } => table.rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: Cell,
    pub trend: Trend,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: Cell, trend: Trend) -> Self {
        Self {
            label: label.into(),
            value,
            trend,
        }
    }
}

/// Direction of change since the previous period, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up(f64),
    Down(f64),
    Flat,
}

impl Trend {
    pub fn describe(&self) -> String {
        match self {
            Trend::Up(change) => format!("▲ {}", format::percent(*change)),
            Trend::Down(change) => format!("▼ {}", format::percent(*change)),
            Trend::Flat => "■ 0.0%".to_string(),
        }
    }
}

/// One typed table value. Missing amounts and dates are legitimate values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Text(String),
    Count(i64),
    /// Minor units (cents)
    Currency(Option<i64>),
    Percent(f64),
    Date(Option<NaiveDate>),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn money(cents: i64) -> Self {
        Cell::Currency(Some(cents))
    }

    /// Date from a loosely formatted string; unparseable input becomes a missing date
    pub fn date(raw: &str) -> Self {
        Cell::Date(format::parse_date_lenient(raw))
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Text(value) => value.clone(),
            Cell::Count(value) => format::count(*value),
            Cell::Currency(cents) => format::currency(*cents),
            Cell::Percent(value) => format::percent(*value),
            Cell::Date(date) => format::date(*date),
        }
    }

    /// Whether the value is missing or unusable
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Currency(None) | Cell::Date(None) => true,
            Cell::Percent(value) => !value.is_finite(),
            Cell::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }

    /// Ordering used for column sorting: numeric and chronological where
    /// possible, case-insensitive text otherwise, missing values last
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self.is_missing(), other.is_missing()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        match (self, other) {
            (Cell::Count(a), Cell::Count(b)) => a.cmp(b),
            (Cell::Currency(a), Cell::Currency(b)) => a.cmp(b),
            (Cell::Percent(a), Cell::Percent(b)) => a.total_cmp(b),
            (Cell::Date(a), Cell::Date(b)) => a.cmp(b),
            _ => self
                .display()
                .to_lowercase()
                .cmp(&other.display().to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RecordTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the column count
    pub fn row(mut self, mut cells: Vec<Cell>) -> Self {
        cells.resize(self.columns.len(), Cell::Text(String::new()));
        self.rows.push(cells);
        self
    }
}

//! Display formatting for currency, dates and durations
//!
//! Mock payloads routinely carry missing or malformed values; every
//! formatter here degrades to [`PLACEHOLDER`] instead of failing.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::time::Duration;

/// Shown in place of a missing or unparseable value
pub const PLACEHOLDER: &str = "n/a";

const DATE_FORMAT: &str = "%d %b %Y";
const LENIENT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Group the digits of a non-negative integer by thousands
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Signed integer with thousands separators
pub fn count(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{}{}", sign, thousands(value.unsigned_abs()))
}

/// Format an amount held in minor units (cents) as dollars
pub fn currency(cents: Option<i64>) -> String {
    currency_with("$", cents)
}

pub fn currency_with(symbol: &str, cents: Option<i64>) -> String {
    let Some(cents) = cents else {
        return PLACEHOLDER.to_string();
    };
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    format!(
        "{}{}{}.{:02}",
        sign,
        symbol,
        thousands(magnitude / 100),
        magnitude % 100
    )
}

/// Percentage with one decimal; non-finite values become the placeholder
pub fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}%", value)
    } else {
        PLACEHOLDER.to_string()
    }
}

pub fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Parse a date written in any of the common layouts, including RFC 3339 timestamps
pub fn parse_date_lenient(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(timestamp.date());
    }
    LENIENT_DATE_FORMATS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(raw, layout).ok())
}

/// Reformat a loosely written date string
pub fn date_str(raw: &str) -> String {
    date(parse_date_lenient(raw))
}

/// Short human duration: `350ms`, `1.2s`, `2m 05s`
pub fn elapsed(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// How long ago `then` was, relative to `now`
pub fn relative_time(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let seconds = (now - then).num_seconds();
    match seconds {
        s if s < 5 => "just now".to_string(),
        s if s < 60 => format!("{}s ago", s),
        s if s < 3600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3600),
        _ => then.format(DATE_FORMAT).to_string(),
    }
}

/// Mask all but the last four characters of an account or card number
pub fn masked(number: &str) -> String {
    let visible: String = number
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if visible.len() <= 4 {
        return visible;
    }
    format!("•••• {}", &visible[visible.len() - 4..])
}

use crate::loader::{LoadErrorKind, SectionStatus};

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Badge shown next to a tab title
pub fn status_badge(status: SectionStatus) -> &'static str {
    match status {
        SectionStatus::Idle => "○",
        SectionStatus::Loading => "⟳",
        SectionStatus::Ready => "✓",
        SectionStatus::Error => "✗",
    }
}

pub fn error_icon(kind: LoadErrorKind) -> &'static str {
    match kind {
        LoadErrorKind::Timeout => "⏱",
        LoadErrorKind::Failed => "⚠",
    }
}

/// Spinner frame for a load that has been running for `elapsed_ms`
pub fn spinner(elapsed_ms: u128) -> &'static str {
    SPINNER[(elapsed_ms / 100) as usize % SPINNER.len()]
}

//! Headless load of every section in a dashboard

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::dashboards::{self, DashboardKind};
use crate::format;
use crate::loader::{LoadErrorKind, SectionStatus};
use crate::ui::icons;

/// Extra time allowed on top of the longest section timeout
pub const SETTLE_MARGIN: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub section: String,
    pub title: String,
    pub status: SectionStatus,
    pub attempts: u32,
    /// Metrics or rows received
    pub items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub dashboard: DashboardKind,
    pub elapsed_ms: u64,
    /// False when the deadline passed before every section settled
    pub settled: bool,
    pub sections: Vec<SectionReport>,
}

impl ProbeReport {
    pub fn failures(&self) -> usize {
        self.sections
            .iter()
            .filter(|report| report.status != SectionStatus::Ready)
            .count()
    }

    pub fn is_healthy(&self) -> bool {
        self.settled && self.failures() == 0
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        let width = self
            .sections
            .iter()
            .map(|report| report.section.len())
            .max()
            .unwrap_or(0);

        let mut out = format!(
            "{} dashboard ({})\n",
            self.dashboard.title(),
            format::elapsed(Duration::from_millis(self.elapsed_ms))
        );
        for report in &self.sections {
            let _ = write!(
                out,
                "  {} {:<width$}  {:<7}",
                icons::status_badge(report.status),
                report.section,
                report.status.label(),
                width = width
            );
            match (&report.error, &report.cause) {
                (Some(error), Some(cause)) => {
                    let _ = write!(out, "  {} ({})", error, cause);
                }
                (Some(error), None) => {
                    let _ = write!(out, "  {}", error);
                }
                _ => {
                    let _ = write!(out, "  {} items", report.items);
                }
            }
            out.push('\n');
        }
        if !self.settled {
            out.push_str("  gave up waiting for sections to settle\n");
        }
        out
    }
}

/// Start every section of `kind` at once and wait for all of them to settle
pub async fn run_probe(kind: DashboardKind, config: &AppConfig) -> Result<ProbeReport> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orchestrator = dashboards::build_orchestrator(kind, config, Some(tx), None)?;
    let started = Instant::now();

    for id in orchestrator.section_ids() {
        orchestrator.retry_section(id)?;
    }
    info!(dashboard = kind.title(), sections = orchestrator.section_ids().len(), "probe started");

    let deadline = config.max_timeout() + SETTLE_MARGIN;
    let settled = tokio::time::timeout(deadline, async {
        while !orchestrator.all_settled() {
            if rx.recv().await.is_none() {
                break;
            }
        }
    })
    .await
    .is_ok();
    if !settled {
        warn!(deadline_ms = deadline.as_millis() as u64, "probe deadline passed");
    }

    let mut sections = Vec::with_capacity(orchestrator.section_ids().len());
    for def in kind.sections() {
        let report = orchestrator.with_section_state(def.id, |state| SectionReport {
            section: def.id.to_string(),
            title: def.title.to_string(),
            status: state.status,
            attempts: state.attempts,
            items: state.data.as_ref().map(|data| data.len()).unwrap_or(0),
            error: state.error.as_ref().map(|error| error.message().to_string()),
            cause: state
                .error
                .as_ref()
                .and_then(|error| error.cause())
                .map(str::to_string),
            timed_out: state
                .error
                .as_ref()
                .is_some_and(|error| error.kind() == LoadErrorKind::Timeout),
        })?;
        sections.push(report);
    }
    orchestrator.dispose();

    Ok(ProbeReport {
        dashboard: kind,
        elapsed_ms: started.elapsed().as_millis() as u64,
        settled,
        sections,
    })
}

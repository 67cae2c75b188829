//! Sample dashboards served by the in-memory mock data layer

pub mod banking;
pub mod finance;
pub mod hr;
pub mod mock;
pub mod payload;

pub use mock::{MockBehavior, MockSource};
pub use payload::{Cell, Metric, RecordTable, SectionPayload, Trend};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::loader::{OrchestratorResult, SectionEvent, SectionOrchestrator, SharedFetch};

/// Static description of one dashboard section
#[derive(Debug, Clone, Copy)]
pub struct SectionDef {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    /// Shown when the fetch fails, unless overridden in config
    pub failure_message: &'static str,
    pub build: fn() -> SectionPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardKind {
    #[default]
    Finance,
    Banking,
    Hr,
}

impl DashboardKind {
    pub fn title(&self) -> &'static str {
        match self {
            DashboardKind::Finance => "Finance",
            DashboardKind::Banking => "Banking",
            DashboardKind::Hr => "People",
        }
    }

    pub fn sections(&self) -> &'static [SectionDef] {
        match self {
            DashboardKind::Finance => finance::SECTIONS,
            DashboardKind::Banking => banking::SECTIONS,
            DashboardKind::Hr => hr::SECTIONS,
        }
    }

    pub fn section(&self, id: &str) -> Option<&'static SectionDef> {
        self.sections().iter().find(|def| def.id == id)
    }
}

/// Wire every section of `kind` to a mock source configured from `config`.
///
/// `initial` selects the section that is active first; it must belong to
/// the dashboard.
pub fn build_orchestrator(
    kind: DashboardKind,
    config: &AppConfig,
    events: Option<mpsc::UnboundedSender<SectionEvent>>,
    initial: Option<&str>,
) -> OrchestratorResult<SectionOrchestrator<SectionPayload>> {
    let mut builder =
        SectionOrchestrator::builder().activation_delay(config.activation_delay());

    for def in kind.sections() {
        let source: SharedFetch<SectionPayload> =
            Arc::new(MockSource::from_config(&config.mock, def.id, def.build));
        builder = builder.section(
            def.id,
            source,
            config.loader_settings(def.id, def.failure_message),
        );
    }

    if let Some(initial) = initial {
        builder = builder.initial_section(initial);
    }
    if let Some(events) = events {
        builder = builder.events(events);
    }

    builder.build()
}

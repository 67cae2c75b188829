//! Observable per-section state

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use super::error::LoadError;

/// Lifecycle status of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    /// Never started
    Idle,
    /// A load attempt is in flight
    Loading,
    /// Last attempt succeeded
    Ready,
    /// Last attempt failed or timed out
    Error,
}

impl SectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SectionStatus::Idle => "idle",
            SectionStatus::Loading => "loading",
            SectionStatus::Ready => "ready",
            SectionStatus::Error => "error",
        }
    }
}

/// What happens to previously loaded data when a later attempt fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Drop the old payload; the error panel replaces it
    #[default]
    Discard,
    /// Keep the old payload visible under an error banner
    Retain,
}

/// Snapshot of one section as seen by the presentation layer
#[derive(Debug, Clone)]
pub struct SectionState<T> {
    pub status: SectionStatus,
    pub data: Option<T>,
    pub error: Option<LoadError>,
    pub loaded_once: bool,
    /// Number of load attempts started so far
    pub attempts: u32,
    pub last_loaded_at: Option<DateTime<Local>>,
    pub started_at: Option<Instant>,
}

impl<T> Default for SectionState<T> {
    fn default() -> Self {
        Self {
            status: SectionStatus::Idle,
            data: None,
            error: None,
            loaded_once: false,
            attempts: 0,
            last_loaded_at: None,
            started_at: None,
        }
    }
}

impl<T> SectionState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == SectionStatus::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(LoadError::message)
    }

    /// Time spent in the current attempt, while loading
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.status, self.started_at) {
            (SectionStatus::Loading, Some(started)) => Some(started.elapsed()),
            _ => None,
        }
    }
}

/// Change notification published after every transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEvent {
    pub section: String,
    pub status: SectionStatus,
}

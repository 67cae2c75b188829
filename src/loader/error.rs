//! Error types for section loading and orchestration

use std::time::Duration;
use thiserror::Error;

/// Result type for orchestrator operations
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Why a single load attempt ended in the `Error` state.
///
/// Both variants are shown to the user the same way (message plus a retry
/// action); the variant only matters for logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("{message}")]
    Timeout { after: Duration, message: String },

    #[error("{message}")]
    Failed { message: String, cause: String },
}

/// Coarse classification of a [`LoadError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    Timeout,
    Failed,
}

impl LoadError {
    /// Create a timeout error
    pub fn timeout(after: Duration, message: impl Into<String>) -> Self {
        LoadError::Timeout {
            after,
            message: message.into(),
        }
    }

    /// Create an operation failure error, keeping the underlying cause for logs
    pub fn failed(message: impl Into<String>, cause: &anyhow::Error) -> Self {
        LoadError::Failed {
            message: message.into(),
            cause: format!("{:#}", cause),
        }
    }

    /// User-facing message
    pub fn message(&self) -> &str {
        match self {
            LoadError::Timeout { message, .. } | LoadError::Failed { message, .. } => message,
        }
    }

    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::Timeout { .. } => LoadErrorKind::Timeout,
            LoadError::Failed { .. } => LoadErrorKind::Failed,
        }
    }

    /// Underlying failure text, if the fetch operation itself failed
    pub fn cause(&self) -> Option<&str> {
        match self {
            LoadError::Failed { cause, .. } => Some(cause),
            LoadError::Timeout { .. } => None,
        }
    }
}

/// Caller errors when building or driving a [`SectionOrchestrator`](super::SectionOrchestrator)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("section registered twice: {0}")]
    DuplicateSection(String),

    #[error("an orchestrator needs at least one section")]
    NoSections,
}

impl OrchestratorError {
    pub fn unknown(section: impl Into<String>) -> Self {
        OrchestratorError::UnknownSection(section.into())
    }
}

//! Lazily triggered, timeout-guarded section loading
//!
//! [`SectionLoader`] is the per-section state machine
//! (`idle -> loading -> ready | error`, with disposal as an absorbing state);
//! [`SectionOrchestrator`] owns one loader per dashboard tab and triggers
//! them from navigation.

pub mod error;
pub mod fetch;
pub mod orchestrator;
pub mod section;
pub mod state;

pub use error::{LoadError, LoadErrorKind, OrchestratorError, OrchestratorResult};
pub use fetch::{FetchOperation, SharedFetch};
pub use orchestrator::{
    ActivateOutcome, OrchestratorBuilder, SectionOrchestrator, DEFAULT_ACTIVATION_DELAY,
};
pub use section::{
    LoaderSettings, SectionLoader, StartOutcome, DEFAULT_FAILURE_MESSAGE, DEFAULT_TIMEOUT,
    DEFAULT_TIMEOUT_MESSAGE,
};
pub use state::{SectionEvent, SectionState, SectionStatus, StalePolicy};

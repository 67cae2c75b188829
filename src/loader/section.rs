//! Timeout-guarded loader for a single section
//!
//! A [`SectionLoader`] runs at most one fetch at a time, races it against a
//! timeout and publishes the outcome as a [`SectionState`]. Every outcome is
//! checked against the attempt generation and the disposal flag under the
//! state lock, so late results from a timed-out or disposed attempt are
//! dropped instead of applied.

use chrono::Local;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::error::LoadError;
use super::fetch::SharedFetch;
use super::state::{SectionEvent, SectionState, SectionStatus, StalePolicy};

/// Default maximum wait for a section load
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);
pub const DEFAULT_TIMEOUT_MESSAGE: &str = "time exceeded, please try again";
pub const DEFAULT_FAILURE_MESSAGE: &str = "failed to load data";

/// Per-section loader configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSettings {
    pub timeout: Duration,
    pub timeout_message: String,
    pub failure_message: String,
    pub stale_policy: StalePolicy,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            timeout_message: DEFAULT_TIMEOUT_MESSAGE.to_string(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            stale_policy: StalePolicy::default(),
        }
    }
}

impl LoaderSettings {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_message(mut self, message: impl Into<String>) -> Self {
        self.timeout_message = message.into();
        self
    }

    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }
}

/// Result of asking a loader to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new attempt was launched
    Started,
    /// An attempt is already in flight; nothing changed
    AlreadyLoading,
    /// The loader has been disposed; nothing changed
    Disposed,
}

/// Loader for one named section. Cloning yields another handle to the same loader.
pub struct SectionLoader<T> {
    inner: Arc<Shared<T>>,
}

struct Shared<T> {
    id: String,
    fetch: SharedFetch<T>,
    settings: LoaderSettings,
    slot: Mutex<Slot<T>>,
}

struct Slot<T> {
    state: SectionState<T>,
    /// Bumped on every start; outcomes carrying an older value are stale
    generation: u64,
    disposed: bool,
    task: Option<JoinHandle<()>>,
    events: Option<mpsc::UnboundedSender<SectionEvent>>,
}

impl<T> Clone for SectionLoader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for SectionLoader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.inner.lock();
        f.debug_struct("SectionLoader")
            .field("id", &self.inner.id)
            .field("status", &slot.state.status)
            .field("disposed", &slot.disposed)
            .finish()
    }
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, slot: &Slot<T>) {
        if let Some(events) = &slot.events {
            // A closed receiver only means nobody is rendering anymore
            let _ = events.send(SectionEvent {
                section: self.id.clone(),
                status: slot.state.status,
            });
        }
    }

    fn settle(&self, generation: u64, outcome: Result<T, LoadError>) {
        let mut slot = self.lock();

        if slot.disposed {
            debug!(section = %self.id, "loader disposed, dropping late outcome");
            return;
        }
        if slot.generation != generation || slot.state.status != SectionStatus::Loading {
            debug!(
                section = %self.id,
                generation,
                current = slot.generation,
                "dropping stale outcome"
            );
            return;
        }

        slot.task = None;
        let elapsed_ms = slot
            .state
            .started_at
            .map(|started| started.elapsed().as_millis() as u64)
            .unwrap_or_default();

        match outcome {
            Ok(data) => {
                let state = &mut slot.state;
                state.data = Some(data);
                state.error = None;
                state.status = SectionStatus::Ready;
                state.loaded_once = true;
                state.last_loaded_at = Some(Local::now());
                info!(section = %self.id, elapsed_ms, "section loaded");
            }
            Err(error) => {
                warn!(
                    section = %self.id,
                    kind = ?error.kind(),
                    cause = error.cause().unwrap_or("-"),
                    elapsed_ms,
                    "section load failed: {}",
                    error
                );
                let state = &mut slot.state;
                if self.settings.stale_policy == StalePolicy::Discard {
                    state.data = None;
                }
                state.error = Some(error);
                state.status = SectionStatus::Error;
            }
        }

        self.notify(&slot);
    }
}

impl<T> SectionLoader<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an idle loader; nothing runs until [`start`](Self::start)
    pub fn new(id: impl Into<String>, fetch: SharedFetch<T>, settings: LoaderSettings) -> Self {
        Self {
            inner: Arc::new(Shared {
                id: id.into(),
                fetch,
                settings,
                slot: Mutex::new(Slot {
                    state: SectionState::default(),
                    generation: 0,
                    disposed: false,
                    task: None,
                    events: None,
                }),
            }),
        }
    }

    /// Publish a [`SectionEvent`] on `events` after every transition
    pub fn subscribe(&self, events: mpsc::UnboundedSender<SectionEvent>) {
        let mut slot = self.inner.lock();
        if !slot.disposed {
            slot.events = Some(events);
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn settings(&self) -> &LoaderSettings {
        &self.inner.settings
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SectionState<T> {
        self.inner.lock().state.clone()
    }

    /// Read the current state without cloning the payload
    pub fn with_state<R>(&self, read: impl FnOnce(&SectionState<T>) -> R) -> R {
        read(&self.inner.lock().state)
    }

    pub fn status(&self) -> SectionStatus {
        self.inner.lock().state.status
    }

    pub fn is_loaded_once(&self) -> bool {
        self.inner.lock().state.loaded_once
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.lock().disposed
    }

    /// Launch a load attempt unless one is already in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> StartOutcome {
        let mut slot = self.inner.lock();

        if slot.disposed {
            return StartOutcome::Disposed;
        }
        if slot.state.status == SectionStatus::Loading {
            debug!(section = %self.inner.id, "load already in flight");
            return StartOutcome::AlreadyLoading;
        }

        slot.generation += 1;
        let generation = slot.generation;
        slot.state.status = SectionStatus::Loading;
        slot.state.error = None;
        slot.state.attempts += 1;
        slot.state.started_at = Some(Instant::now());

        debug!(
            section = %self.inner.id,
            attempt = slot.state.attempts,
            timeout_ms = self.inner.settings.timeout.as_millis() as u64,
            "starting section load"
        );

        let shared = Arc::clone(&self.inner);
        slot.task = Some(tokio::spawn(run_attempt(shared, generation)));
        self.inner.notify(&slot);

        StartOutcome::Started
    }

    /// Start again after a success or failure. A no-op while loading.
    pub fn retry(&self) -> StartOutcome {
        debug!(section = %self.inner.id, "retry requested");
        self.start()
    }

    /// Permanently deactivate the loader. Idempotent.
    ///
    /// The in-flight attempt, if any, is aborted; the visible state keeps
    /// whatever values it had at this point.
    pub fn dispose(&self) {
        let mut slot = self.inner.lock();
        if slot.disposed {
            return;
        }
        slot.disposed = true;
        slot.events = None;
        if let Some(task) = slot.task.take() {
            task.abort();
        }
        debug!(section = %self.inner.id, "section loader disposed");
    }
}

async fn run_attempt<T>(shared: Arc<Shared<T>>, generation: u64)
where
    T: Send + Sync + 'static,
{
    let fetch = Arc::clone(&shared.fetch);
    let timeout = shared.settings.timeout;

    let outcome = match tokio::time::timeout(timeout, fetch.fetch()).await {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(err)) => Err(LoadError::failed(&shared.settings.failure_message, &err)),
        Err(_) => Err(LoadError::timeout(timeout, &shared.settings.timeout_message)),
    };

    shared.settle(generation, outcome);
}

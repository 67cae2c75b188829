//! Navigation-driven composition of section loaders
//!
//! The orchestrator owns a fixed, ordered set of [`SectionLoader`]s and
//! decides from tab navigation whether a section needs loading. Activation
//! is debounced: the load is scheduled after a short delay and only fires if
//! the section is still the active one, so flipping quickly through tabs
//! does not load every tab passed over.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::error::{OrchestratorError, OrchestratorResult};
use super::fetch::SharedFetch;
use super::section::{LoaderSettings, SectionLoader, StartOutcome};
use super::state::{SectionEvent, SectionState};

/// Default delay between activating a tab and starting its load
pub const DEFAULT_ACTIVATION_DELAY: Duration = Duration::from_millis(150);

/// What [`SectionOrchestrator::activate`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivateOutcome {
    /// A load will start after the activation delay
    Scheduled,
    /// A load started right away (zero activation delay)
    Started,
    /// A load for this section was already scheduled
    AlreadyScheduled,
    /// A load for this section is already running
    InFlight,
    /// The section loaded before; data stays valid
    AlreadyLoaded,
    /// The orchestrator has been disposed
    Disposed,
}

struct Navigation {
    active: String,
    pending: HashMap<String, JoinHandle<()>>,
    disposed: bool,
}

fn lock_nav(nav: &Mutex<Navigation>) -> MutexGuard<'_, Navigation> {
    nav.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builder for [`SectionOrchestrator`]
pub struct OrchestratorBuilder<T> {
    sections: Vec<(String, SharedFetch<T>, LoaderSettings)>,
    activation_delay: Duration,
    initial: Option<String>,
    events: Option<mpsc::UnboundedSender<SectionEvent>>,
}

impl<T> Default for OrchestratorBuilder<T> {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            activation_delay: DEFAULT_ACTIVATION_DELAY,
            initial: None,
            events: None,
        }
    }
}

impl<T> OrchestratorBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a section; display order follows registration order
    pub fn section(
        mut self,
        id: impl Into<String>,
        fetch: SharedFetch<T>,
        settings: LoaderSettings,
    ) -> Self {
        self.sections.push((id.into(), fetch, settings));
        self
    }

    pub fn activation_delay(mut self, delay: Duration) -> Self {
        self.activation_delay = delay;
        self
    }

    /// Section that is active before the first `activate`; defaults to the first one
    pub fn initial_section(mut self, id: impl Into<String>) -> Self {
        self.initial = Some(id.into());
        self
    }

    pub fn events(mut self, events: mpsc::UnboundedSender<SectionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> OrchestratorResult<SectionOrchestrator<T>> {
        let mut order = Vec::with_capacity(self.sections.len());
        let mut loaders = HashMap::with_capacity(self.sections.len());

        for (id, fetch, settings) in self.sections {
            if loaders.contains_key(&id) {
                return Err(OrchestratorError::DuplicateSection(id));
            }
            let loader = SectionLoader::new(id.clone(), fetch, settings);
            if let Some(events) = &self.events {
                loader.subscribe(events.clone());
            }
            order.push(id.clone());
            loaders.insert(id, loader);
        }

        let active = match self.initial {
            Some(initial) if !loaders.contains_key(&initial) => {
                return Err(OrchestratorError::UnknownSection(initial));
            }
            Some(initial) => initial,
            None => order.first().cloned().ok_or(OrchestratorError::NoSections)?,
        };

        Ok(SectionOrchestrator {
            order,
            loaders,
            activation_delay: self.activation_delay,
            nav: Arc::new(Mutex::new(Navigation {
                active,
                pending: HashMap::new(),
                disposed: false,
            })),
        })
    }
}

/// Owner of a fixed set of named section loaders.
///
/// Dropping the orchestrator disposes every loader it owns.
pub struct SectionOrchestrator<T>
where
    T: Clone + Send + Sync + 'static,
{
    order: Vec<String>,
    loaders: HashMap<String, SectionLoader<T>>,
    activation_delay: Duration,
    nav: Arc<Mutex<Navigation>>,
}

impl<T> SectionOrchestrator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn builder() -> OrchestratorBuilder<T> {
        OrchestratorBuilder::new()
    }

    fn loader(&self, id: &str) -> OrchestratorResult<&SectionLoader<T>> {
        self.loaders
            .get(id)
            .ok_or_else(|| OrchestratorError::unknown(id))
    }

    /// Make `id` the active section and schedule its first load if needed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn activate(&self, id: &str) -> OrchestratorResult<ActivateOutcome> {
        let loader = self.loader(id)?;
        let mut nav = lock_nav(&self.nav);

        if nav.disposed {
            return Ok(ActivateOutcome::Disposed);
        }
        if nav.active != id {
            debug!(from = %nav.active, to = id, "switching section");
            nav.active = id.to_string();
        }

        let (loaded_once, loading) =
            loader.with_state(|state| (state.loaded_once, state.is_loading()));
        if loaded_once {
            return Ok(ActivateOutcome::AlreadyLoaded);
        }
        if loading {
            return Ok(ActivateOutcome::InFlight);
        }
        if nav.pending.contains_key(id) {
            return Ok(ActivateOutcome::AlreadyScheduled);
        }

        if self.activation_delay.is_zero() {
            return Ok(match loader.start() {
                StartOutcome::Started => ActivateOutcome::Started,
                StartOutcome::AlreadyLoading => ActivateOutcome::InFlight,
                StartOutcome::Disposed => ActivateOutcome::Disposed,
            });
        }

        let trigger = tokio::spawn(trigger_after_delay(
            Arc::clone(&self.nav),
            loader.clone(),
            self.activation_delay,
        ));
        nav.pending.insert(id.to_string(), trigger);
        debug!(section = id, delay_ms = self.activation_delay.as_millis() as u64, "load scheduled");

        Ok(ActivateOutcome::Scheduled)
    }

    /// Force a new load of `id`, whether or not it loaded before
    pub fn retry_section(&self, id: &str) -> OrchestratorResult<StartOutcome> {
        let loader = self.loader(id)?;
        let mut nav = lock_nav(&self.nav);
        if let Some(pending) = nav.pending.remove(id) {
            pending.abort();
        }
        Ok(loader.retry())
    }

    /// Snapshot of one section's state
    pub fn section_state(&self, id: &str) -> OrchestratorResult<SectionState<T>> {
        Ok(self.loader(id)?.state())
    }

    /// Read one section's state without cloning its payload
    pub fn with_section_state<R>(
        &self,
        id: &str,
        read: impl FnOnce(&SectionState<T>) -> R,
    ) -> OrchestratorResult<R> {
        Ok(self.loader(id)?.with_state(read))
    }

    pub fn active_section(&self) -> String {
        lock_nav(&self.nav).active.clone()
    }

    pub fn active_state(&self) -> SectionState<T> {
        let active = self.active_section();
        self.loaders
            .get(&active)
            .map(SectionLoader::state)
            .unwrap_or_default()
    }

    /// Section ids in display order
    pub fn section_ids(&self) -> &[String] {
        &self.order
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == id)
    }

    /// Id of the section after the active one, wrapping around
    pub fn next_section(&self) -> &str {
        self.neighbor(1)
    }

    /// Id of the section before the active one, wrapping around
    pub fn previous_section(&self) -> &str {
        self.neighbor(self.order.len().saturating_sub(1))
    }

    fn neighbor(&self, offset: usize) -> &str {
        let current = self.position(&self.active_section()).unwrap_or(0);
        &self.order[(current + offset) % self.order.len()]
    }

    /// Whether every section that has been started has settled
    pub fn all_settled(&self) -> bool {
        self.loaders
            .values()
            .all(|loader| !loader.with_state(SectionState::is_loading))
            && lock_nav(&self.nav).pending.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        lock_nav(&self.nav).disposed
    }

    /// Dispose every loader and cancel scheduled loads. Idempotent.
    pub fn dispose(&self) {
        let mut nav = lock_nav(&self.nav);
        if nav.disposed {
            return;
        }
        nav.disposed = true;
        for (_, pending) in nav.pending.drain() {
            pending.abort();
        }
        for loader in self.loaders.values() {
            loader.dispose();
        }
        debug!(sections = self.order.len(), "orchestrator disposed");
    }
}

impl<T> Drop for SectionOrchestrator<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn trigger_after_delay<T>(
    navigation: Arc<Mutex<Navigation>>,
    loader: SectionLoader<T>,
    delay: Duration,
) where
    T: Clone + Send + Sync + 'static,
{
    tokio::time::sleep(delay).await;

    let mut nav = lock_nav(&navigation);
    nav.pending.remove(loader.id());
    if nav.disposed {
        return;
    }
    if nav.active != loader.id() {
        debug!(section = loader.id(), active = %nav.active, "section left before load, skipping");
        return;
    }
    if loader.is_loaded_once() {
        return;
    }
    // Holding the navigation lock keeps activate() from scheduling a duplicate
    loader.start();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SectionStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counted(calls: &Arc<AtomicUsize>) -> SharedFetch<&'static str> {
        let calls = Arc::clone(calls);
        Arc::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<&'static str, anyhow::Error>("payload") }
        })
    }

    fn three_sections(
        calls: &Arc<AtomicUsize>,
        delay: Duration,
    ) -> SectionOrchestrator<&'static str> {
        SectionOrchestrator::builder()
            .section("accounts", counted(calls), LoaderSettings::default())
            .section("transactions", counted(calls), LoaderSettings::default())
            .section("cards", counted(calls), LoaderSettings::default())
            .activation_delay(delay)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_rejects_empty_duplicate_and_unknown_initial() {
        let calls = Arc::new(AtomicUsize::new(0));

        let empty = SectionOrchestrator::<&'static str>::builder().build();
        assert_eq!(empty.err(), Some(OrchestratorError::NoSections));

        let duplicate = SectionOrchestrator::builder()
            .section("a", counted(&calls), LoaderSettings::default())
            .section("a", counted(&calls), LoaderSettings::default())
            .build();
        assert_eq!(
            duplicate.err(),
            Some(OrchestratorError::DuplicateSection("a".into()))
        );

        let unknown = SectionOrchestrator::builder()
            .section("a", counted(&calls), LoaderSettings::default())
            .initial_section("b")
            .build();
        assert_eq!(
            unknown.err(),
            Some(OrchestratorError::UnknownSection("b".into()))
        );
    }

    #[test]
    fn sections_start_idle_and_first_is_active() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = three_sections(&calls, DEFAULT_ACTIVATION_DELAY);

        assert_eq!(orchestrator.active_section(), "accounts");
        assert_eq!(orchestrator.section_ids(), ["accounts", "transactions", "cards"]);
        for id in orchestrator.section_ids() {
            assert_eq!(
                orchestrator.section_state(id).unwrap().status,
                SectionStatus::Idle
            );
        }
        assert_eq!(
            orchestrator.section_state("loans").unwrap_err(),
            OrchestratorError::unknown("loans")
        );
    }

    #[test]
    fn navigation_helpers_wrap_around() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = SectionOrchestrator::builder()
            .section("accounts", counted(&calls), LoaderSettings::default())
            .section("transactions", counted(&calls), LoaderSettings::default())
            .section("cards", counted(&calls), LoaderSettings::default())
            .initial_section("cards")
            .build()
            .unwrap();

        assert_eq!(orchestrator.next_section(), "accounts");
        assert_eq!(orchestrator.previous_section(), "transactions");
        assert_eq!(orchestrator.position("transactions"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn activation_waits_for_the_delay() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = three_sections(&calls, Duration::from_millis(150));

        assert_eq!(
            orchestrator.activate("transactions").unwrap(),
            ActivateOutcome::Scheduled
        );
        sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            orchestrator.section_state("transactions").unwrap().status,
            SectionStatus::Idle
        );

        sleep(Duration::from_millis(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            orchestrator.section_state("transactions").unwrap().status,
            SectionStatus::Ready
        );
    }

    #[tokio::test(start_paused = true)]
    async fn sections_flipped_past_are_not_loaded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = three_sections(&calls, Duration::from_millis(150));

        orchestrator.activate("transactions").unwrap();
        orchestrator.activate("cards").unwrap();
        sleep(Duration::from_millis(200)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            orchestrator.section_state("transactions").unwrap().status,
            SectionStatus::Idle
        );
        assert_eq!(
            orchestrator.section_state("cards").unwrap().status,
            SectionStatus::Ready
        );
        assert!(orchestrator.all_settled());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_starts_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = three_sections(&calls, Duration::ZERO);

        assert_eq!(
            orchestrator.activate("accounts").unwrap(),
            ActivateOutcome::Started
        );
        assert_eq!(
            orchestrator.activate("accounts").unwrap(),
            ActivateOutcome::InFlight
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_section_is_rejected_without_changing_navigation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = three_sections(&calls, Duration::ZERO);

        assert_eq!(
            orchestrator.activate("loans").unwrap_err(),
            OrchestratorError::unknown("loans")
        );
        assert_eq!(orchestrator.active_section(), "accounts");
        assert!(orchestrator.retry_section("loans").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn retry_cancels_a_scheduled_activation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = three_sections(&calls, Duration::from_millis(150));

        orchestrator.activate("cards").unwrap();
        assert_eq!(
            orchestrator.retry_section("cards").unwrap(),
            StartOutcome::Started
        );
        sleep(Duration::from_millis(300)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_orchestrator_disposes_its_loaders() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = three_sections(&calls, Duration::from_millis(150));
        orchestrator.activate("cards").unwrap();
        let loader = orchestrator.loaders["cards"].clone();

        drop(orchestrator);
        sleep(Duration::from_millis(300)).await;

        assert!(loader.is_disposed());
        assert_eq!(loader.status(), SectionStatus::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::dashboards::{self, DashboardKind, SectionDef, SectionPayload};
use crate::events::{map_key, Action, InputMode};
use crate::listing::ListingState;
use crate::loader::{
    ActivateOutcome, SectionEvent, SectionOrchestrator, SectionState, SectionStatus, StartOutcome,
};
use crate::theme::Theme;
use crate::ui;

/// Interactive dashboard state
pub struct App {
    kind: DashboardKind,
    orchestrator: SectionOrchestrator<SectionPayload>,
    events: mpsc::UnboundedReceiver<SectionEvent>,
    listings: HashMap<String, ListingState>,
    input_mode: InputMode,
    theme: Theme,
    page_size: usize,
    tick_rate: Duration,
    /// Latest transition, shown in the status bar
    last_event: Option<SectionEvent>,
    should_quit: bool,
}

impl App {
    /// Build the dashboard and activate its first section.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(kind: DashboardKind, config: &AppConfig, initial: Option<&str>) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let orchestrator = dashboards::build_orchestrator(kind, config, Some(tx), initial)
            .with_context(|| format!("failed to set up the {} dashboard", kind.title()))?;

        let app = Self {
            kind,
            orchestrator,
            events: rx,
            listings: HashMap::new(),
            input_mode: InputMode::Normal,
            theme: Theme::new(config.ui.theme),
            page_size: config.ui.page_size,
            tick_rate: config.tick_rate(),
            last_event: None,
            should_quit: false,
        };

        let active = app.orchestrator.active_section();
        app.select(&active)?;
        Ok(app)
    }

    pub fn kind(&self) -> DashboardKind {
        self.kind
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn last_event(&self) -> Option<&SectionEvent> {
        self.last_event.as_ref()
    }

    pub fn orchestrator(&self) -> &SectionOrchestrator<SectionPayload> {
        &self.orchestrator
    }

    pub fn active_section(&self) -> String {
        self.orchestrator.active_section()
    }

    pub fn active_def(&self) -> Option<&'static SectionDef> {
        self.kind.section(&self.active_section())
    }

    pub fn active_state(&self) -> SectionState<SectionPayload> {
        self.orchestrator.active_state()
    }

    /// Status of every section in display order
    pub fn tab_statuses(&self) -> Vec<(&'static SectionDef, SectionStatus)> {
        self.kind
            .sections()
            .iter()
            .map(|def| {
                let status = self
                    .orchestrator
                    .with_section_state(def.id, |state| state.status)
                    .unwrap_or(SectionStatus::Idle);
                (def, status)
            })
            .collect()
    }

    /// Listing settings for `section`, or fresh ones if never touched
    pub fn listing(&self, section: &str) -> ListingState {
        self.listings
            .get(section)
            .cloned()
            .unwrap_or_else(|| ListingState::new(self.page_size))
    }

    fn listing_mut(&mut self, section: &str) -> &mut ListingState {
        let page_size = self.page_size;
        self.listings
            .entry(section.to_string())
            .or_insert_with(|| ListingState::new(page_size))
    }

    fn select(&self, id: &str) -> Result<ActivateOutcome> {
        let outcome = self.orchestrator.activate(id)?;
        debug!(section = id, ?outcome, "section activated");
        Ok(outcome)
    }

    /// Apply pending loader notifications
    pub fn drain_events(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(event) = self.events.try_recv() {
            debug!(section = %event.section, status = event.status.label(), "section changed");
            self.last_event = Some(event);
            drained += 1;
        }
        drained
    }

    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        let active = self.active_section();

        match action {
            Action::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
            Action::NextSection => {
                let next = self.orchestrator.next_section().to_string();
                self.select(&next)?;
            }
            Action::PreviousSection => {
                let previous = self.orchestrator.previous_section().to_string();
                self.select(&previous)?;
            }
            Action::JumpTo(index) => {
                if let Some(id) = self.orchestrator.section_ids().get(index).cloned() {
                    self.select(&id)?;
                }
            }
            Action::Retry => {
                if self.orchestrator.retry_section(&active)? == StartOutcome::Started {
                    info!(section = %active, "retry requested");
                }
            }
            Action::StartFilter => self.input_mode = InputMode::Filter,
            Action::FilterInput(c) => self.listing_mut(&active).push_filter_char(c),
            Action::FilterBackspace => self.listing_mut(&active).pop_filter_char(),
            Action::ConfirmFilter => self.input_mode = InputMode::Normal,
            Action::CancelFilter => {
                self.listing_mut(&active).set_filter("");
                self.input_mode = InputMode::Normal;
            }
            Action::CycleSort => {
                let columns = self.active_columns();
                self.listing_mut(&active).cycle_sort(columns);
            }
            Action::ToggleSortDirection => self.listing_mut(&active).toggle_direction(),
            Action::NextPage => {
                if let Some(SectionPayload::Records { table }) = self.active_state().data {
                    self.listing_mut(&active).next_page(&table);
                }
            }
            Action::PreviousPage => self.listing_mut(&active).previous_page(),
        }

        Ok(())
    }

    fn active_columns(&self) -> usize {
        self.orchestrator
            .with_section_state(&self.active_section(), |state| match &state.data {
                Some(SectionPayload::Records { table }) => table.columns.len(),
                _ => 0,
            })
            .unwrap_or(0)
    }

    pub async fn run(&mut self) -> Result<()> {
        if !io::stdout().is_tty() {
            return Err(anyhow::anyhow!(
                "dashdeck needs a terminal (TTY); use `dashdeck probe` for headless runs"
            ));
        }

        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

        let result = self.run_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.orchestrator.dispose();
        result
    }

    async fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let mut last_tick = Instant::now();
        let tick_rate = self.tick_rate;

        loop {
            self.drain_events();
            terminal.draw(|frame| ui::render(frame, self))?;

            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(action) = map_key(key, self.input_mode) {
                        self.handle_action(action)?;
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }
}

//! App core.
//!
//! Owns the host, clipboard bridge, state store, settings, clock and the
//! activation scheduler, and routes commands and host events through them.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::database::kv_store::{MemoryStore, StateStore};
use crate::host::{safe_get_tab, ClipboardBridge, SimulatedBrowser, TabHost};
use crate::managers::activation_history::ActivationHistory;
use crate::managers::activation_scheduler::{ActivationScheduler, PendingActivation};
use crate::managers::command_dispatcher::{dispatch, CommandReport};
use crate::types::command::Command;
use crate::types::errors::{CommandError, StoreError};
use crate::types::event::BrowserEvent;
use crate::types::settings::EngineSettings;
use crate::types::tab::{TabQuery, WindowId};

pub struct App<H: TabHost> {
    pub host: H,
    pub clipboard: Box<dyn ClipboardBridge + Send>,
    pub store: Box<dyn StateStore + Send>,
    pub settings: EngineSettings,
    pub clock: Arc<dyn Clock + Send + Sync>,
    pub scheduler: ActivationScheduler,
}

impl<H: TabHost> App<H> {
    pub fn new(
        host: H,
        clipboard: Box<dyn ClipboardBridge + Send>,
        store: Box<dyn StateStore + Send>,
        settings: EngineSettings,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let scheduler = ActivationScheduler::new(settings.activation_debounce_ms);
        Self { host, clipboard, store, settings, clock, scheduler }
    }

    pub fn set_settings(&mut self, settings: EngineSettings) {
        self.scheduler.set_debounce_ms(settings.activation_debounce_ms);
        self.settings = settings;
    }

    /// Runs one keyboard command against `window_id`.
    pub fn run_command(
        &mut self,
        command: Command,
        window_id: WindowId,
    ) -> Result<CommandReport, CommandError> {
        match dispatch(self, command, window_id) {
            Ok(report) => {
                log::info!("{} in window {}: {} action(s)", command, window_id, report.actions.len());
                Ok(report)
            }
            Err(e) => {
                log::warn!("{} in window {} failed: {}", command, window_id, e);
                Err(e)
            }
        }
    }

    /// Like [`run_command`](Self::run_command), taking the host's command name.
    pub fn run_named(&mut self, name: &str, window_id: WindowId) -> Result<CommandReport, CommandError> {
        let command: Command = name.parse()?;
        self.run_command(command, window_id)
    }

    /// Feeds a host notification to the scheduler and history.
    pub fn handle_event(&mut self, event: &BrowserEvent) -> Result<(), CommandError> {
        let now = self.clock.now_ms();
        match *event {
            BrowserEvent::TabActivated { tab_id, window_id } => {
                self.scheduler.on_tab_activated(tab_id, window_id, now);
            }
            BrowserEvent::WindowFocusChanged { window_id } => {
                let active = window_id.and_then(|w| {
                    self.host
                        .query_tabs(&TabQuery::active_in(w))
                        .first()
                        .map(|t| (t.id, t.window_id))
                });
                self.scheduler.on_window_focus_changed(active, now);
            }
            BrowserEvent::TabRemoved { tab_id, .. } => {
                if self.scheduler.cancel_tab(tab_id).is_some() {
                    log::debug!("cancelled pending activation of closed tab {}", tab_id);
                }
                let mut history = self.history()?;
                if history.remove_tab(tab_id) {
                    history.save(self.store.as_ref())?;
                }
            }
        }
        Ok(())
    }

    /// Records `pending` if it is still the live entry and its tab is still active.
    pub fn confirm_activation(&mut self, pending: &PendingActivation) -> Result<bool, CommandError> {
        if !self.scheduler.take_if_current(pending) {
            return Ok(false);
        }
        let still_active = safe_get_tab(&self.host, pending.tab_id)
            .map_or(false, |t| t.active && t.window_id == pending.window_id);
        if !still_active {
            log::debug!("tab {} is no longer active, not recording", pending.tab_id);
            return Ok(false);
        }
        let now = self.clock.now_ms();
        let mut history = self.history()?;
        history.record(pending.tab_id, pending.window_id, now);
        history.save(self.store.as_ref())?;
        Ok(true)
    }

    /// Confirms every pending entry whose debounce has elapsed by the app clock.
    pub fn confirm_due_activations(&mut self) -> Result<usize, CommandError> {
        let now = self.clock.now_ms();
        let mut confirmed = 0;
        for pending in self.scheduler.due(now) {
            if self.confirm_activation(&pending)? {
                confirmed += 1;
            }
        }
        Ok(confirmed)
    }

    pub fn history(&self) -> Result<ActivationHistory, StoreError> {
        ActivationHistory::load(
            self.store.as_ref(),
            &self.host,
            self.settings.history_capacity,
            self.clock.now_ms(),
        )
    }
}

impl App<SimulatedBrowser> {
    /// A simulated browser with an in-memory store and the system clock.
    pub fn simulated(browser: SimulatedBrowser) -> Self {
        let clipboard = browser.clipboard();
        Self::new(
            browser,
            Box::new(clipboard),
            Box::new(MemoryStore::new()),
            EngineSettings::default(),
            Arc::new(SystemClock),
        )
    }
}

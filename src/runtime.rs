//! Async driver for the activation debounce.
//!
//! Each pending confirmation gets a tokio task that sleeps out the debounce
//! and then confirms. Re-arming a window aborts its previous task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::app::App;
use crate::host::TabHost;
use crate::managers::activation_scheduler::PendingActivation;
use crate::managers::command_dispatcher::CommandReport;
use crate::types::command::Command;
use crate::types::errors::CommandError;
use crate::types::event::BrowserEvent;
use crate::types::tab::{TabId, TabQuery, WindowId};

struct Timer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Focused window and active tabs, diffed around a command to synthesize the
/// notifications a browser would send.
#[derive(Debug, PartialEq, Eq)]
struct ActivationState {
    focused: Option<WindowId>,
    active: Vec<(TabId, WindowId)>,
}

impl ActivationState {
    fn capture<H: TabHost>(host: &H) -> Self {
        let query = TabQuery { active: Some(true), ..TabQuery::default() };
        let mut active: Vec<(TabId, WindowId)> =
            host.query_tabs(&query).iter().map(|t| (t.id, t.window_id)).collect();
        active.sort_unstable();
        let focused = host.get_all_windows().iter().find(|w| w.focused).map(|w| w.id);
        Self { focused, active }
    }

    fn events_towards(&self, after: &Self) -> Vec<BrowserEvent> {
        let mut events: Vec<BrowserEvent> = after
            .active
            .iter()
            .filter(|entry| !self.active.contains(entry))
            .map(|&(tab_id, window_id)| BrowserEvent::TabActivated { tab_id, window_id })
            .collect();
        if after.focused != self.focused {
            events.push(BrowserEvent::WindowFocusChanged { window_id: after.focused });
        }
        events
    }
}

pub struct Runtime<H: TabHost + Send + 'static> {
    app: Arc<Mutex<App<H>>>,
    timers: Arc<std::sync::Mutex<HashMap<WindowId, Timer>>>,
}

impl<H: TabHost + Send + 'static> Clone for Runtime<H> {
    fn clone(&self) -> Self {
        Self { app: self.app.clone(), timers: self.timers.clone() }
    }
}

impl<H: TabHost + Send + 'static> Runtime<H> {
    pub fn new(app: App<H>) -> Self {
        Self {
            app: Arc::new(Mutex::new(app)),
            timers: Arc::new(std::sync::Mutex::new(HashMap::new())),
        }
    }

    pub fn app(&self) -> Arc<Mutex<App<H>>> {
        self.app.clone()
    }

    pub async fn run_command(
        &self,
        command: Command,
        window_id: WindowId,
    ) -> Result<CommandReport, CommandError> {
        let report = {
            let mut app = self.app.lock().await;
            let before = ActivationState::capture(&app.host);
            let report = app.run_command(command, window_id);
            let after = ActivationState::capture(&app.host);
            for event in before.events_towards(&after) {
                if let Err(e) = app.handle_event(&event) {
                    log::warn!("could not feed {:?} after {}: {}", event, command, e);
                }
            }
            report
        };
        self.sync_timers().await;
        report
    }

    pub async fn handle_event(&self, event: BrowserEvent) -> Result<(), CommandError> {
        let result = self.app.lock().await.handle_event(&event);
        self.sync_timers().await;
        result
    }

    /// Number of armed timer tasks that have not finished.
    pub fn armed_timers(&self) -> usize {
        self.timers
            .lock()
            .map(|timers| timers.values().filter(|t| !t.handle.is_finished()).count())
            .unwrap_or(0)
    }

    /// Aborts tasks for entries that were cancelled or replaced and spawns
    /// tasks for entries that have none yet.
    async fn sync_timers(&self) {
        let (pending, delay) = {
            let app = self.app.lock().await;
            (app.scheduler.pending(), Duration::from_millis(app.scheduler.debounce_ms()))
        };
        let Ok(mut timers) = self.timers.lock() else {
            log::error!("timer table lock poisoned");
            return;
        };

        timers.retain(|window_id, timer| {
            let live = pending
                .iter()
                .any(|p| p.window_id == *window_id && p.generation == timer.generation);
            if !live {
                timer.handle.abort();
            }
            live
        });

        for entry in pending {
            if timers.contains_key(&entry.window_id) {
                continue;
            }
            let handle = self.spawn_confirmation(entry, delay);
            timers.insert(entry.window_id, Timer { generation: entry.generation, handle });
        }
    }

    fn spawn_confirmation(&self, pending: PendingActivation, delay: Duration) -> JoinHandle<()> {
        let app = self.app.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut app = app.lock().await;
            match app.confirm_activation(&pending) {
                Ok(true) => log::debug!("tab {} confirmed active", pending.tab_id),
                Ok(false) => {}
                Err(e) => log::warn!("could not record activation of tab {}: {}", pending.tab_id, e),
            }
        })
    }
}

//! Debounced activation confirmation.
//!
//! Each window holds at most one pending confirmation. A new activation in
//! the window replaces it; a focus change cancels every pending entry and
//! arms one for the newly focused window. Generations tell a stale timer
//! apart from the entry that replaced it.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::tab::{TabId, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingActivation {
    pub tab_id: TabId,
    pub window_id: WindowId,
    pub due_at: i64,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct ActivationScheduler {
    pending: HashMap<WindowId, PendingActivation>,
    next_generation: u64,
    debounce_ms: i64,
}

impl ActivationScheduler {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            pending: HashMap::new(),
            next_generation: 1,
            debounce_ms: i64::try_from(debounce_ms).unwrap_or(i64::MAX),
        }
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms.max(0) as u64
    }

    /// Applies to entries armed from now on.
    pub fn set_debounce_ms(&mut self, debounce_ms: u64) {
        self.debounce_ms = i64::try_from(debounce_ms).unwrap_or(i64::MAX);
    }

    fn arm(&mut self, tab_id: TabId, window_id: WindowId, now_ms: i64) -> PendingActivation {
        let pending = PendingActivation {
            tab_id,
            window_id,
            due_at: now_ms.saturating_add(self.debounce_ms),
            generation: self.next_generation,
        };
        self.next_generation += 1;
        if let Some(old) = self.pending.insert(window_id, pending) {
            log::debug!("activation of tab {} superseded by tab {}", old.tab_id, tab_id);
        }
        pending
    }

    pub fn on_tab_activated(&mut self, tab_id: TabId, window_id: WindowId, now_ms: i64) -> PendingActivation {
        self.arm(tab_id, window_id, now_ms)
    }

    /// `active` is the focused window's active tab, if focus landed on a window.
    pub fn on_window_focus_changed(
        &mut self,
        active: Option<(TabId, WindowId)>,
        now_ms: i64,
    ) -> Option<PendingActivation> {
        self.cancel_all();
        active.map(|(tab_id, window_id)| self.arm(tab_id, window_id, now_ms))
    }

    /// Cancels the entry waiting on `tab_id`, if any.
    pub fn cancel_tab(&mut self, tab_id: TabId) -> Option<PendingActivation> {
        let window_id = self
            .pending
            .values()
            .find(|p| p.tab_id == tab_id)
            .map(|p| p.window_id)?;
        self.pending.remove(&window_id)
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending_for(&self, window_id: WindowId) -> Option<&PendingActivation> {
        self.pending.get(&window_id)
    }

    /// Every pending entry, earliest due first.
    pub fn pending(&self) -> Vec<PendingActivation> {
        let mut all: Vec<PendingActivation> = self.pending.values().copied().collect();
        all.sort_by_key(|p| (p.due_at, p.generation));
        all
    }

    pub fn due(&self, now_ms: i64) -> Vec<PendingActivation> {
        self.pending().into_iter().filter(|p| p.due_at <= now_ms).collect()
    }

    /// Removes `pending` if it is still the live entry for its window.
    pub fn take_if_current(&mut self, pending: &PendingActivation) -> bool {
        match self.pending.get(&pending.window_id) {
            Some(live) if live.generation == pending.generation => {
                self.pending.remove(&pending.window_id);
                true
            }
            _ => false,
        }
    }
}

//! Activation history for switch-to-last-tab.
//!
//! A most-recent-first list of confirmed activations, deduplicated by tab id
//! and capped. Stored under `lastActiveTabHistory`; the older two-slot
//! `lastActiveTabs` array is migrated on first load.

use serde_json::Value;

use crate::database::kv_store::{StateStore, LAST_ACTIVE_TAB_HISTORY, LEGACY_LAST_ACTIVE_TABS};
use crate::host::{safe_get_tab, TabHost};
use crate::types::errors::StoreError;
use crate::types::memory::ActivationRecord;
use crate::types::tab::{TabId, WindowId};

#[derive(Debug, Clone, PartialEq)]
pub struct ActivationHistory {
    entries: Vec<ActivationRecord>,
    capacity: usize,
}

impl ActivationHistory {
    pub fn new(capacity: usize) -> Self {
        Self { entries: Vec::new(), capacity: capacity.max(1) }
    }

    /// Builds a history from stored JSON, dropping anything unrecognized.
    pub fn from_value(value: &Value, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        let Some(items) = value.as_array() else {
            if !value.is_null() {
                log::warn!("activation history is not an array, starting empty");
            }
            return history;
        };
        for item in items {
            match Self::parse_record(item) {
                Some(record) => {
                    if history.entries.iter().all(|e| e.tab_id != record.tab_id) {
                        history.entries.push(record);
                    }
                }
                None => log::debug!("dropping unrecognized history entry {}", item),
            }
        }
        history.entries.truncate(history.capacity);
        history
    }

    fn parse_record(item: &Value) -> Option<ActivationRecord> {
        let object = item.as_object()?;
        let tab_id = object.get("tabId")?.as_i64()?;
        let window_id = object.get("windowId")?.as_i64()?;
        let last_active_at = object.get("lastActiveAt").and_then(Value::as_i64).unwrap_or(0);
        Some(ActivationRecord { tab_id, window_id, last_active_at })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(&self.entries).unwrap_or(Value::Array(Vec::new()))
    }

    pub fn entries(&self) -> &[ActivationRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ids(&self) -> Vec<TabId> {
        self.entries.iter().map(|e| e.tab_id).collect()
    }

    /// Puts `tab_id` at the front, dropping its older entry and the overflow.
    pub fn record(&mut self, tab_id: TabId, window_id: WindowId, at_ms: i64) {
        self.entries.retain(|e| e.tab_id != tab_id);
        self.entries.insert(0, ActivationRecord { tab_id, window_id, last_active_at: at_ms });
        self.entries.truncate(self.capacity);
    }

    /// Returns whether the tab was present.
    pub fn remove_tab(&mut self, tab_id: TabId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.tab_id != tab_id);
        self.entries.len() != before
    }

    /// Drops entries whose tab no longer exists. Returns whether anything changed.
    pub fn retain_existing<H: TabHost + ?Sized>(&mut self, host: &H) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| safe_get_tab(host, e.tab_id).is_some());
        self.entries.len() != before
    }

    /// The tab switch-to-last-tab should go to.
    ///
    /// When `current` heads the history the second entry is the target,
    /// otherwise the head is. `None` when there is nothing to switch to.
    pub fn switch_target(&self, current: Option<TabId>) -> Option<&ActivationRecord> {
        let head = self.entries.first()?;
        let target = if Some(head.tab_id) == current {
            self.entries.get(1)?
        } else {
            head
        };
        if Some(target.tab_id) == current {
            None
        } else {
            Some(target)
        }
    }

    /// Loads the stored history, migrating the legacy format when needed.
    pub fn load<H: TabHost + ?Sized>(
        store: &dyn StateStore,
        host: &H,
        capacity: usize,
        now_ms: i64,
    ) -> Result<Self, StoreError> {
        match store.get(LAST_ACTIVE_TAB_HISTORY) {
            Ok(Some(value)) => return Ok(Self::from_value(&value, capacity)),
            Ok(None) => {}
            Err(StoreError::SerializationError(e)) => {
                log::warn!("dropping unreadable activation history: {}", e);
                return Ok(Self::new(capacity));
            }
            Err(e) => return Err(e),
        }
        let Some(legacy) = store.get(LEGACY_LAST_ACTIVE_TABS)? else {
            return Ok(Self::new(capacity));
        };

        let mut history = Self::new(capacity);
        if let Some(slots) = legacy.as_array() {
            for slot in slots {
                let Some(tab_id) = slot.as_i64() else { continue };
                if history.entries.iter().any(|e| e.tab_id == tab_id) {
                    continue;
                }
                if let Some(tab) = safe_get_tab(host, tab_id) {
                    history.entries.push(ActivationRecord {
                        tab_id,
                        window_id: tab.window_id,
                        last_active_at: now_ms,
                    });
                }
            }
        }
        history.entries.truncate(history.capacity);
        log::info!("migrated {} legacy activation entries", history.len());
        history.save(store)?;
        store.remove(LEGACY_LAST_ACTIVE_TABS)?;
        Ok(history)
    }

    pub fn save(&self, store: &dyn StateStore) -> Result<(), StoreError> {
        store.set(LAST_ACTIVE_TAB_HISTORY, &self.to_value())
    }
}

use serde::{Deserialize, Serialize};

use super::tab::{TabId, WindowId};

/// Last front/back/move-all-groups invocation, used for repeat detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastAction {
    pub command: String,
    pub tab_ids: Vec<TabId>,
    /// Milliseconds since the UNIX epoch.
    pub timestamp: i64,
}

/// One confirmed activation in the switch-to-last-tab history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRecord {
    pub tab_id: TabId,
    pub window_id: WindowId,
    pub last_active_at: i64,
}

impl LastAction {
    pub fn new(command: &str, tab_ids: Vec<TabId>, timestamp: i64) -> Self {
        Self { command: command.to_string(), tab_ids, timestamp }
    }

    /// True when `command` on `tab_ids` repeats this action within `window_ms`.
    ///
    /// The id lists must match in length and order. A timestamp in the future
    /// never counts as a repeat.
    pub fn is_repeat_of(&self, command: &str, tab_ids: &[TabId], now: i64, window_ms: i64) -> bool {
        self.command == command
            && now
                .checked_sub(self.timestamp)
                .map_or(false, |elapsed| (0..window_ms).contains(&elapsed))
            && self.tab_ids == tab_ids
    }
}

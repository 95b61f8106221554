use serde::{Deserialize, Serialize};

use super::tab::{TabId, WindowId};

/// Host notifications the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserEvent {
    TabActivated { tab_id: TabId, window_id: WindowId },
    /// `None` when focus left every browser window.
    WindowFocusChanged { window_id: Option<WindowId> },
    TabRemoved { tab_id: TabId, window_id: WindowId },
}

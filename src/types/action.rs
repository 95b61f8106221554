use serde::{Deserialize, Serialize};

use super::tab::{GroupId, PageScript, TabId, TabIndex, WindowId};

/// One mutation the engine issues against the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TabAction {
    SetPinned { tab_id: TabId, pinned: bool },
    Ungroup { tab_ids: Vec<TabId> },
    /// `group_id: None` asks the host for a fresh group.
    Group { tab_ids: Vec<TabId>, group_id: Option<GroupId> },
    Move { tab_ids: Vec<TabId>, index: TabIndex },
    MoveToWindow { tab_ids: Vec<TabId>, window_id: WindowId, index: TabIndex },
    MoveGroup { group_id: GroupId, index: TabIndex },
    SetCollapsed { group_id: GroupId, collapsed: bool },
    Activate { tab_id: TabId },
    Navigate { tab_id: TabId, url: String },
    Create { window_id: WindowId, index: TabIndex, pinned: bool, url: Option<String> },
    Remove { tab_ids: Vec<TabId> },
    FocusWindow { window_id: WindowId },
    CreateWindow { urls: Vec<String>, tab_ids: Vec<TabId>, incognito: bool },
    InjectScript { tab_id: TabId, script: PageScript },
    WriteClipboard { text: String },
}

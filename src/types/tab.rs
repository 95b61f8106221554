use serde::{Deserialize, Serialize};

pub type TabId = i64;
pub type WindowId = i64;
pub type GroupId = i64;

/// Snapshot of a browser tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub index: usize,
    pub window_id: WindowId,
    pub pinned: bool,
    /// `None` when the tab is not part of any group.
    pub group_id: Option<GroupId>,
    pub active: bool,
    pub highlighted: bool,
    pub url: String,
    pub title: String,
    pub audible: bool,
}

impl Tab {
    pub fn is_grouped(&self) -> bool {
        self.group_id.is_some()
    }
}

/// A tab group. Member tabs are always a contiguous run of indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabGroup {
    pub id: GroupId,
    pub window_id: WindowId,
    pub collapsed: bool,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Normal,
    Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    pub focused: bool,
    pub incognito: bool,
    pub kind: WindowKind,
}

/// Target position for a move or create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabIndex {
    At(usize),
    /// Append after the last tab.
    End,
}

impl TabIndex {
    /// Host wire form: `-1` for the end of the strip.
    pub fn to_wire(self) -> i64 {
        match self {
            TabIndex::At(i) => i as i64,
            TabIndex::End => -1,
        }
    }

    pub fn from_wire(value: i64) -> Self {
        if value < 0 {
            TabIndex::End
        } else {
            TabIndex::At(value as usize)
        }
    }
}

/// Properties for a tab the host should create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTab {
    pub window_id: Option<WindowId>,
    pub index: Option<usize>,
    pub pinned: bool,
    pub active: bool,
    pub url: Option<String>,
}

/// Partial update applied to a tab; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabUpdate {
    pub active: Option<bool>,
    pub pinned: Option<bool>,
    pub url: Option<String>,
}

impl TabUpdate {
    pub fn activate() -> Self {
        Self { active: Some(true), ..Self::default() }
    }

    pub fn pinned(pinned: bool) -> Self {
        Self { pinned: Some(pinned), ..Self::default() }
    }

    pub fn navigate(url: &str) -> Self {
        Self { url: Some(url.to_string()), ..Self::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateWindow {
    /// URLs to open, one tab each.
    pub urls: Vec<String>,
    /// Existing tabs to move into the new window.
    pub tab_ids: Vec<TabId>,
    pub incognito: bool,
    pub focused: bool,
}

/// Filter for tab queries. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabQuery {
    pub window_id: Option<WindowId>,
    pub highlighted: Option<bool>,
    pub active: Option<bool>,
    pub pinned: Option<bool>,
    pub audible: Option<bool>,
    pub group_id: Option<GroupId>,
}

impl TabQuery {
    pub fn window(window_id: WindowId) -> Self {
        Self { window_id: Some(window_id), ..Self::default() }
    }

    pub fn highlighted_in(window_id: WindowId) -> Self {
        Self { window_id: Some(window_id), highlighted: Some(true), ..Self::default() }
    }

    pub fn active_in(window_id: WindowId) -> Self {
        Self { window_id: Some(window_id), active: Some(true), ..Self::default() }
    }

    pub fn matches(&self, tab: &Tab) -> bool {
        self.window_id.map_or(true, |w| tab.window_id == w)
            && self.highlighted.map_or(true, |h| tab.highlighted == h)
            && self.active.map_or(true, |a| tab.active == a)
            && self.pinned.map_or(true, |p| tab.pinned == p)
            && self.audible.map_or(true, |a| tab.audible == a)
            && self.group_id.map_or(true, |g| tab.group_id == Some(g))
    }
}

/// Page-side scripts the engine asks the host to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageScript {
    /// Write `location.href` to the clipboard from inside the page.
    CopyLocation,
    /// Pause every playing media element.
    PauseMedia,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptOutcome {
    Done,
    /// Number of media elements the script paused.
    Paused(u32),
}

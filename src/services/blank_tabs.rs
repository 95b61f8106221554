//! Blank-tab reuse for the new-tab placement commands.
//!
//! A blank tab already sitting in the target slot is deleted and recreated
//! rather than activated, so the host gives the fresh tab input focus. After
//! placement every other blank tab in the window is swept.

use serde::Serialize;

use crate::services::layout_snapshot::Layout;
use crate::types::tab::{GroupId, Tab, TabId, TabIndex};

const BLANK_URLS: [&str; 4] = ["chrome://newtab/", "chrome://newtab", "about:blank", ""];
const BLANK_TITLE: &str = "New Tab";

pub fn is_blank_tab(tab: &Tab) -> bool {
    BLANK_URLS.contains(&tab.url.as_str()) || tab.title == BLANK_TITLE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Right of the active tab, in its group.
    Near,
    /// After the last tab, ungrouped.
    AtEnd,
    /// At the end of the active tab's group.
    InGroup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTabPlan {
    pub index: TabIndex,
    /// Group the new tab must join.
    pub group_id: Option<GroupId>,
    /// Blank tab to delete before creating the new one.
    pub replace: Option<TabId>,
}

fn same_context(candidate: &Tab, group_id: Option<GroupId>) -> bool {
    is_blank_tab(candidate) && !candidate.pinned && candidate.group_id == group_id
}

/// Plans where a new tab goes. `None` means the command does nothing
/// (no active tab, or `InGroup` on an ungrouped tab).
pub fn plan_new_tab(layout: &Layout, placement: Placement) -> Option<NewTabPlan> {
    match placement {
        Placement::Near => {
            let active = layout.active()?;
            let group_id = if active.pinned { None } else { active.group_id };
            let slot = active.index + 1;
            let replace = layout
                .tab_at(slot as i64)
                .filter(|t| same_context(t, group_id))
                .map(|t| t.id);
            Some(NewTabPlan { index: TabIndex::At(slot), group_id, replace })
        }
        Placement::AtEnd => {
            let replace = layout
                .tabs()
                .last()
                .filter(|t| same_context(t, None))
                .map(|t| t.id);
            Some(NewTabPlan { index: TabIndex::End, group_id: None, replace })
        }
        Placement::InGroup => {
            let active = layout.active()?;
            let group_id = active.group_id?;
            let range = layout.group_range(group_id)?;
            let members = layout.group_members(group_id);
            // The group would vanish if its only member were deleted first.
            let replace = if members.len() > 1 {
                layout
                    .tab_at(range.end as i64 - 1)
                    .filter(|t| same_context(t, Some(group_id)))
                    .map(|t| t.id)
            } else {
                None
            };
            let index = match replace {
                Some(_) => TabIndex::At(range.end - 1),
                None => TabIndex::At(range.end),
            };
            Some(NewTabPlan { index, group_id: Some(group_id), replace })
        }
    }
}

/// Blank tabs of the window other than `keep`.
pub fn sweep_targets(layout: &Layout, keep: TabId) -> Vec<TabId> {
    layout
        .tabs()
        .iter()
        .filter(|t| t.id != keep && is_blank_tab(t))
        .map(|t| t.id)
        .collect()
}

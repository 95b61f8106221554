//! Move-all-groups: sends every tab group to the front of the unpinned region,
//! or to the back when they are already gathered at the tail.

use serde::Serialize;

use crate::services::layout_snapshot::Layout;
use crate::types::action::TabAction;
use crate::types::tab::{TabId, TabIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupDirection {
    Front,
    Back,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMovePlan {
    pub direction: GroupDirection,
    pub actions: Vec<TabAction>,
    /// Ids of every grouped tab, in strip order.
    pub grouped_tab_ids: Vec<TabId>,
}

/// Returns `None` when the window has no groups or no grouped tabs.
pub fn plan_move_all_groups(layout: &Layout) -> Option<GroupMovePlan> {
    let unpinned = layout.tabs().iter().filter(|t| !t.pinned);
    let (grouped, ungrouped): (Vec<_>, Vec<_>) = unpinned.partition(|t| t.is_grouped());
    let groups = layout.groups_in_order();
    if groups.is_empty() || grouped.is_empty() {
        return None;
    }

    let max_ungrouped = ungrouped.iter().map(|t| t.index).max();
    let at_tail = match max_ungrouped {
        Some(max) => grouped.iter().all(|t| t.index > max),
        None => true,
    };

    let (direction, actions) = if at_tail {
        // Same target for every group: issue last-to-first so they keep their order.
        let front = TabIndex::At(layout.pinned_count());
        let actions = groups
            .iter()
            .rev()
            .map(|g| TabAction::MoveGroup { group_id: g.id, index: front })
            .collect();
        (GroupDirection::Front, actions)
    } else {
        let actions = groups
            .iter()
            .map(|g| TabAction::MoveGroup { group_id: g.id, index: TabIndex::End })
            .collect();
        (GroupDirection::Back, actions)
    };

    Some(GroupMovePlan {
        direction,
        actions,
        grouped_tab_ids: grouped.iter().map(|t| t.id).collect(),
    })
}

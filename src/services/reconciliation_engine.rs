//! Reconciliation Engine.
//!
//! Turns a move request for the highlighted tabs into the host mutations that
//! realise it across the pinned/unpinned, grouped/ungrouped and
//! collapsed/expanded partitions of the strip.

use crate::services::layout_snapshot::Layout;
use crate::types::action::TabAction;
use crate::types::tab::{Tab, TabId, TabIndex};

/// Where the selection should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    /// One slot left of the first selected tab.
    StepLeft,
    /// One slot right of the last selected tab.
    StepRight,
    /// Snap to the given index (start of a partition).
    ToFront(usize),
    /// Snap to the given index, or append.
    ToBack(TabIndex),
}

impl MoveIntent {
    /// Rightward travel governs the collapsed-group scan and its back-off.
    pub fn is_rightward(&self) -> bool {
        matches!(self, MoveIntent::StepRight | MoveIntent::ToBack(_))
    }

    pub fn is_snap(&self) -> bool {
        matches!(self, MoveIntent::ToFront(_) | MoveIntent::ToBack(_))
    }
}

/// Plans the mutations for moving `selected` (index-ordered, one window).
///
/// Returns an empty plan when nothing should happen. Crossing the pinned
/// boundary pins or unpins instead of moving. A step that leaves the strip or
/// the tab's group only ungroups. A step from an ungrouped tab onto an
/// expanded group joins it; onto a collapsed group it jumps the whole group
/// when `skip_collapsed` is set.
pub fn plan_move(
    selected: &[Tab],
    intent: MoveIntent,
    layout: &Layout,
    skip_collapsed: bool,
) -> Vec<TabAction> {
    let (Some(first), Some(last)) = (selected.first(), selected.last()) else {
        return Vec::new();
    };
    let tab_ids: Vec<TabId> = selected.iter().map(|t| t.id).collect();
    let len = layout.len() as i64;
    let snap = intent.is_snap();

    let mut dest: i64 = match intent {
        MoveIntent::StepLeft => first.index as i64 - 1,
        MoveIntent::StepRight => last.index as i64 + 1,
        MoveIntent::ToFront(i) => i as i64,
        MoveIntent::ToBack(TabIndex::At(i)) => i as i64,
        MoveIntent::ToBack(TabIndex::End) => -1,
    };
    if snap && dest >= len {
        dest = -1;
    }

    let target = layout.tab_at(dest);

    if let Some(target) = target {
        if target.pinned && !first.pinned {
            log::debug!("tab {} crosses into the pinned prefix, pinning", first.id);
            return tab_ids
                .iter()
                .map(|&tab_id| TabAction::SetPinned { tab_id, pinned: true })
                .collect();
        }
        if !target.pinned && first.pinned {
            log::debug!("tab {} leaves the pinned prefix, unpinning", first.id);
            // Reverse order so re-insertion after the prefix keeps relative order.
            return tab_ids
                .iter()
                .rev()
                .map(|&tab_id| TabAction::SetPinned { tab_id, pinned: false })
                .collect();
        }
    }

    if !snap && (dest < 0 || dest >= len) {
        return if first.is_grouped() {
            vec![TabAction::Ungroup { tab_ids }]
        } else {
            Vec::new()
        };
    }

    let mut actions = Vec::new();
    let target_group = target.and_then(|t| t.group_id);

    if first.is_grouped() && target_group != first.group_id {
        actions.push(TabAction::Ungroup { tab_ids: tab_ids.clone() });
        if !snap {
            return actions;
        }
    } else if !snap && skip_collapsed && !first.is_grouped() {
        if let Some(group_id) = target_group {
            if !layout.is_collapsed(group_id) {
                return vec![TabAction::Group { tab_ids, group_id: Some(group_id) }];
            }
            dest = skip_collapsed_run(layout, first, dest, intent.is_rightward());
            log::debug!("skipped collapsed group {}, landing at {}", group_id, dest);
        }
    }

    let index = match usize::try_from(dest) {
        Ok(i) => TabIndex::At(i),
        Err(_) => TabIndex::End,
    };
    actions.push(TabAction::Move { tab_ids, index });
    actions
}

/// Walks from `dest` over tabs of collapsed groups in the direction of travel.
///
/// Stops at an ungrouped tab, a tab of `moving`'s own group, an expanded group
/// or the edge of the strip, then backs off one slot so the result sits just
/// outside the skipped run. Every index is visited at most once.
pub fn skip_collapsed_run(layout: &Layout, moving: &Tab, mut dest: i64, rightward: bool) -> i64 {
    let step = if rightward { 1 } else { -1 };
    let len = layout.len() as i64;
    let mut skipped = false;

    while (0..len).contains(&dest) {
        let Some(tab) = layout.tab_at(dest) else { break };
        let stop = match tab.group_id {
            None => true,
            Some(g) => Some(g) == moving.group_id || !layout.is_collapsed(g),
        };
        if stop {
            break;
        }
        skipped = true;
        dest += step;
    }

    if skipped {
        dest -= step;
    }
    dest
}

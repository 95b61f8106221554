//! Front/back snapping with repeat-to-toggle.
//!
//! A fresh "move to front" snaps the selection to the start of its partition.
//! Repeating it on the same tabs inside the toggle window, once they already
//! sit there, pins them (or ungroups them when grouped). "Move to back" mirrors
//! this: pinned tabs unpin, grouped tabs ungroup.

use crate::services::layout_snapshot::Layout;
use crate::services::reconciliation_engine::{plan_move, MoveIntent};
use crate::types::action::TabAction;
use crate::types::command::Command;
use crate::types::memory::LastAction;
use crate::types::settings::EngineSettings;
use crate::types::tab::{Tab, TabId, TabIndex};

/// Result of one front/back invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapOutcome {
    pub actions: Vec<TabAction>,
    /// Whether the repeat branch (pin/unpin/ungroup) was taken.
    pub toggled: bool,
    /// Record to persist for the next invocation.
    pub memory: LastAction,
}

fn occupies(selected: &[Tab], start: usize) -> bool {
    selected.iter().enumerate().all(|(k, t)| t.index == start + k)
}

fn is_repeat(
    command: Command,
    tab_ids: &[TabId],
    memory: Option<&LastAction>,
    now_ms: i64,
    settings: &EngineSettings,
) -> bool {
    memory.map_or(false, |m| {
        m.is_repeat_of(command.as_str(), tab_ids, now_ms, settings.toggle_window_ms)
    })
}

pub fn plan_move_to_front(
    selected: &[Tab],
    layout: &Layout,
    memory: Option<&LastAction>,
    now_ms: i64,
    settings: &EngineSettings,
) -> SnapOutcome {
    let command = Command::MoveTabsToFront;
    let tab_ids: Vec<TabId> = selected.iter().map(|t| t.id).collect();
    let repeat = is_repeat(command, &tab_ids, memory, now_ms, settings);
    let skip = settings.skip_collapsed_groups;

    let (actions, toggled) = match selected.first() {
        None => (Vec::new(), false),
        Some(first) if first.pinned => {
            (plan_move(selected, MoveIntent::ToFront(0), layout, skip), false)
        }
        Some(first) => match first.group_id {
            Some(group_id) => {
                let start = layout
                    .group_range(group_id)
                    .map_or(first.index, |r| r.start);
                if repeat && occupies(selected, start) {
                    (vec![TabAction::Ungroup { tab_ids: tab_ids.clone() }], true)
                } else {
                    (plan_move(selected, MoveIntent::ToFront(start), layout, skip), false)
                }
            }
            None => {
                let expected = layout.pinned_count();
                if repeat && occupies(selected, expected) {
                    let pins = tab_ids
                        .iter()
                        .map(|&tab_id| TabAction::SetPinned { tab_id, pinned: true })
                        .collect();
                    (pins, true)
                } else {
                    (plan_move(selected, MoveIntent::ToFront(expected), layout, skip), false)
                }
            }
        },
    };

    SnapOutcome {
        actions,
        toggled,
        memory: LastAction::new(command.as_str(), tab_ids, now_ms),
    }
}

pub fn plan_move_to_back(
    selected: &[Tab],
    layout: &Layout,
    memory: Option<&LastAction>,
    now_ms: i64,
    settings: &EngineSettings,
) -> SnapOutcome {
    let command = Command::MoveTabsToBack;
    let tab_ids: Vec<TabId> = selected.iter().map(|t| t.id).collect();
    let repeat = is_repeat(command, &tab_ids, memory, now_ms, settings);
    let skip = settings.skip_collapsed_groups;
    let k = selected.len();

    let (actions, toggled) = match selected.first() {
        None => (Vec::new(), false),
        Some(first) if first.pinned => {
            let prefix = layout.pinned_count();
            if repeat && occupies(selected, prefix.saturating_sub(k)) {
                let unpins = tab_ids
                    .iter()
                    .rev()
                    .map(|&tab_id| TabAction::SetPinned { tab_id, pinned: false })
                    .collect();
                (unpins, true)
            } else {
                let tail = TabIndex::At(prefix.saturating_sub(1));
                (plan_move(selected, MoveIntent::ToBack(tail), layout, skip), false)
            }
        }
        Some(first) => match first.group_id {
            Some(group_id) => {
                let end = layout.group_range(group_id).map_or(first.index + 1, |r| r.end);
                if repeat && occupies(selected, end.saturating_sub(k)) {
                    (vec![TabAction::Ungroup { tab_ids: tab_ids.clone() }], true)
                } else {
                    let tail = TabIndex::At(end.saturating_sub(1));
                    (plan_move(selected, MoveIntent::ToBack(tail), layout, skip), false)
                }
            }
            None => (
                plan_move(selected, MoveIntent::ToBack(TabIndex::End), layout, skip),
                false,
            ),
        },
    };

    SnapOutcome {
        actions,
        toggled,
        memory: LastAction::new(command.as_str(), tab_ids, now_ms),
    }
}

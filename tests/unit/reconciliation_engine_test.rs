//! Unit tests for `plan_move`, built on hand-made layouts.

use rstest::rstest;

use tabkeys::services::layout_snapshot::Layout;
use tabkeys::services::reconciliation_engine::{plan_move, skip_collapsed_run, MoveIntent};
use tabkeys::types::action::TabAction;
use tabkeys::types::tab::{Tab, TabGroup, TabIndex};

const W: i64 = 1;

/// Tab at `index` with id `100 + index`.
fn tab(index: usize, pinned: bool, group: Option<i64>) -> Tab {
    Tab {
        id: 100 + index as i64,
        index,
        window_id: W,
        pinned,
        group_id: group,
        active: false,
        highlighted: false,
        url: format!("https://site{}.test", index),
        title: format!("Site {}", index),
        audible: false,
    }
}

fn group(id: i64, collapsed: bool) -> TabGroup {
    TabGroup { id, window_id: W, collapsed, title: String::new() }
}

/// `[P0, G1:T1, G1:T2, T3]` with group 1 collapsed or not.
fn pinned_group_tail(collapsed: bool) -> Layout {
    Layout::from_parts(
        W,
        vec![tab(0, true, None), tab(1, false, Some(1)), tab(2, false, Some(1)), tab(3, false, None)],
        vec![group(1, collapsed)],
    )
}

fn pick(layout: &Layout, indices: &[usize]) -> Vec<Tab> {
    indices.iter().map(|&i| layout.tabs()[i].clone()).collect()
}

#[test]
fn test_step_left_skips_collapsed_group_to_after_pinned() {
    let layout = pinned_group_tail(true);
    let selected = pick(&layout, &[3]);
    let actions = plan_move(&selected, MoveIntent::StepLeft, &layout, true);
    assert_eq!(actions, vec![TabAction::Move { tab_ids: vec![103], index: TabIndex::At(1) }]);
}

#[test]
fn test_step_left_onto_expanded_group_joins_it() {
    let layout = pinned_group_tail(false);
    let selected = pick(&layout, &[3]);
    let actions = plan_move(&selected, MoveIntent::StepLeft, &layout, true);
    assert_eq!(actions, vec![TabAction::Group { tab_ids: vec![103], group_id: Some(1) }]);
}

#[test]
fn test_skip_disabled_moves_into_raw_slot() {
    let layout = pinned_group_tail(true);
    let selected = pick(&layout, &[3]);
    let actions = plan_move(&selected, MoveIntent::StepLeft, &layout, false);
    assert_eq!(actions, vec![TabAction::Move { tab_ids: vec![103], index: TabIndex::At(2) }]);
}

#[test]
fn test_step_right_skips_collapsed_group_and_lands_after_it() {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, false, None), tab(1, false, Some(4)), tab(2, false, Some(4)), tab(3, false, None)],
        vec![group(4, true)],
    );
    let selected = pick(&layout, &[0]);
    let actions = plan_move(&selected, MoveIntent::StepRight, &layout, true);
    assert_eq!(actions, vec![TabAction::Move { tab_ids: vec![100], index: TabIndex::At(2) }]);
}

#[test]
fn test_step_right_over_collapsed_group_at_strip_end() {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, false, None), tab(1, false, Some(4)), tab(2, false, Some(4))],
        vec![group(4, true)],
    );
    let selected = pick(&layout, &[0]);
    let actions = plan_move(&selected, MoveIntent::StepRight, &layout, true);
    assert_eq!(actions, vec![TabAction::Move { tab_ids: vec![100], index: TabIndex::At(2) }]);
}

#[test]
fn test_unpinned_step_into_pinned_prefix_pins() {
    let layout = pinned_group_tail(true);
    let selected = pick(&layout, &[1]);
    let actions = plan_move(&selected, MoveIntent::StepLeft, &layout, true);
    assert_eq!(actions, vec![TabAction::SetPinned { tab_id: 101, pinned: true }]);
}

#[test]
fn test_pinned_step_out_of_prefix_unpins_in_reverse() {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, true, None), tab(1, true, None), tab(2, false, None)],
        vec![],
    );
    let selected = pick(&layout, &[0, 1]);
    let actions = plan_move(&selected, MoveIntent::StepRight, &layout, true);
    assert_eq!(
        actions,
        vec![
            TabAction::SetPinned { tab_id: 101, pinned: false },
            TabAction::SetPinned { tab_id: 100, pinned: false },
        ]
    );
}

#[rstest]
#[case(MoveIntent::StepLeft, 1)]
#[case(MoveIntent::StepRight, 2)]
fn test_grouped_step_out_of_group_only_ungroups(#[case] intent: MoveIntent, #[case] index: usize) {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, false, None), tab(1, false, Some(2)), tab(2, false, Some(2)), tab(3, false, None)],
        vec![group(2, false)],
    );
    let selected = pick(&layout, &[index]);
    let actions = plan_move(&selected, intent, &layout, true);
    assert_eq!(actions, vec![TabAction::Ungroup { tab_ids: vec![100 + index as i64] }]);
}

#[rstest]
#[case(MoveIntent::StepLeft, 0, vec![])]
#[case(MoveIntent::StepRight, 2, vec![])]
fn test_ungrouped_step_off_the_strip_is_noop(
    #[case] intent: MoveIntent,
    #[case] index: usize,
    #[case] expected: Vec<TabAction>,
) {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, false, None), tab(1, false, None), tab(2, false, None)],
        vec![],
    );
    let selected = pick(&layout, &[index]);
    assert_eq!(plan_move(&selected, intent, &layout, true), expected);
}

#[test]
fn test_grouped_step_off_the_strip_ungroups() {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, false, None), tab(1, false, Some(3))],
        vec![group(3, false)],
    );
    let selected = pick(&layout, &[1]);
    let actions = plan_move(&selected, MoveIntent::StepRight, &layout, true);
    assert_eq!(actions, vec![TabAction::Ungroup { tab_ids: vec![101] }]);
}

#[test]
fn test_step_within_group_moves() {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, false, Some(5)), tab(1, false, Some(5)), tab(2, false, Some(5))],
        vec![group(5, false)],
    );
    let selected = pick(&layout, &[2]);
    let actions = plan_move(&selected, MoveIntent::StepLeft, &layout, true);
    assert_eq!(actions, vec![TabAction::Move { tab_ids: vec![102], index: TabIndex::At(1) }]);
}

#[test]
fn test_snap_of_grouped_tab_into_other_group_ungroups_then_moves() {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, false, Some(1)), tab(1, false, None), tab(2, false, Some(2))],
        vec![group(1, false), group(2, false)],
    );
    let selected = pick(&layout, &[2]);
    let actions = plan_move(&selected, MoveIntent::ToFront(0), &layout, true);
    assert_eq!(
        actions,
        vec![
            TabAction::Ungroup { tab_ids: vec![102] },
            TabAction::Move { tab_ids: vec![102], index: TabIndex::At(0) },
        ]
    );
}

#[test]
fn test_snap_past_the_strip_appends() {
    let layout = Layout::from_parts(W, vec![tab(0, false, None), tab(1, false, None)], vec![]);
    let selected = pick(&layout, &[0]);
    let actions = plan_move(&selected, MoveIntent::ToBack(TabIndex::At(9)), &layout, true);
    assert_eq!(actions, vec![TabAction::Move { tab_ids: vec![100], index: TabIndex::End }]);
}

#[test]
fn test_empty_selection_plans_nothing() {
    let layout = pinned_group_tail(false);
    assert!(plan_move(&[], MoveIntent::StepLeft, &layout, true).is_empty());
}

#[test]
fn test_skip_scan_stops_at_own_group() {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, false, Some(7)), tab(1, false, Some(8)), tab(2, false, Some(8))],
        vec![group(7, true), group(8, true)],
    );
    let moving = layout.tabs()[2].clone();
    // Starting on a member of the mover's own group stops immediately.
    assert_eq!(skip_collapsed_run(&layout, &moving, 1, false), 1);
}

#[test]
fn test_skip_scan_crosses_adjacent_collapsed_groups() {
    let layout = Layout::from_parts(
        W,
        vec![
            tab(0, false, None),
            tab(1, false, Some(7)),
            tab(2, false, Some(8)),
            tab(3, false, None),
        ],
        vec![group(7, true), group(8, true)],
    );
    let moving = layout.tabs()[3].clone();
    assert_eq!(skip_collapsed_run(&layout, &moving, 2, false), 1);
}

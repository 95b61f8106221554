use tabkeys::services::group_mover::{plan_move_all_groups, GroupDirection};
use tabkeys::services::layout_snapshot::Layout;
use tabkeys::types::action::TabAction;
use tabkeys::types::tab::{Tab, TabGroup, TabIndex};

const W: i64 = 1;

fn tab(index: usize, pinned: bool, group: Option<i64>) -> Tab {
    Tab {
        id: 100 + index as i64,
        index,
        window_id: W,
        pinned,
        group_id: group,
        active: false,
        highlighted: false,
        url: String::new(),
        title: String::new(),
        audible: false,
    }
}

fn groups(ids: &[i64]) -> Vec<TabGroup> {
    ids.iter()
        .map(|&id| TabGroup { id, window_id: W, collapsed: false, title: String::new() })
        .collect()
}

#[test]
fn test_no_groups_is_noop() {
    let layout = Layout::from_parts(W, vec![tab(0, false, None), tab(1, false, None)], vec![]);
    assert!(plan_move_all_groups(&layout).is_none());
}

#[test]
fn test_group_without_members_is_noop() {
    let layout = Layout::from_parts(W, vec![tab(0, false, None)], groups(&[4]));
    assert!(plan_move_all_groups(&layout).is_none());
}

#[test]
fn test_scattered_groups_go_to_back_in_ascending_order() {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, false, None), tab(1, false, Some(2)), tab(2, false, None), tab(3, false, Some(1))],
        groups(&[1, 2]),
    );
    let plan = plan_move_all_groups(&layout).unwrap();
    assert_eq!(plan.direction, GroupDirection::Back);
    assert_eq!(
        plan.actions,
        vec![
            TabAction::MoveGroup { group_id: 2, index: TabIndex::End },
            TabAction::MoveGroup { group_id: 1, index: TabIndex::End },
        ]
    );
    assert_eq!(plan.grouped_tab_ids, vec![101, 103]);
}

#[test]
fn test_groups_at_tail_go_to_front_in_descending_order() {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, true, None), tab(1, false, None), tab(2, false, Some(5)), tab(3, false, Some(6))],
        groups(&[5, 6]),
    );
    let plan = plan_move_all_groups(&layout).unwrap();
    assert_eq!(plan.direction, GroupDirection::Front);
    assert_eq!(
        plan.actions,
        vec![
            TabAction::MoveGroup { group_id: 6, index: TabIndex::At(1) },
            TabAction::MoveGroup { group_id: 5, index: TabIndex::At(1) },
        ]
    );
}

#[test]
fn test_only_grouped_tabs_counts_as_tail() {
    let layout = Layout::from_parts(
        W,
        vec![tab(0, false, Some(1)), tab(1, false, Some(2))],
        groups(&[1, 2]),
    );
    let plan = plan_move_all_groups(&layout).unwrap();
    assert_eq!(plan.direction, GroupDirection::Front);
}

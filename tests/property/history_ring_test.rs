//! Property-based tests for the switch-to-last-tab history.

use proptest::prelude::*;

use tabkeys::managers::activation_history::ActivationHistory;

/// Most recent first, no duplicates, at most `capacity` entries.
fn model(visits: &[i64], capacity: usize) -> Vec<i64> {
    let mut out: Vec<i64> = Vec::new();
    for &id in visits.iter().rev() {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out.truncate(capacity.max(1));
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_record_matches_model(
        visits in prop::collection::vec(0..10i64, 0..40),
        capacity in 0..7usize,
    ) {
        let mut history = ActivationHistory::new(capacity);
        for (t, &id) in visits.iter().enumerate() {
            history.record(id, 1, t as i64);
        }
        prop_assert_eq!(history.ids(), model(&visits, capacity));
        prop_assert!(history.len() <= capacity.max(1));
    }

    #[test]
    fn prop_switch_target_never_returns_current(
        visits in prop::collection::vec(0..6i64, 0..20),
        current in prop::option::of(0..6i64),
    ) {
        let mut history = ActivationHistory::new(8);
        for &id in &visits {
            history.record(id, 1, 0);
        }
        let ids = history.ids();
        let target = history.switch_target(current).map(|r| r.tab_id);

        prop_assert!(target.is_none() || target != current);
        match (ids.first(), current) {
            (None, _) => prop_assert_eq!(target, None),
            (Some(&head), Some(c)) if head == c => prop_assert_eq!(target, ids.get(1).copied()),
            (Some(&head), _) => prop_assert_eq!(target, Some(head)),
        }
    }

    #[test]
    fn prop_value_round_trip_preserves_order(
        visits in prop::collection::vec(0..10i64, 0..20),
    ) {
        let mut history = ActivationHistory::new(8);
        for (t, &id) in visits.iter().enumerate() {
            history.record(id, id % 3, t as i64);
        }
        let restored = ActivationHistory::from_value(&history.to_value(), 8);
        prop_assert_eq!(restored, history);
    }
}

//! Property-based tests for strip layout invariants.
//!
//! For any strip of pinned tabs, loose tabs and (collapsed or expanded)
//! groups, and any sequence of step/snap commands on a single highlighted
//! tab, the pinned tabs stay a prefix, groups stay contiguous and no tab is
//! created or lost.

use std::sync::Arc;

use proptest::prelude::*;

use tabkeys::app::App;
use tabkeys::clock::ManualClock;
use tabkeys::database::MemoryStore;
use tabkeys::host::{SimulatedBrowser, TabHost};
use tabkeys::types::command::Command;
use tabkeys::types::settings::EngineSettings;

/// One run of unpinned tabs: a loose tab, or a group of `size` tabs.
#[derive(Debug, Clone)]
enum Segment {
    Loose,
    Group { size: usize, collapsed: bool },
}

fn arb_segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        2 => Just(Segment::Loose),
        2 => (1..4usize, any::<bool>()).prop_map(|(size, collapsed)| Segment::Group { size, collapsed }),
    ]
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        3 => Just(Command::MoveTabsLeft),
        3 => Just(Command::MoveTabsRight),
        1 => Just(Command::MoveTabsToFront),
        1 => Just(Command::MoveTabsToBack),
    ]
}

fn build(pinned: usize, segments: &[Segment]) -> (SimulatedBrowser, i64) {
    let mut browser = SimulatedBrowser::new();
    let w = browser.open_window();
    for i in 0..pinned {
        browser.add_pinned_tab(w, &format!("https://pinned.test/{}", i)).unwrap();
    }
    for (n, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Loose => {
                browser.add_tab(w, &format!("https://loose.test/{}", n)).unwrap();
            }
            Segment::Group { size, collapsed } => {
                let ids: Vec<i64> = (0..*size)
                    .map(|k| browser.add_tab(w, &format!("https://group.test/{}/{}", n, k)).unwrap())
                    .collect();
                browser.add_group(&ids, *collapsed).unwrap();
            }
        }
    }
    (browser, w)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_single_tab_moves_keep_invariants(
        pinned in 0..3usize,
        segments in prop::collection::vec(arb_segment(), 1..6),
        pick in any::<prop::sample::Index>(),
        steps in prop::collection::vec((arb_command(), prop::bool::ANY), 1..25),
        skip_collapsed in any::<bool>(),
    ) {
        let (mut browser, w) = build(pinned, &segments);
        prop_assert!(browser.check_invariants(w).is_ok());

        let mut before = browser.tab_ids(w);
        let selected = before[pick.index(before.len())];
        browser.select(w, &[selected]).unwrap();

        let clock = ManualClock::new(1_700_000_000_000);
        let clipboard = browser.clipboard();
        let mut app = App::new(
            browser,
            Box::new(clipboard),
            Box::new(MemoryStore::new()),
            EngineSettings { skip_collapsed_groups: skip_collapsed, ..EngineSettings::default() },
            Arc::new(clock.clone()),
        );
        before.sort_unstable();

        for (command, wait) in steps {
            clock.advance(if wait { 3_000 } else { 0 });
            app.run_command(command, w).unwrap();

            if let Err(broken) = app.host.check_invariants(w) {
                prop_assert!(false, "{} broke the strip: {}", command, broken);
            }
            let mut after = app.host.tab_ids(w);
            after.sort_unstable();
            prop_assert_eq!(&after, &before);
            prop_assert!(app.host.get_tab(selected).unwrap().highlighted);
        }
    }

    #[test]
    fn prop_step_left_then_right_on_loose_strip_is_identity(
        len in 2..8usize,
        pick in any::<prop::sample::Index>(),
    ) {
        let (mut browser, w) = build(0, &vec![Segment::Loose; len]);
        let original = browser.tab_ids(w);
        let i = pick.index(len - 1) + 1;
        browser.select(w, &[original[i]]).unwrap();
        let mut app = App::simulated(browser);

        app.run_command(Command::MoveTabsLeft, w).unwrap();
        prop_assert_eq!(app.host.get_tab(original[i]).unwrap().index, i - 1);
        app.run_command(Command::MoveTabsRight, w).unwrap();
        prop_assert_eq!(app.host.tab_ids(w), original);
    }
}

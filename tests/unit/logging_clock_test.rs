use log::LevelFilter;
use rstest::rstest;

use tabkeys::clock::{Clock, ManualClock, SystemClock};
use tabkeys::logging::level_from_str;

#[rstest]
#[case("off", LevelFilter::Off)]
#[case("ERROR", LevelFilter::Error)]
#[case(" info ", LevelFilter::Info)]
#[case("debug", LevelFilter::Debug)]
#[case("5", LevelFilter::Trace)]
#[case("warn", LevelFilter::Warn)]
#[case("loud", LevelFilter::Warn)]
#[case("", LevelFilter::Warn)]
fn test_level_from_str(#[case] value: &str, #[case] expected: LevelFilter) {
    assert_eq!(level_from_str(value), expected);
}

#[test]
fn test_init_twice_is_harmless() {
    tabkeys::logging::init();
    tabkeys::logging::init();
    log::info!("logger installed");
}

#[test]
fn test_manual_clock_clones_share_time() {
    let clock = ManualClock::new(1_000);
    let shared = clock.clone();
    clock.advance(250);
    assert_eq!(shared.now_ms(), 1_250);
    shared.set(5);
    assert_eq!(clock.now_ms(), 5);
}

#[test]
fn test_system_clock_is_past_2020() {
    assert!(SystemClock.now_ms() > 1_577_836_800_000);
}

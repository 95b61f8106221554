use serde_json::json;

use tabkeys::database::kv_store::{LAST_ACTIVE_TAB_HISTORY, LEGACY_LAST_ACTIVE_TABS};
use tabkeys::database::{Database, MemoryStore, StateStore};
use tabkeys::host::{SimulatedBrowser, TabHost};
use tabkeys::managers::activation_history::ActivationHistory;
use tabkeys::types::tab::TabUpdate;

#[test]
fn test_record_moves_tab_to_front_without_duplicates() {
    let mut history = ActivationHistory::new(8);
    history.record(1, 10, 100);
    history.record(2, 10, 200);
    history.record(1, 10, 300);
    assert_eq!(history.ids(), vec![1, 2]);
    assert_eq!(history.entries()[0].last_active_at, 300);
}

#[test]
fn test_record_drops_oldest_past_capacity() {
    let mut history = ActivationHistory::new(3);
    for id in 1..=5 {
        history.record(id, 1, id * 10);
    }
    assert_eq!(history.ids(), vec![5, 4, 3]);
}

#[test]
fn test_capacity_is_at_least_one() {
    let mut history = ActivationHistory::new(0);
    history.record(1, 1, 0);
    history.record(2, 1, 0);
    assert_eq!(history.capacity(), 1);
    assert_eq!(history.ids(), vec![2]);
}

#[test]
fn test_switch_target_skips_current_head() {
    let mut history = ActivationHistory::new(8);
    history.record(1, 1, 0);
    history.record(2, 1, 0);
    assert_eq!(history.switch_target(Some(2)).map(|r| r.tab_id), Some(1));
    assert_eq!(history.switch_target(Some(7)).map(|r| r.tab_id), Some(2));
    assert_eq!(history.switch_target(None).map(|r| r.tab_id), Some(2));
}

#[test]
fn test_switch_target_needs_another_tab() {
    let mut history = ActivationHistory::new(8);
    assert!(history.switch_target(Some(1)).is_none());
    history.record(1, 1, 0);
    assert!(history.switch_target(Some(1)).is_none());
}

#[test]
fn test_from_value_drops_malformed_entries() {
    let value = json!([
        {"tabId": 4, "windowId": 1, "lastActiveAt": 50},
        {"tabId": "x", "windowId": 1},
        {"windowId": 1},
        7,
        {"tabId": 4, "windowId": 2, "lastActiveAt": 10},
        {"tabId": 9, "windowId": 3}
    ]);
    let history = ActivationHistory::from_value(&value, 8);
    assert_eq!(history.ids(), vec![4, 9]);
    assert_eq!(history.entries()[0].window_id, 1);
    assert_eq!(history.entries()[1].last_active_at, 0);
}

#[test]
fn test_from_value_non_array_is_empty() {
    assert!(ActivationHistory::from_value(&json!({"tabId": 1}), 8).is_empty());
    assert!(ActivationHistory::from_value(&serde_json::Value::Null, 8).is_empty());
}

#[test]
fn test_to_value_uses_camel_case() {
    let mut history = ActivationHistory::new(8);
    history.record(3, 2, 1234);
    assert_eq!(history.to_value(), json!([{"tabId": 3, "windowId": 2, "lastActiveAt": 1234}]));
}

#[test]
fn test_remove_and_retain_existing() {
    let mut browser = SimulatedBrowser::new();
    let w = browser.open_window();
    let a = browser.add_tab(w, "https://a.test").unwrap();
    let b = browser.add_tab(w, "https://b.test").unwrap();

    let mut history = ActivationHistory::new(8);
    history.record(a, w, 1);
    history.record(b, w, 2);
    history.record(99, w, 3);

    assert!(history.retain_existing(&browser));
    assert_eq!(history.ids(), vec![b, a]);
    assert!(!history.retain_existing(&browser));

    assert!(history.remove_tab(a));
    assert!(!history.remove_tab(a));
    assert_eq!(history.ids(), vec![b]);
}

#[test]
fn test_save_then_load_from_store() {
    let store = MemoryStore::new();
    let browser = SimulatedBrowser::new();
    let mut history = ActivationHistory::new(8);
    history.record(1, 1, 10);
    history.record(2, 1, 20);
    history.save(&store).unwrap();

    let loaded = ActivationHistory::load(&store, &browser, 8, 0).unwrap();
    assert_eq!(loaded, history);
}

#[test]
fn test_load_migrates_legacy_pair() {
    let mut browser = SimulatedBrowser::new();
    let w = browser.open_window();
    let a = browser.add_tab(w, "https://a.test").unwrap();
    let b = browser.add_tab(w, "https://b.test").unwrap();
    browser.update_tab(b, &TabUpdate::activate()).unwrap();

    let store = MemoryStore::new();
    store.set(LEGACY_LAST_ACTIVE_TABS, &json!([b, 404, a])).unwrap();

    let history = ActivationHistory::load(&store, &browser, 8, 5_000).unwrap();
    assert_eq!(history.ids(), vec![b, a]);
    assert!(history.entries().iter().all(|e| e.window_id == w && e.last_active_at == 5_000));
    assert!(store.get(LEGACY_LAST_ACTIVE_TABS).unwrap().is_none());
    assert_eq!(store.get(LAST_ACTIVE_TAB_HISTORY).unwrap(), Some(history.to_value()));
}

#[test]
fn test_new_key_wins_over_legacy() {
    let browser = SimulatedBrowser::new();
    let store = MemoryStore::new();
    store.set(LEGACY_LAST_ACTIVE_TABS, &json!([1, 2])).unwrap();
    store
        .set(LAST_ACTIVE_TAB_HISTORY, &json!([{"tabId": 8, "windowId": 1, "lastActiveAt": 1}]))
        .unwrap();

    let history = ActivationHistory::load(&store, &browser, 8, 0).unwrap();
    assert_eq!(history.ids(), vec![8]);
    assert!(store.get(LEGACY_LAST_ACTIVE_TABS).unwrap().is_some());
}

#[test]
fn test_load_empty_store() {
    let browser = SimulatedBrowser::new();
    let history = ActivationHistory::load(&MemoryStore::new(), &browser, 4, 0).unwrap();
    assert!(history.is_empty());
    assert_eq!(history.capacity(), 4);
}

#[test]
fn test_unreadable_row_loads_as_empty() {
    let browser = SimulatedBrowser::new();
    let db = Database::open_in_memory().unwrap();
    db.connection()
        .execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, '{corrupt', 0)",
            [LAST_ACTIVE_TAB_HISTORY],
        )
        .unwrap();

    let mut history = ActivationHistory::load(&db, &browser, 8, 0).unwrap();
    assert!(history.is_empty());

    history.record(3, 1, 10);
    history.save(&db).unwrap();
    assert_eq!(ActivationHistory::load(&db, &browser, 8, 0).unwrap().ids(), vec![3]);
}

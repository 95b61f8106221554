//! Unit tests for the RPC handler: the JSON-RPC methods dispatched by `handle_method`.
//!
//! These run through the same code path as the `tabkeys-rpc` binary, with the
//! settings file in a temp directory.

use serde_json::{json, Value};
use tempfile::TempDir;

use tabkeys::app::App;
use tabkeys::host::SimulatedBrowser;
use tabkeys::rpc_handler::{handle_method, RpcState};
use tabkeys::runtime::Runtime;
use tabkeys::services::settings_engine::SettingsEngine;

fn setup() -> (RpcState, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("settings.json").to_string_lossy().to_string();
    let runtime = Runtime::new(App::simulated(SimulatedBrowser::new()));
    (RpcState::new(runtime, SettingsEngine::new(Some(path))), tmp)
}

async fn call(state: &RpcState, method: &str, params: Value) -> Value {
    handle_method(state, method, &params)
        .await
        .unwrap_or_else(|e| panic!("{} failed: {}", method, e))
}

/// Opens a window with the given urls; returns (window id, tab ids).
async fn window(state: &RpcState, urls: &[&str]) -> (i64, Vec<i64>) {
    let res = call(state, "window.create", json!({"urls": urls})).await;
    let tab_ids = res["tab_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    (res["id"].as_i64().unwrap(), tab_ids)
}

fn ids_of(tabs: &Value) -> Vec<i64> {
    tabs.as_array().unwrap().iter().map(|t| t["id"].as_i64().unwrap()).collect()
}

// ─── Basics ───

#[tokio::test]
async fn test_ping() {
    let (state, _tmp) = setup();
    let res = call(&state, "ping", json!({})).await;
    assert_eq!(res["pong"], json!(true));
    assert_eq!(res["version"], json!(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (state, _tmp) = setup();
    let err = handle_method(&state, "nonexistent.method", &json!({})).await.unwrap_err();
    assert!(err.contains("unknown method"));
}

#[tokio::test]
async fn test_commands_list() {
    let (state, _tmp) = setup();
    let res = call(&state, "commands.list", json!({})).await;
    let names: Vec<&str> = res.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names.len(), 19);
    assert!(names.contains(&"move-tabs-to-front"));
    assert!(names.contains(&"pause-or-show-audio-tabs"));
}

// ─── Tabs and commands ───

#[tokio::test]
async fn test_command_run_moves_highlighted_tab() {
    let (state, _tmp) = setup();
    let (w, tabs) = window(&state, &["https://a.test", "https://b.test"]).await;
    call(&state, "tab.highlight", json!({"window_id": w, "tab_ids": [tabs[1]]})).await;

    let report = call(&state, "command.run", json!({"command": "move-tabs-left", "window_id": w})).await;
    assert_eq!(report["command"], json!("move-tabs-left"));
    assert_eq!(report["actions"][0]["action"], json!("move"));

    let listed = call(&state, "tab.list", json!({"window_id": w})).await;
    assert_eq!(ids_of(&listed), vec![tabs[1], tabs[0]]);
}

#[tokio::test]
async fn test_command_run_defaults_to_focused_window() {
    let (state, _tmp) = setup();
    let (w, tabs) = window(&state, &["https://a.test"]).await;
    call(&state, "command.run", json!({"command": "pin-tab"})).await;
    let listed = call(&state, "tab.list", json!({"window_id": w})).await;
    assert_eq!(listed[0]["id"], json!(tabs[0]));
    assert_eq!(listed[0]["pinned"], json!(true));
}

#[tokio::test]
async fn test_command_run_rejects_unknown_command() {
    let (state, _tmp) = setup();
    window(&state, &["https://a.test"]).await;
    let err = handle_method(&state, "command.run", &json!({"command": "fly"})).await.unwrap_err();
    assert!(err.contains("Unknown command: fly"));
    let err = handle_method(&state, "command.run", &json!({})).await.unwrap_err();
    assert!(err.contains("missing command"));
}

#[tokio::test]
async fn test_tab_create_and_group() {
    let (state, _tmp) = setup();
    let (w, _) = window(&state, &[]).await;
    let pinned = call(&state, "tab.create", json!({"window_id": w, "url": "https://p.test", "pinned": true})).await;
    assert_eq!(pinned["pinned"], json!(true));
    let plain = call(&state, "tab.create", json!({"window_id": w})).await;
    assert_eq!(plain["url"], json!("chrome://newtab/"));

    let res = call(&state, "tab.group", json!({"tab_ids": [plain["id"]]})).await;
    let group_id = res["group_id"].as_i64().unwrap();
    call(&state, "group.collapse", json!({"group_id": group_id, "collapsed": true})).await;
    let listed = call(&state, "tab.list", json!({"window_id": w})).await;
    assert_eq!(listed[1]["group_id"], json!(group_id));
}

#[tokio::test]
async fn test_missing_params_are_reported() {
    let (state, _tmp) = setup();
    let err = handle_method(&state, "tab.create", &json!({})).await.unwrap_err();
    assert_eq!(err, "missing window_id");
    let err = handle_method(&state, "tab.highlight", &json!({"window_id": 1, "tab_ids": ["x"]}))
        .await
        .unwrap_err();
    assert_eq!(err, "tab_ids must hold integers");
    let err = handle_method(&state, "window.create", &json!({"kind": "panel"})).await.unwrap_err();
    assert_eq!(err, "invalid kind: panel");
}

// ─── Clipboard ───

#[tokio::test]
async fn test_clipboard_round_trip_and_copy_url() {
    let (state, _tmp) = setup();
    let (w, _) = window(&state, &["https://a.test/x"]).await;
    call(&state, "clipboard.set", json!({"text": "hello"})).await;
    assert_eq!(call(&state, "clipboard.get", json!({})).await["text"], json!("hello"));

    call(&state, "command.run", json!({"command": "copy-url", "window_id": w})).await;
    assert_eq!(call(&state, "clipboard.get", json!({})).await["text"], json!("https://a.test/x"));
}

// ─── History & events ───

#[tokio::test(start_paused = true)]
async fn test_tab_activate_feeds_history() {
    let (state, _tmp) = setup();
    let (w, tabs) = window(&state, &["https://a.test", "https://b.test"]).await;
    call(&state, "tab.activate", json!({"tab_id": tabs[1]})).await;
    tokio::time::sleep(std::time::Duration::from_millis(1_100)).await;

    let history = call(&state, "history.get", json!({})).await;
    assert_eq!(history[0]["tabId"], json!(tabs[1]));
    assert_eq!(history[0]["windowId"], json!(w));

    call(&state, "event.tab_removed", json!({"tab_id": tabs[1], "window_id": w})).await;
    assert_eq!(call(&state, "history.get", json!({})).await, json!([]));
    let listed = call(&state, "tab.list", json!({"window_id": w})).await;
    assert_eq!(ids_of(&listed), vec![tabs[0]]);
}

#[tokio::test(start_paused = true)]
async fn test_focus_loss_event_cancels_activation() {
    let (state, _tmp) = setup();
    let (w, tabs) = window(&state, &["https://a.test"]).await;
    call(&state, "event.tab_activated", json!({"tab_id": tabs[0], "window_id": w})).await;
    call(&state, "event.window_focused", json!({})).await;
    tokio::time::sleep(std::time::Duration::from_millis(2_000)).await;
    assert_eq!(call(&state, "history.get", json!({})).await, json!([]));
}

// ─── Settings ───

#[tokio::test]
async fn test_settings_get_and_set() {
    let (state, tmp) = setup();
    let settings = call(&state, "settings.get", json!({})).await;
    assert_eq!(settings["toggle_window_ms"], json!(2000));

    let updated = call(&state, "settings.set", json!({"key": "toggle_window_ms", "value": 800})).await;
    assert_eq!(updated["toggle_window_ms"], json!(800));
    assert!(tmp.path().join("settings.json").exists());

    let app = state.runtime.app();
    assert_eq!(app.lock().await.settings.toggle_window_ms, 800);
}

#[tokio::test]
async fn test_settings_set_rejects_bad_values() {
    let (state, _tmp) = setup();
    let err = handle_method(&state, "settings.set", &json!({"key": "history_capacity", "value": 0}))
        .await
        .unwrap_err();
    assert!(err.contains("history_capacity must be at least 1"));
    let err = handle_method(&state, "settings.set", &json!({"key": "bogus", "value": 1}))
        .await
        .unwrap_err();
    assert!(err.contains("not found in settings"));
}

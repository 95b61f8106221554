//! RPC method handler for the tabkeys JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function drives a simulated browser through the
//! [`Runtime`], so clients can build tab strips, fire commands and events,
//! and inspect the result.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::{json, Value};

use crate::host::{SimulatedBrowser, TabHost};
use crate::runtime::Runtime;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::command::Command;
use crate::types::errors::CommandError;
use crate::types::event::BrowserEvent;
use crate::types::tab::{TabQuery, TabUpdate, WindowKind};

/// Everything an RPC call can reach.
pub struct RpcState {
    pub runtime: Runtime<SimulatedBrowser>,
    pub settings: Mutex<SettingsEngine>,
}

impl RpcState {
    pub fn new(runtime: Runtime<SimulatedBrowser>, settings: SettingsEngine) -> Self {
        Self { runtime, settings: Mutex::new(settings) }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn req_i64(params: &Value, key: &str) -> Result<i64, String> {
    params
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| format!("missing {}", key))
}

fn opt_i64(params: &Value, key: &str) -> Option<i64> {
    params.get(key).and_then(Value::as_i64)
}

fn req_bool(params: &Value, key: &str) -> Result<bool, String> {
    params
        .get(key)
        .and_then(Value::as_bool)
        .ok_or_else(|| format!("missing {}", key))
}

fn id_list(params: &Value, key: &str) -> Result<Vec<i64>, String> {
    let items = params
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| format!("missing {}", key))?;
    items
        .iter()
        .map(|v| v.as_i64().ok_or_else(|| format!("{} must hold integers", key)))
        .collect()
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(state: &RpcState, method: &str, params: &Value) -> Result<Value, String> {
    let runtime = &state.runtime;
    match method {
        "ping" => Ok(json!({"pong": true, "version": env!("CARGO_PKG_VERSION")})),

        // ─── Commands ───
        "commands.list" => {
            let arr: Vec<Value> = Command::ALL
                .iter()
                .map(|c| json!({"name": c.as_str(), "description": c.description()}))
                .collect();
            Ok(json!(arr))
        }
        "command.run" => {
            let name = params
                .get("command")
                .and_then(Value::as_str)
                .ok_or("missing command")?;
            let command: Command = name.parse().map_err(|e: CommandError| e.to_string())?;
            let window_id = match opt_i64(params, "window_id") {
                Some(id) => id,
                None => {
                    let app = runtime.app();
                    let app = app.lock().await;
                    app.host.current_window().map_err(|e| e.to_string())?.id
                }
            };
            let report = runtime
                .run_command(command, window_id)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&report)
        }

        // ─── Windows ───
        "window.create" => {
            let incognito = params.get("incognito").and_then(Value::as_bool).unwrap_or(false);
            let kind = match params.get("kind").and_then(Value::as_str) {
                None | Some("normal") => WindowKind::Normal,
                Some("popup") => WindowKind::Popup,
                Some(other) => return Err(format!("invalid kind: {}", other)),
            };
            let urls: Vec<String> = params
                .get("urls")
                .and_then(Value::as_array)
                .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                .unwrap_or_default();
            let app = runtime.app();
            let mut app = app.lock().await;
            let window_id = app.host.open_window_with(kind, incognito);
            let mut tab_ids = Vec::new();
            for url in &urls {
                tab_ids.push(app.host.add_tab(window_id, url).map_err(|e| e.to_string())?);
            }
            Ok(json!({"id": window_id, "tab_ids": tab_ids}))
        }
        "window.list" => {
            let app = runtime.app();
            let app = app.lock().await;
            to_json(&app.host.get_all_windows())
        }

        // ─── Tabs ───
        "tab.create" => {
            let window_id = req_i64(params, "window_id")?;
            let url = params.get("url").and_then(Value::as_str).unwrap_or("chrome://newtab/");
            let pinned = params.get("pinned").and_then(Value::as_bool).unwrap_or(false);
            let app = runtime.app();
            let mut app = app.lock().await;
            let tab_id = if pinned {
                app.host.add_pinned_tab(window_id, url)
            } else {
                app.host.add_tab(window_id, url)
            }
            .map_err(|e| e.to_string())?;
            to_json(&app.host.get_tab(tab_id).map_err(|e| e.to_string())?)
        }
        "tab.list" => {
            let query = match opt_i64(params, "window_id") {
                Some(w) => TabQuery::window(w),
                None => TabQuery::default(),
            };
            let app = runtime.app();
            let app = app.lock().await;
            to_json(&app.host.query_tabs(&query))
        }
        // Activating fires the same notification a browser would.
        "tab.activate" => {
            let tab_id = req_i64(params, "tab_id")?;
            let tab = {
                let app = runtime.app();
                let mut app = app.lock().await;
                app.host
                    .update_tab(tab_id, &TabUpdate::activate())
                    .map_err(|e| e.to_string())?
            };
            runtime
                .handle_event(BrowserEvent::TabActivated { tab_id, window_id: tab.window_id })
                .await
                .map_err(|e| e.to_string())?;
            to_json(&tab)
        }
        "tab.highlight" => {
            let window_id = req_i64(params, "window_id")?;
            let tab_ids = id_list(params, "tab_ids")?;
            let app = runtime.app();
            let mut app = app.lock().await;
            app.host.select(window_id, &tab_ids).map_err(|e| e.to_string())?;
            to_json(&app.host.query_tabs(&TabQuery::highlighted_in(window_id)))
        }
        "tab.group" => {
            let tab_ids = id_list(params, "tab_ids")?;
            let group_id = opt_i64(params, "group_id");
            let app = runtime.app();
            let mut app = app.lock().await;
            let group_id = app.host.group_tabs(&tab_ids, group_id).map_err(|e| e.to_string())?;
            Ok(json!({"group_id": group_id}))
        }
        "tab.set_audible" => {
            let tab_id = req_i64(params, "tab_id")?;
            let audible = req_bool(params, "audible")?;
            let app = runtime.app();
            let mut app = app.lock().await;
            app.host.set_audible(tab_id, audible).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "group.collapse" => {
            let group_id = req_i64(params, "group_id")?;
            let collapsed = req_bool(params, "collapsed")?;
            let app = runtime.app();
            let mut app = app.lock().await;
            app.host.update_group(group_id, collapsed).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Clipboard ───
        "clipboard.set" => {
            let text = params.get("text").and_then(Value::as_str).ok_or("missing text")?;
            let app = runtime.app();
            let app = app.lock().await;
            app.host.clipboard().set_text(text);
            Ok(json!({"ok": true}))
        }
        "clipboard.get" => {
            let app = runtime.app();
            let app = app.lock().await;
            Ok(json!({"text": app.host.clipboard().text()}))
        }

        // ─── History & events ───
        "history.get" => {
            let app = runtime.app();
            let app = app.lock().await;
            let history = app.history().map_err(|e| e.to_string())?;
            to_json(&history.entries())
        }
        "event.tab_activated" => {
            let event = BrowserEvent::TabActivated {
                tab_id: req_i64(params, "tab_id")?,
                window_id: req_i64(params, "window_id")?,
            };
            runtime.handle_event(event).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "event.window_focused" => {
            let window_id = opt_i64(params, "window_id");
            if let Some(id) = window_id {
                let app = runtime.app();
                let mut app = app.lock().await;
                app.host.focus_window(id).map_err(|e| e.to_string())?;
            }
            runtime
                .handle_event(BrowserEvent::WindowFocusChanged { window_id })
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        // Closes the tab in the simulated host, then reports the closure.
        "event.tab_removed" => {
            let tab_id = req_i64(params, "tab_id")?;
            let window_id = req_i64(params, "window_id")?;
            {
                let app = runtime.app();
                let mut app = app.lock().await;
                if app.host.get_tab(tab_id).is_ok() {
                    app.host.remove_tabs(&[tab_id]).map_err(|e| e.to_string())?;
                }
            }
            runtime
                .handle_event(BrowserEvent::TabRemoved { tab_id, window_id })
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let engine = state.settings.lock().map_err(|e| e.to_string())?;
            to_json(engine.get_settings())
        }
        "settings.set" => {
            let key = params.get("key").and_then(Value::as_str).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let settings = {
                let mut engine = state.settings.lock().map_err(|e| e.to_string())?;
                engine.set_value(key, value).map_err(|e| e.to_string())?;
                engine.get_settings().clone()
            };
            let app = runtime.app();
            app.lock().await.set_settings(settings.clone());
            to_json(&settings)
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

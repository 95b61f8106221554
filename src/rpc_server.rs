//! tabkeys RPC Server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"command.run", "params":{"command":"move-tabs-left"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};

use tabkeys::app::App;
use tabkeys::clock::SystemClock;
use tabkeys::database::{Database, MemoryStore, StateStore};
use tabkeys::host::SimulatedBrowser;
use tabkeys::platform;
use tabkeys::rpc_handler::{handle_method, RpcState};
use tabkeys::runtime::Runtime;
use tabkeys::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

use serde_json::{json, Value};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        let elapsed = self.window_start.elapsed();
        if elapsed.as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn emit(value: &Value) {
    let mut out = io::stdout().lock();
    if writeln!(out, "{}", value).and_then(|_| out.flush()).is_err() {
        log::error!("stdout closed");
    }
}

/// State database under the data dir; falls back to memory if it cannot be opened.
fn open_store() -> Box<dyn StateStore + Send> {
    let dir = platform::data_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        log::warn!("cannot create {}: {}", dir.display(), e);
    }
    let path = dir.join("tabkeys.db");
    match Database::open(&path) {
        Ok(db) => Box::new(db),
        Err(e) => {
            log::warn!("cannot open {}: {}, state will not persist", path.display(), e);
            Box::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() {
    tabkeys::logging::init();

    let mut settings_engine = SettingsEngine::new(None);
    let settings = match settings_engine.load() {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("using default settings: {}", e);
            settings_engine.get_settings().clone()
        }
    };

    let mut browser = SimulatedBrowser::new();
    let window_id = browser.open_window();
    if let Err(e) = browser.add_tab(window_id, "chrome://newtab/") {
        log::error!("could not seed the first window: {}", e);
    }
    let clipboard = browser.clipboard();
    let app = App::new(browser, Box::new(clipboard), open_store(), settings, Arc::new(SystemClock));
    let state = RpcState::new(Runtime::new(app), settings_engine);

    // Signal ready
    emit(&json!({"event":"ready","version":env!("CARGO_PKG_VERSION")}));

    let mut rate_limiter = RateLimiter::new(200);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id":null,"error":format!("parse error: {}",e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            emit(&json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&state, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        emit(&response);
    }
}

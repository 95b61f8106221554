use serde::{Deserialize, Serialize};

/// Tunables for the command engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Window within which a repeated front/back command toggles instead of moving.
    pub toggle_window_ms: i64,
    /// How long a tab must stay active before it enters the history.
    pub activation_debounce_ms: u64,
    pub history_capacity: usize,
    /// Step moves jump over collapsed groups instead of landing inside them.
    pub skip_collapsed_groups: bool,
    pub search_url: String,
    pub search_param: String,
    pub home_url: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            toggle_window_ms: 2000,
            activation_debounce_ms: 1000,
            history_capacity: 8,
            skip_collapsed_groups: true,
            search_url: "https://www.google.com/search".to_string(),
            search_param: "q".to_string(),
            home_url: "chrome://newtab/".to_string(),
        }
    }
}

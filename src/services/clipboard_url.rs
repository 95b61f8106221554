//! Turns clipboard text into something a tab can open.

use url::Url;

use crate::types::settings::EngineSettings;

/// What the clipboard text resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardTarget {
    /// The text parsed as an absolute URL.
    Url(String),
    /// The text was not a URL and became a search.
    Search(String),
}

impl ClipboardTarget {
    pub fn url(&self) -> &str {
        match self {
            ClipboardTarget::Url(u) | ClipboardTarget::Search(u) => u,
        }
    }
}

/// Resolves clipboard text. Empty or whitespace-only text resolves to `None`,
/// as does a search fallback when the configured search URL is unusable.
pub fn resolve_clipboard_text(text: &str, settings: &EngineSettings) -> Option<ClipboardTarget> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if Url::parse(trimmed).is_ok() {
        return Some(ClipboardTarget::Url(trimmed.to_string()));
    }
    match Url::parse(&settings.search_url) {
        Ok(mut search) => {
            search.query_pairs_mut().append_pair(&settings.search_param, trimmed);
            Some(ClipboardTarget::Search(search.to_string()))
        }
        Err(e) => {
            log::warn!("search url {:?} is invalid: {}", settings.search_url, e);
            None
        }
    }
}

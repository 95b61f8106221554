use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::types::errors::HostError;

/// Message sent to the isolated clipboard context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ClipboardRequest {
    ReadClipboard,
    WriteClipboard { text: String },
}

/// Reply from the isolated clipboard context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClipboardResponse {
    pub fn ok(text: Option<String>) -> Self {
        Self { success: true, text, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, text: None, error: Some(error.into()) }
    }
}

/// One request/response round trip to the clipboard context.
pub trait ClipboardBridge {
    fn request(&mut self, request: &ClipboardRequest) -> ClipboardResponse;

    fn read_text(&mut self) -> Result<String, HostError> {
        let response = self.request(&ClipboardRequest::ReadClipboard);
        if response.success {
            Ok(response.text.unwrap_or_default())
        } else {
            Err(HostError::Unavailable(
                response.error.unwrap_or_else(|| "clipboard read failed".to_string()),
            ))
        }
    }

    fn write_text(&mut self, text: &str) -> Result<(), HostError> {
        let response = self.request(&ClipboardRequest::WriteClipboard { text: text.to_string() });
        if response.success {
            Ok(())
        } else {
            Err(HostError::Unavailable(
                response.error.unwrap_or_else(|| "clipboard write failed".to_string()),
            ))
        }
    }
}

/// Clipboard shared between the bridge and page scripts of a simulated host.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Arc<Mutex<Option<String>>>,
    denied: Arc<Mutex<bool>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&self, text: &str) {
        if let Ok(mut slot) = self.text.lock() {
            *slot = Some(text.to_string());
        }
    }

    pub fn text(&self) -> Option<String> {
        self.text.lock().ok().and_then(|slot| slot.clone())
    }

    /// Makes every request fail, as when the document lacks clipboard permission.
    pub fn set_denied(&self, denied: bool) {
        if let Ok(mut flag) = self.denied.lock() {
            *flag = denied;
        }
    }

    fn is_denied(&self) -> bool {
        self.denied.lock().map(|flag| *flag).unwrap_or(false)
    }
}

impl ClipboardBridge for MemoryClipboard {
    fn request(&mut self, request: &ClipboardRequest) -> ClipboardResponse {
        if self.is_denied() {
            return ClipboardResponse::failed("Document is not focused.");
        }
        match request {
            ClipboardRequest::ReadClipboard => ClipboardResponse::ok(Some(self.text().unwrap_or_default())),
            ClipboardRequest::WriteClipboard { text } => {
                self.set_text(text);
                ClipboardResponse::ok(None)
            }
        }
    }
}

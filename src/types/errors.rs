use std::fmt;

// === HostError ===

/// Failures reported by the browser host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// The tab, group or window vanished before the call landed.
    NotFound(String),
    /// The host refused the call, e.g. script injection into a protected page.
    PermissionDenied(String),
    /// The call was malformed for the current tab strip.
    InvalidArgument(String),
    /// The host (or the isolated clipboard context) did not answer.
    Unavailable(String),
}

impl HostError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, HostError::NotFound(_))
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::NotFound(what) => write!(f, "Not found: {}", what),
            HostError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            HostError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            HostError::Unavailable(msg) => write!(f, "Host unavailable: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

// === StoreError ===

/// Errors from the persisted key-value store.
#[derive(Debug)]
pub enum StoreError {
    /// Database operation failed.
    DatabaseError(String),
    /// A stored value could not be encoded or decoded.
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DatabaseError(msg) => write!(f, "Store database error: {}", msg),
            StoreError::SerializationError(msg) => {
                write!(f, "Store serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::SerializationError(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

// === CommandError ===

/// Errors surfaced by a command handler.
#[derive(Debug)]
pub enum CommandError {
    /// The host sent a command name we do not handle.
    UnknownCommand(String),
    /// The window has no active tab to act on.
    NoActiveTab(i64),
    Host(HostError),
    Store(StoreError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(name) => write!(f, "Unknown command: {}", name),
            CommandError::NoActiveTab(window) => {
                write!(f, "No active tab in window {}", window)
            }
            CommandError::Host(e) => write!(f, "Command failed: {}", e),
            CommandError::Store(e) => write!(f, "Command failed: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Host(e) => Some(e),
            CommandError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HostError> for CommandError {
    fn from(e: HostError) -> Self {
        CommandError::Host(e)
    }
}

impl From<StoreError> for CommandError {
    fn from(e: StoreError) -> Self {
        CommandError::Store(e)
    }
}

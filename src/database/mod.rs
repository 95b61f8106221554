//! Persisted engine state.
//!
//! Provides SQLite connection management, schema migrations and the
//! key-value store that holds activation history and toggle memory.
//!
//! # Usage
//!
//! ```no_run
//! use tabkeys::database::{Database, StateStore};
//!
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! db.set("lastAction", &serde_json::json!(null)).expect("write failed");
//! ```

pub mod connection;
pub mod kv_store;
pub mod migrations;

pub use connection::Database;
pub use kv_store::{MemoryStore, StateStore};

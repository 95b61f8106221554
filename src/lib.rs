//! tabkeys: keyboard-driven tab management engine.
//!
//! Plans and applies tab moves, pins, groups and focus changes against a
//! browser host, with repeat-to-toggle snapping and switch-to-last-tab history.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod clock;
pub mod database;
pub mod host;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod runtime;
pub mod services;
pub mod types;

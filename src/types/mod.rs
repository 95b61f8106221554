// Shared type definitions for the tab command engine.

pub mod action;
pub mod command;
pub mod errors;
pub mod event;
pub mod memory;
pub mod settings;
pub mod tab;

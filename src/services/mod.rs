// Planning services: pure functions over a layout snapshot, plus settings.

pub mod blank_tabs;
pub mod clipboard_url;
pub mod group_mover;
pub mod layout_snapshot;
pub mod reconciliation_engine;
pub mod settings_engine;
pub mod snap_planner;

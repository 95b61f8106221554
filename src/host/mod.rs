//! The browser host the engine drives.
//!
//! Everything the engine knows about tabs, groups and windows comes through
//! [`TabHost`]; clipboard access goes through [`ClipboardBridge`], which the
//! real extension reaches via a message to an isolated document.

pub mod clipboard;
pub mod simulated;

use crate::types::errors::HostError;
use crate::types::tab::{
    CreateTab, CreateWindow, GroupId, PageScript, ScriptOutcome, Tab, TabGroup, TabId, TabIndex,
    TabQuery, TabUpdate, Window, WindowId,
};

pub use clipboard::{ClipboardBridge, ClipboardRequest, ClipboardResponse, MemoryClipboard};
pub use simulated::SimulatedBrowser;

/// Query-and-mutate surface of the browser's tab, group and window API.
pub trait TabHost {
    fn query_tabs(&self, query: &TabQuery) -> Vec<Tab>;
    fn get_tab(&self, tab_id: TabId) -> Result<Tab, HostError>;
    fn create_tab(&mut self, props: &CreateTab) -> Result<Tab, HostError>;
    fn update_tab(&mut self, tab_id: TabId, update: &TabUpdate) -> Result<Tab, HostError>;
    fn remove_tabs(&mut self, tab_ids: &[TabId]) -> Result<(), HostError>;
    fn move_tabs(&mut self, tab_ids: &[TabId], index: TabIndex) -> Result<(), HostError>;
    fn move_tabs_to_window(
        &mut self,
        tab_ids: &[TabId],
        window_id: WindowId,
        index: TabIndex,
    ) -> Result<(), HostError>;
    fn highlight_tabs(&mut self, window_id: WindowId, indices: &[usize]) -> Result<(), HostError>;
    /// Adds tabs to `group_id`, or to a fresh group when `None`. Returns the group id.
    fn group_tabs(&mut self, tab_ids: &[TabId], group_id: Option<GroupId>) -> Result<GroupId, HostError>;
    fn ungroup_tabs(&mut self, tab_ids: &[TabId]) -> Result<(), HostError>;
    fn query_groups(&self, window_id: WindowId) -> Vec<TabGroup>;
    fn get_group(&self, group_id: GroupId) -> Result<TabGroup, HostError>;
    fn move_group(&mut self, group_id: GroupId, index: TabIndex) -> Result<(), HostError>;
    fn update_group(&mut self, group_id: GroupId, collapsed: bool) -> Result<(), HostError>;
    fn get_all_windows(&self) -> Vec<Window>;
    fn current_window(&self) -> Result<Window, HostError>;
    fn focus_window(&mut self, window_id: WindowId) -> Result<(), HostError>;
    fn create_window(&mut self, props: &CreateWindow) -> Result<Window, HostError>;
    fn inject_script(&mut self, tab_id: TabId, script: PageScript) -> Result<ScriptOutcome, HostError>;
}

/// Lookup that turns a vanished tab into `None` instead of an error.
pub fn safe_get_tab<H: TabHost + ?Sized>(host: &H, tab_id: TabId) -> Option<Tab> {
    match host.get_tab(tab_id) {
        Ok(tab) => Some(tab),
        Err(e) => {
            if !e.is_not_found() {
                log::warn!("tab {} lookup failed: {}", tab_id, e);
            }
            None
        }
    }
}

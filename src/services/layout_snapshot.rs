//! Layout Snapshot.
//!
//! One read of a window's tabs and groups, used as the authoritative ordering
//! for a single planning pass. Nothing here talks back to the host.

use std::collections::HashMap;
use std::ops::Range;

use crate::host::TabHost;
use crate::types::tab::{GroupId, Tab, TabGroup, WindowId};

#[derive(Debug, Clone)]
pub struct Layout {
    window_id: WindowId,
    tabs: Vec<Tab>,
    groups: HashMap<GroupId, TabGroup>,
}

impl Layout {
    /// Reads the window's tabs (ordered by index) and groups from the host.
    pub fn capture<H: TabHost + ?Sized>(host: &H, window_id: WindowId) -> Self {
        let tabs = host.query_tabs(&crate::types::tab::TabQuery::window(window_id));
        let groups = host.query_groups(window_id);
        Self::from_parts(window_id, tabs, groups)
    }

    pub fn from_parts(window_id: WindowId, mut tabs: Vec<Tab>, groups: Vec<TabGroup>) -> Self {
        tabs.sort_by_key(|t| t.index);
        Self {
            window_id,
            tabs,
            groups: groups.into_iter().map(|g| (g.id, g)).collect(),
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Tab at a signed position; negative or past-the-end positions yield `None`.
    pub fn tab_at(&self, index: i64) -> Option<&Tab> {
        usize::try_from(index).ok().and_then(|i| self.tabs.get(i))
    }

    /// The highlighted tabs in strip order.
    pub fn highlighted(&self) -> Vec<Tab> {
        self.tabs.iter().filter(|t| t.highlighted).cloned().collect()
    }

    pub fn active(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.active)
    }

    pub fn pinned_count(&self) -> usize {
        self.tabs.iter().filter(|t| t.pinned).count()
    }

    pub fn group(&self, group_id: GroupId) -> Option<&TabGroup> {
        self.groups.get(&group_id)
    }

    /// Groups of the window ordered by their first member's index.
    pub fn groups_in_order(&self) -> Vec<&TabGroup> {
        let mut groups: Vec<(&TabGroup, usize)> = self
            .groups
            .values()
            .filter_map(|g| self.group_range(g.id).map(|r| (g, r.start)))
            .collect();
        groups.sort_by_key(|(_, start)| *start);
        groups.into_iter().map(|(g, _)| g).collect()
    }

    /// An unknown group reads as expanded.
    pub fn is_collapsed(&self, group_id: GroupId) -> bool {
        self.groups.get(&group_id).map_or(false, |g| g.collapsed)
    }

    /// Index range covered by a group's members.
    pub fn group_range(&self, group_id: GroupId) -> Option<Range<usize>> {
        let mut members = self.tabs.iter().filter(|t| t.group_id == Some(group_id));
        let first = members.next()?;
        let last = members.last().unwrap_or(first);
        Some(first.index..last.index + 1)
    }

    pub fn group_members(&self, group_id: GroupId) -> Vec<&Tab> {
        self.tabs.iter().filter(|t| t.group_id == Some(group_id)).collect()
    }
}

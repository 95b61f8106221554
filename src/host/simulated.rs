//! In-memory browser host.
//!
//! Mirrors the platform rules the engine depends on: pinned tabs form a
//! prefix of every window, group members stay contiguous, tabs landing inside
//! another group's run join it, and members cut off from their group leave it.

use std::collections::{HashMap, HashSet};

use super::clipboard::MemoryClipboard;
use super::TabHost;
use crate::types::errors::HostError;
use crate::types::tab::{
    CreateTab, CreateWindow, GroupId, PageScript, ScriptOutcome, Tab, TabGroup, TabId, TabIndex,
    TabQuery, TabUpdate, Window, WindowId, WindowKind,
};

const NEW_TAB_URL: &str = "chrome://newtab/";
const NEW_TAB_TITLE: &str = "New Tab";
const PROTECTED_PREFIXES: [&str; 4] = ["chrome://", "chrome-extension://", "edge://", "about:"];

#[derive(Debug, Clone)]
struct SimTab {
    id: TabId,
    window_id: WindowId,
    pinned: bool,
    group_id: Option<GroupId>,
    active: bool,
    highlighted: bool,
    url: String,
    title: String,
    audible: bool,
}

#[derive(Debug, Clone)]
struct SimWindow {
    id: WindowId,
    kind: WindowKind,
    incognito: bool,
    order: Vec<TabId>,
}

/// Browser host backed by plain vectors, used by tests, the demo and the RPC binary.
pub struct SimulatedBrowser {
    windows: Vec<SimWindow>,
    tabs: HashMap<TabId, SimTab>,
    groups: HashMap<GroupId, TabGroup>,
    focused: Option<WindowId>,
    next_tab_id: TabId,
    next_window_id: WindowId,
    next_group_id: GroupId,
    clipboard: MemoryClipboard,
}

impl SimulatedBrowser {
    pub fn new() -> Self {
        Self::with_clipboard(MemoryClipboard::new())
    }

    /// Page scripts that copy text write into `clipboard`.
    pub fn with_clipboard(clipboard: MemoryClipboard) -> Self {
        Self {
            windows: Vec::new(),
            tabs: HashMap::new(),
            groups: HashMap::new(),
            focused: None,
            next_tab_id: 1,
            next_window_id: 1,
            next_group_id: 1,
            clipboard,
        }
    }

    pub fn clipboard(&self) -> MemoryClipboard {
        self.clipboard.clone()
    }

    // ─── Fixture helpers ───

    /// Opens an empty normal window and focuses it.
    pub fn open_window(&mut self) -> WindowId {
        self.open_window_with(WindowKind::Normal, false)
    }

    pub fn open_window_with(&mut self, kind: WindowKind, incognito: bool) -> WindowId {
        let id = self.next_window_id;
        self.next_window_id += 1;
        self.windows.push(SimWindow { id, kind, incognito, order: Vec::new() });
        self.focused = Some(id);
        id
    }

    /// Appends a tab; it becomes active when the window has no active tab yet.
    pub fn add_tab(&mut self, window_id: WindowId, url: &str) -> Result<TabId, HostError> {
        let props = CreateTab {
            window_id: Some(window_id),
            url: Some(url.to_string()),
            ..CreateTab::default()
        };
        let had_active = self.active_in(window_id).is_some();
        let tab = self.create_tab(&props)?;
        if !had_active {
            self.activate(tab.id)?;
        }
        Ok(tab.id)
    }

    pub fn add_pinned_tab(&mut self, window_id: WindowId, url: &str) -> Result<TabId, HostError> {
        let id = self.add_tab(window_id, url)?;
        self.update_tab(id, &TabUpdate::pinned(true))?;
        Ok(id)
    }

    pub fn add_group(
        &mut self,
        tab_ids: &[TabId],
        collapsed: bool,
    ) -> Result<GroupId, HostError> {
        let group_id = self.group_tabs(tab_ids, None)?;
        self.update_group(group_id, collapsed)?;
        Ok(group_id)
    }

    /// Highlights `tab_ids`; the first one becomes active.
    pub fn select(&mut self, window_id: WindowId, tab_ids: &[TabId]) -> Result<(), HostError> {
        let order = &self.window(window_id)?.order;
        let indices: Vec<usize> = tab_ids
            .iter()
            .filter_map(|id| order.iter().position(|t| t == id))
            .collect();
        self.highlight_tabs(window_id, &indices)
    }

    pub fn set_audible(&mut self, tab_id: TabId, audible: bool) -> Result<(), HostError> {
        self.tab_mut(tab_id)?.audible = audible;
        Ok(())
    }

    pub fn set_title(&mut self, tab_id: TabId, title: &str) -> Result<(), HostError> {
        self.tab_mut(tab_id)?.title = title.to_string();
        Ok(())
    }

    /// Tab ids of a window in strip order.
    pub fn tab_ids(&self, window_id: WindowId) -> Vec<TabId> {
        self.window(window_id).map(|w| w.order.clone()).unwrap_or_default()
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.focused
    }

    /// Checks the pinned-prefix and group-contiguity invariants for a window.
    pub fn check_invariants(&self, window_id: WindowId) -> Result<(), String> {
        let order = &self.window(window_id).map_err(|e| e.to_string())?.order;
        let mut seen_unpinned = false;
        for id in order {
            let tab = self.tabs.get(id).ok_or(format!("dangling tab {}", id))?;
            if tab.pinned {
                if seen_unpinned {
                    return Err(format!("pinned tab {} after unpinned tabs", id));
                }
                if tab.group_id.is_some() {
                    return Err(format!("pinned tab {} is grouped", id));
                }
            } else {
                seen_unpinned = true;
            }
        }

        let mut closed: HashSet<GroupId> = HashSet::new();
        let mut current: Option<GroupId> = None;
        for id in order {
            let group = self.tabs.get(id).and_then(|t| t.group_id);
            if group != current {
                if let Some(prev) = current {
                    closed.insert(prev);
                }
                if let Some(g) = group {
                    if closed.contains(&g) {
                        return Err(format!("group {} is not contiguous", g));
                    }
                    if !self.groups.contains_key(&g) {
                        return Err(format!("tab {} refers to unknown group {}", id, g));
                    }
                }
                current = group;
            }
        }
        Ok(())
    }

    // ─── Internals ───

    fn title_for(url: &str) -> String {
        if url.is_empty() || url.starts_with("chrome://newtab") || url == "about:blank" {
            NEW_TAB_TITLE.to_string()
        } else {
            url.to_string()
        }
    }

    fn window(&self, window_id: WindowId) -> Result<&SimWindow, HostError> {
        self.windows
            .iter()
            .find(|w| w.id == window_id)
            .ok_or_else(|| HostError::NotFound(format!("window {}", window_id)))
    }

    fn window_mut(&mut self, window_id: WindowId) -> Result<&mut SimWindow, HostError> {
        self.windows
            .iter_mut()
            .find(|w| w.id == window_id)
            .ok_or_else(|| HostError::NotFound(format!("window {}", window_id)))
    }

    fn tab(&self, tab_id: TabId) -> Result<&SimTab, HostError> {
        self.tabs
            .get(&tab_id)
            .ok_or_else(|| HostError::NotFound(format!("tab {}", tab_id)))
    }

    fn tab_mut(&mut self, tab_id: TabId) -> Result<&mut SimTab, HostError> {
        self.tabs
            .get_mut(&tab_id)
            .ok_or_else(|| HostError::NotFound(format!("tab {}", tab_id)))
    }

    fn group_of(&self, tab_id: TabId) -> Option<GroupId> {
        self.tabs.get(&tab_id).and_then(|t| t.group_id)
    }

    fn position(&self, tab_id: TabId) -> Result<(WindowId, usize), HostError> {
        let window_id = self.tab(tab_id)?.window_id;
        let pos = self
            .window(window_id)?
            .order
            .iter()
            .position(|id| *id == tab_id)
            .ok_or_else(|| HostError::NotFound(format!("tab {}", tab_id)))?;
        Ok((window_id, pos))
    }

    fn pinned_count(&self, window_id: WindowId) -> usize {
        self.window(window_id)
            .map(|w| {
                w.order
                    .iter()
                    .filter(|id| self.tabs.get(id).map_or(false, |t| t.pinned))
                    .count()
            })
            .unwrap_or(0)
    }

    fn active_in(&self, window_id: WindowId) -> Option<TabId> {
        self.window(window_id)
            .ok()?
            .order
            .iter()
            .copied()
            .find(|id| self.tabs.get(id).map_or(false, |t| t.active))
    }

    fn snapshot(&self, tab_id: TabId) -> Result<Tab, HostError> {
        let (window_id, index) = self.position(tab_id)?;
        let t = self.tab(tab_id)?;
        Ok(Tab {
            id: t.id,
            index,
            window_id,
            pinned: t.pinned,
            group_id: t.group_id,
            active: t.active,
            highlighted: t.highlighted,
            url: t.url.clone(),
            title: t.title.clone(),
            audible: t.audible,
        })
    }

    /// Takes a tab out of its window's strip, returning where it was.
    fn detach(&mut self, tab_id: TabId) -> Result<(WindowId, usize), HostError> {
        let (window_id, pos) = self.position(tab_id)?;
        self.window_mut(window_id)?.order.remove(pos);
        Ok((window_id, pos))
    }

    /// Inserts a detached tab, clamping to its side of the pinned boundary.
    fn insert_at(&mut self, window_id: WindowId, tab_id: TabId, pos: usize) -> Result<usize, HostError> {
        let pinned = self.tab(tab_id)?.pinned;
        let prefix = self.pinned_count(window_id);
        let len = self.window(window_id)?.order.len();
        let pos = if pinned { pos.min(prefix) } else { pos.clamp(prefix, len) };
        self.window_mut(window_id)?.order.insert(pos, tab_id);
        self.tab_mut(tab_id)?.window_id = window_id;
        Ok(pos)
    }

    /// Moves `pos` past a group run it would otherwise split.
    fn snap_out_of_runs(&self, window_id: WindowId, mut pos: usize) -> usize {
        let Ok(window) = self.window(window_id) else {
            return pos;
        };
        let order = &window.order;
        if pos == 0 || pos >= order.len() {
            return pos;
        }
        let left = self.group_of(order[pos - 1]);
        if left.is_some() && left == self.group_of(order[pos]) {
            while pos < order.len() && self.group_of(order[pos]) == left {
                pos += 1;
            }
        }
        pos
    }

    fn activate(&mut self, tab_id: TabId) -> Result<(), HostError> {
        let window_id = self.tab(tab_id)?.window_id;
        let order = self.window(window_id)?.order.clone();
        for id in order {
            if let Some(t) = self.tabs.get_mut(&id) {
                t.active = id == tab_id;
                t.highlighted = id == tab_id;
            }
        }
        Ok(())
    }

    /// Gives a window an active tab again after its active tab left.
    fn ensure_active(&mut self, window_id: WindowId, removed_pos: usize) -> Result<(), HostError> {
        if self.active_in(window_id).is_some() {
            return Ok(());
        }
        let order = &self.window(window_id)?.order;
        if order.is_empty() {
            return Ok(());
        }
        let pick = order[removed_pos.min(order.len() - 1)];
        self.activate(pick)
    }

    fn close_window_if_empty(&mut self, window_id: WindowId) {
        let empty = self.window(window_id).map_or(false, |w| w.order.is_empty());
        if !empty {
            return;
        }
        self.windows.retain(|w| w.id != window_id);
        if self.focused == Some(window_id) {
            self.focused = self.windows.last().map(|w| w.id);
        }
    }

    fn prune_groups(&mut self) {
        let live: HashSet<GroupId> = self.tabs.values().filter_map(|t| t.group_id).collect();
        self.groups.retain(|id, _| live.contains(id));
    }

    /// Restores group contiguity after `moved` tabs were placed.
    ///
    /// Moved members that no longer touch an unmoved member of their group
    /// leave it; tabs left sitting between two members of a group join it.
    fn repair_groups(&mut self, window_id: WindowId, moved: &[TabId]) -> Result<(), HostError> {
        let order = self.window(window_id)?.order.clone();
        let moved_set: HashSet<TabId> = moved.iter().copied().collect();

        let mut leaving = Vec::new();
        for &id in moved {
            if self.tabs.get(&id).map_or(false, |t| t.pinned) {
                leaving.push(id);
                continue;
            }
            let Some(group) = self.group_of(id) else { continue };
            let Some(pos) = order.iter().position(|t| *t == id) else { continue };
            let mut start = pos;
            while start > 0 && self.group_of(order[start - 1]) == Some(group) {
                start -= 1;
            }
            let mut end = pos + 1;
            while end < order.len() && self.group_of(order[end]) == Some(group) {
                end += 1;
            }
            let anchored_here = order[start..end].iter().any(|t| !moved_set.contains(t));
            let anchored_elsewhere = self
                .tabs
                .values()
                .any(|t| t.group_id == Some(group) && !moved_set.contains(&t.id));
            if anchored_elsewhere && !anchored_here {
                leaving.push(id);
            }
        }
        for id in leaving {
            self.tab_mut(id)?.group_id = None;
        }

        let mut spans: Vec<(GroupId, usize, usize)> = Vec::new();
        for (pos, id) in order.iter().enumerate() {
            if let Some(group) = self.group_of(*id) {
                match spans.iter_mut().find(|(g, _, _)| *g == group) {
                    Some(span) => span.2 = pos,
                    None => spans.push((group, pos, pos)),
                }
            }
        }
        // Outer runs first; a group swallowed by an outer run is skipped.
        spans.sort_by_key(|(_, first, last)| std::cmp::Reverse(last - first));
        for (group, first, last) in spans {
            if !order[first..=last].iter().any(|id| self.group_of(*id) == Some(group)) {
                continue;
            }
            for id in &order[first..=last] {
                if let Some(t) = self.tabs.get_mut(id) {
                    if !t.pinned && t.group_id != Some(group) {
                        t.group_id = Some(group);
                    }
                }
            }
        }
        self.prune_groups();
        Ok(())
    }

    fn spawn_tab(&mut self, window_id: WindowId, url: &str, pinned: bool) -> TabId {
        let id = self.next_tab_id;
        self.next_tab_id += 1;
        self.tabs.insert(
            id,
            SimTab {
                id,
                window_id,
                pinned,
                group_id: None,
                active: false,
                highlighted: false,
                url: url.to_string(),
                title: Self::title_for(url),
                audible: false,
            },
        );
        id
    }

    fn set_pinned(&mut self, tab_id: TabId, pinned: bool) -> Result<(), HostError> {
        if self.tab(tab_id)?.pinned == pinned {
            return Ok(());
        }
        let (window_id, _) = self.detach(tab_id)?;
        {
            let tab = self.tab_mut(tab_id)?;
            tab.pinned = pinned;
            tab.group_id = None;
        }
        // Pinning appends to the pinned prefix; unpinning lands right after it.
        let boundary = self.pinned_count(window_id);
        self.insert_at(window_id, tab_id, boundary)?;
        self.prune_groups();
        Ok(())
    }

    /// Moves tabs across windows one after another, starting at `index`.
    fn relocate(
        &mut self,
        tab_ids: &[TabId],
        window_id: WindowId,
        index: TabIndex,
    ) -> Result<(), HostError> {
        self.window(window_id)?;
        let mut prev: Option<TabId> = None;
        for &id in tab_ids {
            let (source, old_pos) = self.detach(id)?;
            let was_active = self.tab(id)?.active;
            if source != window_id {
                let tab = self.tab_mut(id)?;
                tab.group_id = None;
                tab.active = false;
                tab.highlighted = false;
                if was_active {
                    self.ensure_active(source, old_pos)?;
                }
                self.close_window_if_empty(source);
            }
            let target = match (prev, index) {
                (Some(p), _) => self.position(p)?.1 + 1,
                (None, TabIndex::End) => usize::MAX,
                (None, TabIndex::At(i)) => i,
            };
            self.insert_at(window_id, id, target)?;
            prev = Some(id);
        }
        self.repair_groups(window_id, tab_ids)?;
        if self.active_in(window_id).is_none() {
            if let Some(first) = tab_ids.first() {
                self.activate(*first)?;
            }
        }
        Ok(())
    }
}

impl Default for SimulatedBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl TabHost for SimulatedBrowser {
    fn query_tabs(&self, query: &TabQuery) -> Vec<Tab> {
        self.windows
            .iter()
            .flat_map(|w| w.order.iter())
            .filter_map(|id| self.snapshot(*id).ok())
            .filter(|tab| query.matches(tab))
            .collect()
    }

    fn get_tab(&self, tab_id: TabId) -> Result<Tab, HostError> {
        self.snapshot(tab_id)
    }

    fn create_tab(&mut self, props: &CreateTab) -> Result<Tab, HostError> {
        let window_id = match props.window_id.or(self.focused) {
            Some(id) => id,
            None => return Err(HostError::NotFound("no window to create the tab in".to_string())),
        };
        self.window(window_id)?;
        let url = props.url.clone().unwrap_or_else(|| NEW_TAB_URL.to_string());
        let id = self.spawn_tab(window_id, &url, props.pinned);
        let pos = props.index.unwrap_or(usize::MAX);
        self.insert_at(window_id, id, pos)?;
        self.repair_groups(window_id, &[id])?;
        if props.active {
            self.activate(id)?;
        }
        self.snapshot(id)
    }

    fn update_tab(&mut self, tab_id: TabId, update: &TabUpdate) -> Result<Tab, HostError> {
        self.tab(tab_id)?;
        if let Some(pinned) = update.pinned {
            self.set_pinned(tab_id, pinned)?;
        }
        if let Some(url) = &update.url {
            let tab = self.tab_mut(tab_id)?;
            tab.url = url.clone();
            tab.title = Self::title_for(url);
        }
        if update.active == Some(true) {
            self.activate(tab_id)?;
        }
        self.snapshot(tab_id)
    }

    fn remove_tabs(&mut self, tab_ids: &[TabId]) -> Result<(), HostError> {
        for &id in tab_ids {
            let (window_id, pos) = self.detach(id)?;
            let was_active = self.tabs.remove(&id).map_or(false, |t| t.active);
            if was_active {
                self.ensure_active(window_id, pos)?;
            }
            self.close_window_if_empty(window_id);
        }
        self.prune_groups();
        Ok(())
    }

    fn move_tabs(&mut self, tab_ids: &[TabId], index: TabIndex) -> Result<(), HostError> {
        let Some(first) = tab_ids.first() else {
            return Ok(());
        };
        for id in tab_ids {
            self.tab(*id)?;
        }
        let window_id = self.tab(*first)?.window_id;
        self.relocate(tab_ids, window_id, index)
    }

    fn move_tabs_to_window(
        &mut self,
        tab_ids: &[TabId],
        window_id: WindowId,
        index: TabIndex,
    ) -> Result<(), HostError> {
        for id in tab_ids {
            self.tab(*id)?;
        }
        self.relocate(tab_ids, window_id, index)
    }

    fn highlight_tabs(&mut self, window_id: WindowId, indices: &[usize]) -> Result<(), HostError> {
        let order = self.window(window_id)?.order.clone();
        let mut ids = Vec::with_capacity(indices.len());
        for &i in indices {
            let id = order
                .get(i)
                .copied()
                .ok_or_else(|| HostError::InvalidArgument(format!("no tab at index {}", i)))?;
            ids.push(id);
        }
        let Some(first) = ids.first() else {
            return Err(HostError::InvalidArgument("no tabs to highlight".to_string()));
        };
        self.activate(*first)?;
        for id in ids {
            self.tab_mut(id)?.highlighted = true;
        }
        Ok(())
    }

    fn group_tabs(&mut self, tab_ids: &[TabId], group_id: Option<GroupId>) -> Result<GroupId, HostError> {
        let Some(&first) = tab_ids.first() else {
            return Err(HostError::InvalidArgument("no tabs to group".to_string()));
        };
        let window_id = self.tab(first)?.window_id;
        for id in tab_ids {
            if self.tab(*id)?.window_id != window_id {
                return Err(HostError::InvalidArgument("tabs span several windows".to_string()));
            }
        }
        let gid = match group_id {
            Some(g) => {
                let group = self
                    .groups
                    .get(&g)
                    .ok_or_else(|| HostError::NotFound(format!("group {}", g)))?;
                if group.window_id != window_id {
                    return Err(HostError::InvalidArgument(format!(
                        "group {} lives in another window",
                        g
                    )));
                }
                g
            }
            None => self.next_group_id,
        };

        // Unpinning prunes empty groups; a fresh group is registered afterwards.
        for &id in tab_ids {
            self.set_pinned(id, false)?;
        }
        if group_id.is_none() {
            self.next_group_id += 1;
            self.groups.insert(
                gid,
                TabGroup { id: gid, window_id, collapsed: false, title: String::new() },
            );
        }

        let order = self.window(window_id)?.order.clone();
        let members: Vec<TabId> = order
            .iter()
            .copied()
            .filter(|id| self.group_of(*id) == Some(gid) && !tab_ids.contains(id))
            .collect();

        if let Some(&head) = members.first() {
            let run_start = self.position(head)?.1;
            let mut before = Vec::new();
            let mut after = Vec::new();
            for &id in tab_ids {
                if self.position(id)?.1 < run_start {
                    before.push(id);
                } else {
                    after.push(id);
                }
            }
            for &id in tab_ids {
                self.detach(id)?;
            }
            let start = self.position(head)?.1;
            for (k, &id) in before.iter().enumerate() {
                self.insert_at(window_id, id, start + k)?;
            }
            let tail = members.last().copied().unwrap_or(head);
            let end = self.position(tail)?.1 + 1;
            for (k, &id) in after.iter().enumerate() {
                self.insert_at(window_id, id, end + k)?;
            }
        } else {
            let anchor = self.position(first)?.1;
            for &id in tab_ids {
                self.detach(id)?;
            }
            for &id in tab_ids {
                self.tab_mut(id)?.group_id = None;
            }
            let start = self.snap_out_of_runs(window_id, anchor);
            for (k, &id) in tab_ids.iter().enumerate() {
                self.insert_at(window_id, id, start + k)?;
            }
        }

        for &id in tab_ids {
            self.tab_mut(id)?.group_id = Some(gid);
        }
        self.repair_groups(window_id, tab_ids)?;
        Ok(gid)
    }

    fn ungroup_tabs(&mut self, tab_ids: &[TabId]) -> Result<(), HostError> {
        let mut by_group: Vec<(GroupId, Vec<TabId>)> = Vec::new();
        for &id in tab_ids {
            let Some(g) = self.tab(id)?.group_id else { continue };
            match by_group.iter_mut().find(|(group, _)| *group == g) {
                Some((_, ids)) => ids.push(id),
                None => by_group.push((g, vec![id])),
            }
        }

        for (group, leaving) in by_group {
            let window_id = self.tab(leaving[0])?.window_id;
            let order = self.window(window_id)?.order.clone();
            let run: Vec<TabId> = order
                .iter()
                .copied()
                .filter(|id| self.group_of(*id) == Some(group))
                .collect();
            // Leading members step out in place; the rest go after the group.
            let prefix = run.iter().take_while(|id| leaving.contains(id)).count();
            let trailing: Vec<TabId> = run[prefix..]
                .iter()
                .copied()
                .filter(|id| leaving.contains(id))
                .collect();
            for id in &leaving {
                self.tab_mut(*id)?.group_id = None;
            }
            for id in &trailing {
                self.detach(*id)?;
            }
            let end = match run.iter().rev().find(|id| !leaving.contains(id)) {
                Some(last) => self.position(*last)?.1 + 1,
                None => usize::MAX,
            };
            for (k, id) in trailing.iter().enumerate() {
                self.insert_at(window_id, *id, end.saturating_add(k))?;
            }
        }
        self.prune_groups();
        Ok(())
    }

    fn query_groups(&self, window_id: WindowId) -> Vec<TabGroup> {
        let Ok(window) = self.window(window_id) else {
            return Vec::new();
        };
        let mut seen = Vec::new();
        for id in &window.order {
            if let Some(g) = self.group_of(*id) {
                if !seen.contains(&g) {
                    seen.push(g);
                }
            }
        }
        seen.into_iter().filter_map(|g| self.groups.get(&g).cloned()).collect()
    }

    fn get_group(&self, group_id: GroupId) -> Result<TabGroup, HostError> {
        self.groups
            .get(&group_id)
            .cloned()
            .ok_or_else(|| HostError::NotFound(format!("group {}", group_id)))
    }

    fn move_group(&mut self, group_id: GroupId, index: TabIndex) -> Result<(), HostError> {
        let window_id = self.get_group(group_id)?.window_id;
        let members: Vec<TabId> = self
            .window(window_id)?
            .order
            .iter()
            .copied()
            .filter(|id| self.group_of(*id) == Some(group_id))
            .collect();
        for id in &members {
            self.detach(*id)?;
        }
        let len = self.window(window_id)?.order.len();
        let prefix = self.pinned_count(window_id);
        let target = match index {
            TabIndex::End => len,
            TabIndex::At(i) => i.clamp(prefix, len),
        };
        let start = self.snap_out_of_runs(window_id, target);
        for (k, id) in members.iter().enumerate() {
            self.window_mut(window_id)?.order.insert(start + k, *id);
        }
        Ok(())
    }

    fn update_group(&mut self, group_id: GroupId, collapsed: bool) -> Result<(), HostError> {
        let group = self
            .groups
            .get_mut(&group_id)
            .ok_or_else(|| HostError::NotFound(format!("group {}", group_id)))?;
        group.collapsed = collapsed;
        Ok(())
    }

    fn get_all_windows(&self) -> Vec<Window> {
        self.windows
            .iter()
            .map(|w| Window {
                id: w.id,
                focused: self.focused == Some(w.id),
                incognito: w.incognito,
                kind: w.kind,
            })
            .collect()
    }

    fn current_window(&self) -> Result<Window, HostError> {
        self.get_all_windows()
            .into_iter()
            .find(|w| w.focused)
            .ok_or_else(|| HostError::NotFound("no focused window".to_string()))
    }

    fn focus_window(&mut self, window_id: WindowId) -> Result<(), HostError> {
        self.window(window_id)?;
        self.focused = Some(window_id);
        Ok(())
    }

    fn create_window(&mut self, props: &CreateWindow) -> Result<Window, HostError> {
        let previous_focus = self.focused;
        let window_id = self.open_window_with(WindowKind::Normal, props.incognito);
        if !props.focused {
            self.focused = previous_focus.or(Some(window_id));
        }
        for url in &props.urls {
            let id = self.spawn_tab(window_id, url, false);
            self.insert_at(window_id, id, usize::MAX)?;
        }
        if !props.tab_ids.is_empty() {
            self.relocate(&props.tab_ids, window_id, TabIndex::End)?;
        }
        if self.window(window_id)?.order.is_empty() {
            let id = self.spawn_tab(window_id, NEW_TAB_URL, false);
            self.insert_at(window_id, id, 0)?;
        }
        if self.active_in(window_id).is_none() {
            let first = self.window(window_id)?.order[0];
            self.activate(first)?;
        }
        Ok(Window {
            id: window_id,
            focused: self.focused == Some(window_id),
            incognito: props.incognito,
            kind: WindowKind::Normal,
        })
    }

    fn inject_script(&mut self, tab_id: TabId, script: PageScript) -> Result<ScriptOutcome, HostError> {
        let url = self.tab(tab_id)?.url.clone();
        if PROTECTED_PREFIXES.iter().any(|p| url.starts_with(p)) {
            return Err(HostError::PermissionDenied(format!(
                "Cannot access contents of url \"{}\"",
                url
            )));
        }
        match script {
            PageScript::CopyLocation => {
                self.clipboard.set_text(&url);
                Ok(ScriptOutcome::Done)
            }
            PageScript::PauseMedia => {
                let tab = self.tab_mut(tab_id)?;
                if tab.audible {
                    tab.audible = false;
                    Ok(ScriptOutcome::Paused(1))
                } else {
                    Ok(ScriptOutcome::Paused(0))
                }
            }
        }
    }
}

//! Command dispatch.
//!
//! One handler per [`Command`] variant. Every handler reads a fresh layout,
//! plans its mutations and hands them to an [`Executor`], which applies them
//! to the host in order and keeps the list for the [`CommandReport`].

use serde::Serialize;

use crate::app::App;
use crate::host::{safe_get_tab, ClipboardBridge, TabHost};
use crate::managers::activation_history::ActivationHistory;
use crate::managers::toggle_memory::{ToggleMemory, ToggleMemoryTrait};
use crate::services::blank_tabs::{plan_new_tab, sweep_targets, Placement};
use crate::services::clipboard_url::resolve_clipboard_text;
use crate::services::group_mover::plan_move_all_groups;
use crate::services::layout_snapshot::Layout;
use crate::services::reconciliation_engine::{plan_move, MoveIntent};
use crate::services::snap_planner::{plan_move_to_back, plan_move_to_front};
use crate::types::action::TabAction;
use crate::types::command::Command;
use crate::types::errors::{CommandError, HostError};
use crate::types::memory::LastAction;
use crate::types::tab::{
    CreateTab, CreateWindow, GroupId, PageScript, ScriptOutcome, Tab, TabId, TabIndex, TabQuery,
    TabUpdate, Window, WindowId, WindowKind,
};

/// What a command did to the host, in issue order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReport {
    pub command: Command,
    pub actions: Vec<TabAction>,
}

impl CommandReport {
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Done,
    /// The target vanished; nothing happened.
    Skipped,
    Tab(Tab),
    Window(Window),
    Group(GroupId),
    Script(ScriptOutcome),
}

/// Applies actions to the host and records them.
pub struct Executor<'a, H: TabHost + ?Sized> {
    host: &'a mut H,
    clipboard: &'a mut dyn ClipboardBridge,
    issued: Vec<TabAction>,
}

impl<'a, H: TabHost + ?Sized> Executor<'a, H> {
    pub fn new(host: &'a mut H, clipboard: &'a mut dyn ClipboardBridge) -> Self {
        Self { host, clipboard, issued: Vec::new() }
    }

    pub fn host(&self) -> &H {
        self.host
    }

    /// Applies `action`, returning the host's error untouched.
    pub fn try_apply(&mut self, action: TabAction) -> Result<Applied, HostError> {
        self.issued.push(action.clone());
        let host = &mut *self.host;
        match action {
            TabAction::SetPinned { tab_id, pinned } => {
                host.update_tab(tab_id, &TabUpdate::pinned(pinned)).map(Applied::Tab)
            }
            TabAction::Ungroup { tab_ids } => host.ungroup_tabs(&tab_ids).map(|_| Applied::Done),
            TabAction::Group { tab_ids, group_id } => {
                host.group_tabs(&tab_ids, group_id).map(Applied::Group)
            }
            TabAction::Move { tab_ids, index } => {
                host.move_tabs(&tab_ids, index).map(|_| Applied::Done)
            }
            TabAction::MoveToWindow { tab_ids, window_id, index } => host
                .move_tabs_to_window(&tab_ids, window_id, index)
                .map(|_| Applied::Done),
            TabAction::MoveGroup { group_id, index } => {
                host.move_group(group_id, index).map(|_| Applied::Done)
            }
            TabAction::SetCollapsed { group_id, collapsed } => {
                host.update_group(group_id, collapsed).map(|_| Applied::Done)
            }
            TabAction::Activate { tab_id } => {
                host.update_tab(tab_id, &TabUpdate::activate()).map(Applied::Tab)
            }
            TabAction::Navigate { tab_id, url } => {
                host.update_tab(tab_id, &TabUpdate::navigate(&url)).map(Applied::Tab)
            }
            TabAction::Create { window_id, index, pinned, url } => {
                let props = CreateTab {
                    window_id: Some(window_id),
                    index: match index {
                        TabIndex::At(i) => Some(i),
                        TabIndex::End => None,
                    },
                    pinned,
                    active: false,
                    url,
                };
                host.create_tab(&props).map(Applied::Tab)
            }
            TabAction::Remove { tab_ids } => host.remove_tabs(&tab_ids).map(|_| Applied::Done),
            TabAction::FocusWindow { window_id } => {
                host.focus_window(window_id).map(|_| Applied::Done)
            }
            TabAction::CreateWindow { urls, tab_ids, incognito } => {
                let props = CreateWindow { urls, tab_ids, incognito, focused: true };
                host.create_window(&props).map(Applied::Window)
            }
            TabAction::InjectScript { tab_id, script } => {
                host.inject_script(tab_id, script).map(Applied::Script)
            }
            TabAction::WriteClipboard { text } => {
                self.clipboard.write_text(&text).map(|_| Applied::Done)
            }
        }
    }

    /// Applies `action`; a vanished target turns into [`Applied::Skipped`].
    pub fn apply(&mut self, action: TabAction) -> Result<Applied, CommandError> {
        match self.try_apply(action) {
            Ok(applied) => Ok(applied),
            Err(e) if e.is_not_found() => {
                log::debug!("skipping action on vanished target: {}", e);
                Ok(Applied::Skipped)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn apply_all(&mut self, actions: Vec<TabAction>) -> Result<(), CommandError> {
        for action in actions {
            self.apply(action)?;
        }
        Ok(())
    }

    pub fn finish(self, command: Command) -> CommandReport {
        CommandReport { command, actions: self.issued }
    }
}

/// Runs `command` against `window_id`.
pub fn dispatch<H: TabHost>(
    app: &mut App<H>,
    command: Command,
    window_id: WindowId,
) -> Result<CommandReport, CommandError> {
    match command {
        Command::DuplicateTab => duplicate_tabs(app, window_id),
        Command::PinTab => toggle_pin(app, window_id),
        Command::GoIncognito => go_incognito(app, window_id),
        Command::OpenTabNear => open_new_tab(app, window_id, command, Placement::Near),
        Command::OpenTabAtEnd => open_new_tab(app, window_id, command, Placement::AtEnd),
        Command::AddTabToCurrentGroup => open_new_tab(app, window_id, command, Placement::InGroup),
        Command::MoveTabsLeft => step_tabs(app, window_id, command, MoveIntent::StepLeft),
        Command::MoveTabsRight => step_tabs(app, window_id, command, MoveIntent::StepRight),
        Command::MoveTabsToFront | Command::MoveTabsToBack => snap_tabs(app, window_id, command),
        Command::SwitchWindows => switch_windows(app, window_id),
        Command::ToggleCollapseGroups => toggle_collapse_groups(app, window_id),
        Command::SwitchToLastTab => switch_to_last_tab(app, window_id),
        Command::CopyUrl => copy_url(app, window_id),
        Command::OpenClipboardUrl => open_clipboard_url(app, window_id),
        Command::MoveTabsToWindow => move_tabs_to_window(app, window_id),
        Command::MoveAllGroups => move_all_groups(app, window_id),
        Command::GoHome => go_home(app, window_id),
        Command::PauseOrShowAudioTabs => pause_or_show_audio_tabs(app),
    }
}

fn executor<H: TabHost>(app: &mut App<H>) -> Executor<'_, H> {
    Executor::new(&mut app.host, app.clipboard.as_mut())
}

/// Normal windows in host order.
fn normal_windows<H: TabHost + ?Sized>(host: &H) -> Vec<Window> {
    host.get_all_windows()
        .into_iter()
        .filter(|w| w.kind == WindowKind::Normal)
        .collect()
}

/// The normal window after `window_id`, wrapping around.
fn next_window(windows: &[Window], window_id: WindowId) -> Option<WindowId> {
    let others = windows.iter().filter(|w| w.id != window_id).count();
    if others == 0 {
        return None;
    }
    match windows.iter().position(|w| w.id == window_id) {
        Some(pos) => Some(windows[(pos + 1) % windows.len()].id),
        None => windows.first().map(|w| w.id),
    }
}

fn duplicate_tabs<H: TabHost>(
    app: &mut App<H>,
    window_id: WindowId,
) -> Result<CommandReport, CommandError> {
    let selected = Layout::capture(&app.host, window_id).highlighted();
    let mut exec = executor(app);
    let mut last_copy = None;

    for source in &selected {
        // Earlier copies shift later tabs, so re-read each source.
        let Some(tab) = safe_get_tab(exec.host(), source.id) else { continue };
        let created = exec.apply(TabAction::Create {
            window_id,
            index: TabIndex::At(tab.index + 1),
            pinned: tab.pinned,
            url: Some(tab.url.clone()),
        })?;
        let Applied::Tab(copy) = created else { continue };
        if let Some(group_id) = tab.group_id {
            if copy.group_id != Some(group_id) {
                exec.apply(TabAction::Group { tab_ids: vec![copy.id], group_id: Some(group_id) })?;
            }
        }
        last_copy = Some(copy.id);
    }

    if let Some(tab_id) = last_copy {
        exec.apply(TabAction::Activate { tab_id })?;
    }
    Ok(exec.finish(Command::DuplicateTab))
}

fn toggle_pin<H: TabHost>(app: &mut App<H>, window_id: WindowId) -> Result<CommandReport, CommandError> {
    let selected = Layout::capture(&app.host, window_id).highlighted();
    let actions: Vec<TabAction> = if !selected.is_empty() && selected.iter().all(|t| t.pinned) {
        selected
            .iter()
            .rev()
            .map(|t| TabAction::SetPinned { tab_id: t.id, pinned: false })
            .collect()
    } else {
        selected
            .iter()
            .filter(|t| !t.pinned)
            .map(|t| TabAction::SetPinned { tab_id: t.id, pinned: true })
            .collect()
    };
    let mut exec = executor(app);
    exec.apply_all(actions)?;
    Ok(exec.finish(Command::PinTab))
}

fn go_incognito<H: TabHost>(app: &mut App<H>, window_id: WindowId) -> Result<CommandReport, CommandError> {
    let urls: Vec<String> = Layout::capture(&app.host, window_id)
        .highlighted()
        .into_iter()
        .map(|t| t.url)
        .collect();
    let mut exec = executor(app);
    if !urls.is_empty() {
        exec.apply(TabAction::CreateWindow { urls, tab_ids: Vec::new(), incognito: true })?;
    }
    Ok(exec.finish(Command::GoIncognito))
}

fn open_new_tab<H: TabHost>(
    app: &mut App<H>,
    window_id: WindowId,
    command: Command,
    placement: Placement,
) -> Result<CommandReport, CommandError> {
    let layout = Layout::capture(&app.host, window_id);
    let plan = plan_new_tab(&layout, placement);
    let mut exec = executor(app);
    let Some(plan) = plan else {
        log::debug!("{}: nowhere to place a new tab in window {}", command, window_id);
        return Ok(exec.finish(command));
    };

    // Created before the blank it replaces goes, so the window never empties.
    let created = exec.apply(TabAction::Create {
        window_id,
        index: plan.index,
        pinned: false,
        url: None,
    })?;
    let Applied::Tab(tab) = created else {
        return Ok(exec.finish(command));
    };
    if let Some(group_id) = plan.group_id {
        if tab.group_id != Some(group_id) {
            exec.apply(TabAction::Group { tab_ids: vec![tab.id], group_id: Some(group_id) })?;
        }
    }
    exec.apply(TabAction::Activate { tab_id: tab.id })?;

    let after = Layout::capture(exec.host(), window_id);
    let mut doomed: Vec<TabId> = plan.replace.into_iter().collect();
    for id in sweep_targets(&after, tab.id) {
        if !doomed.contains(&id) {
            doomed.push(id);
        }
    }
    if !doomed.is_empty() {
        exec.apply(TabAction::Remove { tab_ids: doomed })?;
    }
    Ok(exec.finish(command))
}

fn step_tabs<H: TabHost>(
    app: &mut App<H>,
    window_id: WindowId,
    command: Command,
    intent: MoveIntent,
) -> Result<CommandReport, CommandError> {
    let layout = Layout::capture(&app.host, window_id);
    let selected = layout.highlighted();
    let actions = plan_move(&selected, intent, &layout, app.settings.skip_collapsed_groups);
    let mut exec = executor(app);
    exec.apply_all(actions)?;
    Ok(exec.finish(command))
}

fn snap_tabs<H: TabHost>(
    app: &mut App<H>,
    window_id: WindowId,
    command: Command,
) -> Result<CommandReport, CommandError> {
    let layout = Layout::capture(&app.host, window_id);
    let selected = layout.highlighted();
    if selected.is_empty() {
        return Ok(CommandReport { command, actions: Vec::new() });
    }
    let now = app.clock.now_ms();
    let memory = ToggleMemory::new(app.store.as_ref()).load();
    let outcome = match command {
        Command::MoveTabsToBack => {
            plan_move_to_back(&selected, &layout, memory.as_ref(), now, &app.settings)
        }
        _ => plan_move_to_front(&selected, &layout, memory.as_ref(), now, &app.settings),
    };
    if outcome.toggled {
        log::debug!("{} repeated on the same tabs, toggling", command);
    }

    let mut exec = Executor::new(&mut app.host, app.clipboard.as_mut());
    let applied = exec.apply_all(outcome.actions);
    let report = exec.finish(command);
    ToggleMemory::new(app.store.as_ref()).save(&outcome.memory)?;
    applied?;
    Ok(report)
}

fn switch_windows<H: TabHost>(app: &mut App<H>, window_id: WindowId) -> Result<CommandReport, CommandError> {
    let windows = normal_windows(&app.host);
    let target = if windows.len() < 2 { None } else { next_window(&windows, window_id) };
    let mut exec = executor(app);
    if let Some(target) = target {
        exec.apply(TabAction::FocusWindow { window_id: target })?;
    }
    Ok(exec.finish(Command::SwitchWindows))
}

fn toggle_collapse_groups<H: TabHost>(
    app: &mut App<H>,
    window_id: WindowId,
) -> Result<CommandReport, CommandError> {
    let groups = app.host.query_groups(window_id);
    let collapse = !groups.iter().all(|g| g.collapsed);
    let actions = groups
        .iter()
        .map(|g| TabAction::SetCollapsed { group_id: g.id, collapsed: collapse })
        .collect();
    let mut exec = executor(app);
    exec.apply_all(actions)?;
    Ok(exec.finish(Command::ToggleCollapseGroups))
}

fn switch_to_last_tab<H: TabHost>(
    app: &mut App<H>,
    window_id: WindowId,
) -> Result<CommandReport, CommandError> {
    let now = app.clock.now_ms();
    let mut history =
        ActivationHistory::load(app.store.as_ref(), &app.host, app.settings.history_capacity, now)?;
    if history.retain_existing(&app.host) {
        history.save(app.store.as_ref())?;
    }
    let current = app.host.query_tabs(&TabQuery::active_in(window_id)).first().map(|t| t.id);
    let target = history
        .switch_target(current)
        .and_then(|record| safe_get_tab(&app.host, record.tab_id));

    let mut exec = executor(app);
    if let Some(tab) = target {
        exec.apply(TabAction::Activate { tab_id: tab.id })?;
        if tab.window_id != window_id {
            exec.apply(TabAction::FocusWindow { window_id: tab.window_id })?;
        }
    }
    Ok(exec.finish(Command::SwitchToLastTab))
}

fn active_tab<H: TabHost>(app: &App<H>, window_id: WindowId) -> Result<Option<Tab>, CommandError> {
    let tabs = app.host.query_tabs(&TabQuery::window(window_id));
    if tabs.is_empty() {
        return Ok(None);
    }
    match tabs.into_iter().find(|t| t.active) {
        Some(tab) => Ok(Some(tab)),
        None => Err(CommandError::NoActiveTab(window_id)),
    }
}

fn copy_url<H: TabHost>(app: &mut App<H>, window_id: WindowId) -> Result<CommandReport, CommandError> {
    let active = active_tab(app, window_id)?;
    let mut exec = executor(app);
    if let Some(tab) = active {
        let injected = exec.try_apply(TabAction::InjectScript {
            tab_id: tab.id,
            script: PageScript::CopyLocation,
        });
        match injected {
            Ok(_) => {}
            Err(HostError::PermissionDenied(reason)) => {
                log::debug!("copy script refused ({}), writing through the clipboard bridge", reason);
                exec.apply(TabAction::WriteClipboard { text: tab.url.clone() })?;
            }
            Err(e) if e.is_not_found() => log::debug!("copy-url target vanished: {}", e),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(exec.finish(Command::CopyUrl))
}

fn open_clipboard_url<H: TabHost>(
    app: &mut App<H>,
    window_id: WindowId,
) -> Result<CommandReport, CommandError> {
    let text = match app.clipboard.read_text() {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Failed to read clipboard: {}", e);
            return Ok(CommandReport { command: Command::OpenClipboardUrl, actions: Vec::new() });
        }
    };
    let target = resolve_clipboard_text(&text, &app.settings);
    let mut exec = executor(app);
    if let Some(target) = target {
        let created = exec.apply(TabAction::Create {
            window_id,
            index: TabIndex::End,
            pinned: false,
            url: Some(target.url().to_string()),
        })?;
        if let Applied::Tab(tab) = created {
            exec.apply(TabAction::Activate { tab_id: tab.id })?;
        }
    }
    Ok(exec.finish(Command::OpenClipboardUrl))
}

fn move_tabs_to_window<H: TabHost>(
    app: &mut App<H>,
    window_id: WindowId,
) -> Result<CommandReport, CommandError> {
    let selected = Layout::capture(&app.host, window_id).highlighted();
    let tab_ids: Vec<TabId> = selected.iter().map(|t| t.id).collect();
    let windows = normal_windows(&app.host);
    let incognito = app
        .host
        .get_all_windows()
        .iter()
        .find(|w| w.id == window_id)
        .map_or(false, |w| w.incognito);
    let target = next_window(&windows, window_id);

    let mut exec = executor(app);
    let Some(&first) = tab_ids.first() else {
        return Ok(exec.finish(Command::MoveTabsToWindow));
    };
    match target {
        Some(target) => {
            exec.apply(TabAction::MoveToWindow {
                tab_ids,
                window_id: target,
                index: TabIndex::End,
            })?;
            exec.apply(TabAction::FocusWindow { window_id: target })?;
            exec.apply(TabAction::Activate { tab_id: first })?;
        }
        None => {
            exec.apply(TabAction::CreateWindow { urls: Vec::new(), tab_ids, incognito })?;
        }
    }
    Ok(exec.finish(Command::MoveTabsToWindow))
}

fn move_all_groups<H: TabHost>(app: &mut App<H>, window_id: WindowId) -> Result<CommandReport, CommandError> {
    let layout = Layout::capture(&app.host, window_id);
    let Some(plan) = plan_move_all_groups(&layout) else {
        return Ok(CommandReport { command: Command::MoveAllGroups, actions: Vec::new() });
    };
    log::debug!("moving {} groups to the {:?}", plan.actions.len(), plan.direction);
    let now = app.clock.now_ms();

    let mut exec = Executor::new(&mut app.host, app.clipboard.as_mut());
    exec.apply_all(plan.actions)?;
    let report = exec.finish(Command::MoveAllGroups);
    let memory = LastAction::new(Command::MoveAllGroups.as_str(), plan.grouped_tab_ids, now);
    ToggleMemory::new(app.store.as_ref()).save(&memory)?;
    Ok(report)
}

fn go_home<H: TabHost>(app: &mut App<H>, window_id: WindowId) -> Result<CommandReport, CommandError> {
    let active = active_tab(app, window_id)?;
    let url = app.settings.home_url.clone();
    let mut exec = executor(app);
    if let Some(tab) = active {
        exec.apply(TabAction::Navigate { tab_id: tab.id, url })?;
    }
    Ok(exec.finish(Command::GoHome))
}

fn pause_or_show_audio_tabs<H: TabHost>(app: &mut App<H>) -> Result<CommandReport, CommandError> {
    let audible = app.host.query_tabs(&TabQuery { audible: Some(true), ..TabQuery::default() });
    let mut exec = executor(app);
    let mut failed: Vec<Tab> = Vec::new();

    for tab in audible {
        let outcome = exec.try_apply(TabAction::InjectScript {
            tab_id: tab.id,
            script: PageScript::PauseMedia,
        });
        match outcome {
            Ok(Applied::Script(ScriptOutcome::Paused(n))) if n > 0 => {}
            Ok(_) => failed.push(tab),
            Err(HostError::PermissionDenied(reason)) => {
                log::debug!("tab {} cannot be paused: {}", tab.id, reason);
                failed.push(tab);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                log::warn!("pausing tab {} failed: {}", tab.id, e);
                failed.push(tab);
            }
        }
    }

    if let Some(tab) = failed.first() {
        exec.apply(TabAction::Activate { tab_id: tab.id })?;
        exec.apply(TabAction::FocusWindow { window_id: tab.window_id })?;
    }
    Ok(exec.finish(Command::PauseOrShowAudioTabs))
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::CommandError;

/// Every keyboard command the extension registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    DuplicateTab,
    PinTab,
    GoIncognito,
    OpenTabNear,
    OpenTabAtEnd,
    AddTabToCurrentGroup,
    MoveTabsLeft,
    MoveTabsRight,
    MoveTabsToFront,
    MoveTabsToBack,
    SwitchWindows,
    ToggleCollapseGroups,
    SwitchToLastTab,
    CopyUrl,
    OpenClipboardUrl,
    MoveTabsToWindow,
    MoveAllGroups,
    GoHome,
    PauseOrShowAudioTabs,
}

impl Command {
    pub const ALL: [Command; 19] = [
        Command::DuplicateTab,
        Command::PinTab,
        Command::GoIncognito,
        Command::OpenTabNear,
        Command::OpenTabAtEnd,
        Command::AddTabToCurrentGroup,
        Command::MoveTabsLeft,
        Command::MoveTabsRight,
        Command::MoveTabsToFront,
        Command::MoveTabsToBack,
        Command::SwitchWindows,
        Command::ToggleCollapseGroups,
        Command::SwitchToLastTab,
        Command::CopyUrl,
        Command::OpenClipboardUrl,
        Command::MoveTabsToWindow,
        Command::MoveAllGroups,
        Command::GoHome,
        Command::PauseOrShowAudioTabs,
    ];

    /// The name the host uses when the shortcut fires.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::DuplicateTab => "duplicate-tab",
            Command::PinTab => "pin-tab",
            Command::GoIncognito => "go-incognito",
            Command::OpenTabNear => "open-tab-near",
            Command::OpenTabAtEnd => "open-tab-at-end",
            Command::AddTabToCurrentGroup => "add-tab-to-current-group",
            Command::MoveTabsLeft => "move-tabs-left",
            Command::MoveTabsRight => "move-tabs-right",
            Command::MoveTabsToFront => "move-tabs-to-front",
            Command::MoveTabsToBack => "move-tabs-to-back",
            Command::SwitchWindows => "switch-windows",
            Command::ToggleCollapseGroups => "toggle-collapse-groups",
            Command::SwitchToLastTab => "switch-to-last-tab",
            Command::CopyUrl => "copy-url",
            Command::OpenClipboardUrl => "open-clipboard-url",
            Command::MoveTabsToWindow => "move-tabs-to-window",
            Command::MoveAllGroups => "move-all-groups",
            Command::GoHome => "go-home",
            Command::PauseOrShowAudioTabs => "pause-or-show-audio-tabs",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::DuplicateTab => "Duplicate tab(s)",
            Command::PinTab => "Pin tab(s)",
            Command::GoIncognito => "Open the current tab(s) in incognito",
            Command::OpenTabNear => "Open tab near current and in same group",
            Command::OpenTabAtEnd => "Open tab at the end of all tabs",
            Command::AddTabToCurrentGroup => "Open tab at the end of the current group",
            Command::MoveTabsLeft => "Move highlighted tab(s) left",
            Command::MoveTabsRight => "Move highlighted tab(s) right",
            Command::MoveTabsToFront => "Move highlighted tab(s) to the front",
            Command::MoveTabsToBack => "Move highlighted tab(s) to the back",
            Command::SwitchWindows => "Switch between windows",
            Command::ToggleCollapseGroups => "Toggle collapse all tab groups",
            Command::SwitchToLastTab => "Switch to the last active tab",
            Command::CopyUrl => "Copy current tab URL to clipboard",
            Command::OpenClipboardUrl => "Open new tab with clipboard content as URL or search",
            Command::MoveTabsToWindow => "Move highlighted tab(s) to the next window",
            Command::MoveAllGroups => "Move all tab groups to the front or back",
            Command::GoHome => "Open the home page in the current tab",
            Command::PauseOrShowAudioTabs => "Pause audio tabs, or show the one that cannot be paused",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CommandError::UnknownCommand(s.to_string()))
    }
}

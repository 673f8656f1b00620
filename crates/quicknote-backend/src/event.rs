//! Inbound signals from the host

use quicknote_settings::ShortcutAction;
use serde::{Deserialize, Serialize};

/// Application menu entries forwarded to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCommand {
    NewNote,
    OpenFile,
    Save,
    SaveAs,
    CloseTab,
    ToggleTheme,
}

impl MenuCommand {
    /// Parse a menu item id (`new_note`, `save_file_as`, ...)
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "new_note" => Some(MenuCommand::NewNote),
            "open_file" => Some(MenuCommand::OpenFile),
            "save_file" => Some(MenuCommand::Save),
            "save_file_as" => Some(MenuCommand::SaveAs),
            "close_tab" | "close_active_tab" => Some(MenuCommand::CloseTab),
            "toggle_theme" => Some(MenuCommand::ToggleTheme),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendEvent {
    NewTabRequested,
    CloseTabRequested,
    OpenRecentFile(String),
    Menu(MenuCommand),
    FilesDropped(Vec<String>),
    QuitRequested,
}

impl BackendEvent {
    /// Event a fired global shortcut maps to. Window toggling never reaches the session.
    pub fn from_shortcut(action: ShortcutAction) -> Option<Self> {
        match action {
            ShortcutAction::NewNote => Some(BackendEvent::NewTabRequested),
            ShortcutAction::CloseTab => Some(BackendEvent::CloseTabRequested),
            ShortcutAction::ToggleWindow => None,
        }
    }
}

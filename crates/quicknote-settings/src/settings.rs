//! Persisted settings record

use serde::{Deserialize, Serialize};

pub const DEFAULT_NEW_NOTE_SHORTCUT: &str = "CmdOrCtrl+Option+T";
pub const DEFAULT_CLOSE_TAB_SHORTCUT: &str = "CmdOrCtrl+Option+Y";
pub const DEFAULT_TOGGLE_WINDOW_SHORTCUT: &str = "CmdOrCtrl+Option+U";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Global shortcuts the backend registers on the user's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    NewNote,
    CloseTab,
    ToggleWindow,
}

impl ShortcutAction {
    pub const ALL: [ShortcutAction; 3] = [
        ShortcutAction::NewNote,
        ShortcutAction::CloseTab,
        ShortcutAction::ToggleWindow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShortcutAction::NewNote => "new_note",
            ShortcutAction::CloseTab => "close_tab",
            ShortcutAction::ToggleWindow => "toggle_window",
        }
    }
}

impl std::fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub theme: Theme,
    pub language: String,
    /// Extension suggested by the save-as dialog
    pub default_format: String,
    pub default_path: Option<String>,
    pub new_note_shortcut: String,
    pub close_tab_shortcut: String,
    /// Added after the first release; older settings files lack it
    #[serde(default = "default_toggle_window_shortcut")]
    pub toggle_window_shortcut: String,
}

fn default_toggle_window_shortcut() -> String {
    DEFAULT_TOGGLE_WINDOW_SHORTCUT.to_string()
}

impl AppSettings {
    pub fn shortcut(&self, action: ShortcutAction) -> &str {
        match action {
            ShortcutAction::NewNote => &self.new_note_shortcut,
            ShortcutAction::CloseTab => &self.close_tab_shortcut,
            ShortcutAction::ToggleWindow => &self.toggle_window_shortcut,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: "en".to_string(),
            default_format: "txt".to_string(),
            default_path: None,
            new_note_shortcut: DEFAULT_NEW_NOTE_SHORTCUT.to_string(),
            close_tab_shortcut: DEFAULT_CLOSE_TAB_SHORTCUT.to_string(),
            toggle_window_shortcut: default_toggle_window_shortcut(),
        }
    }
}

//! System tray menu model
//!
//! The tray is rebuilt from scratch whenever the recently-closed list
//! changes. Item ids are stable strings so a click can be resolved later
//! against the list that was current when the menu was built.

use quicknote_tabs::file_name_from_path;

use crate::event::{BackendEvent, MenuCommand};

const RECENT_PREFIX: &str = "tray_recent_";
const NO_RECENT_ID: &str = "tray_no_recent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayItem {
    pub id: String,
    pub label: String,
    pub enabled: bool,
}

impl TrayItem {
    fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            enabled: true,
        }
    }

    fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEntry {
    Item(TrayItem),
    Separator,
    Submenu { label: String, items: Vec<TrayItem> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMenu {
    pub entries: Vec<TrayEntry>,
}

impl TrayMenu {
    pub fn with_recent_files(recent_files: &[String]) -> Self {
        let recent_items = if recent_files.is_empty() {
            vec![TrayItem::new(NO_RECENT_ID, "No Recent Files").disabled()]
        } else {
            recent_files
                .iter()
                .enumerate()
                .map(|(index, path)| {
                    TrayItem::new(format!("{RECENT_PREFIX}{index}"), file_name_from_path(path))
                })
                .collect()
        };

        let entries = vec![
            TrayEntry::Item(TrayItem::new("tray_new_note", "New Note")),
            TrayEntry::Item(TrayItem::new("tray_close_tab", "Close Current Tab")),
            TrayEntry::Separator,
            TrayEntry::Item(TrayItem::new("tray_open_file", "Open...")),
            TrayEntry::Item(TrayItem::new("tray_save", "Save")),
            TrayEntry::Item(TrayItem::new("tray_save_as", "Save As...")),
            TrayEntry::Separator,
            TrayEntry::Submenu {
                label: "Recently Closed".to_string(),
                items: recent_items,
            },
            TrayEntry::Separator,
            TrayEntry::Item(TrayItem::new("tray_show_hide", "Show/Hide Window")),
            TrayEntry::Item(TrayItem::new("tray_quit", "Quit")),
        ];

        Self { entries }
    }

    /// Items of the "Recently Closed" submenu
    pub fn recent_items(&self) -> &[TrayItem] {
        self.entries
            .iter()
            .find_map(|entry| match entry {
                TrayEntry::Submenu { items, .. } => Some(items.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayAction {
    ToggleWindow,
    Quit,
    Emit(BackendEvent),
}

/// Map a clicked tray item to what should happen.
///
/// `recent_files` must be the list the menu was built from.
pub fn resolve_tray_click(item_id: &str, recent_files: &[String]) -> Option<TrayAction> {
    let menu = |command| Some(TrayAction::Emit(BackendEvent::Menu(command)));

    match item_id {
        "tray_show_hide" => Some(TrayAction::ToggleWindow),
        "tray_quit" => Some(TrayAction::Quit),
        "tray_new_note" => menu(MenuCommand::NewNote),
        "tray_close_tab" => menu(MenuCommand::CloseTab),
        "tray_open_file" => menu(MenuCommand::OpenFile),
        "tray_save" => menu(MenuCommand::Save),
        "tray_save_as" => menu(MenuCommand::SaveAs),
        NO_RECENT_ID => None,
        other => {
            let index: usize = other.strip_prefix(RECENT_PREFIX)?.parse().ok()?;
            recent_files
                .get(index)
                .map(|path| TrayAction::Emit(BackendEvent::OpenRecentFile(path.clone())))
        }
    }
}

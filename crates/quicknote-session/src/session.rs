//! Session data structure

use serde::{Deserialize, Serialize};

use quicknote_tabs::{RecentlyClosed, Tab};

use crate::error::SessionError;
use crate::Result;

/// Open tabs in display order plus the active pointer and closed history.
///
/// `active_tab_id` is `None` exactly when there are no tabs, and otherwise
/// names one of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    tabs: Vec<Tab>,
    active_tab_id: Option<String>,
    recently_closed: RecentlyClosed,
}

/// A tab that was just removed from the session
#[derive(Debug, Clone)]
pub struct ClosedTab {
    pub tab: Tab,
    /// The recently-closed list was modified by this close
    pub recent_changed: bool,
}

impl Session {
    /// A session holding `first_tab`, active
    pub fn new(first_tab: Tab) -> Self {
        Self {
            active_tab_id: Some(first_tab.id.clone()),
            tabs: vec![first_tab],
            recently_closed: RecentlyClosed::new(),
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    pub fn recently_closed(&self) -> &RecentlyClosed {
        &self.recently_closed
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn tab_mut(&mut self, tab_id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    pub fn tab_by_path(&self, path: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.path.as_deref() == Some(path))
    }

    fn position(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.as_deref().and_then(|id| self.tab(id))
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let id = self.active_tab_id.clone()?;
        self.tab_mut(&id)
    }

    pub fn tab_names(&self) -> impl Iterator<Item = &str> {
        self.tabs.iter().map(|t| t.name.as_str())
    }

    /// Append a tab without activating it
    pub fn push_tab(&mut self, tab: Tab) {
        self.tabs.push(tab);
    }

    /// Append a tab and make it active
    pub fn push_and_activate(&mut self, tab: Tab) {
        self.active_tab_id = Some(tab.id.clone());
        self.tabs.push(tab);
    }

    /// Activate `tab_id` if it is open
    pub fn select(&mut self, tab_id: &str) -> bool {
        if self.tab(tab_id).is_none() {
            return false;
        }
        self.active_tab_id = Some(tab_id.to_string());
        true
    }

    /// Remove a tab, keeping the active pointer valid and recording its path.
    ///
    /// When the active tab goes away, the tab that slides into its index
    /// becomes active, or the new last tab if it was at the end.
    pub fn remove_tab(&mut self, tab_id: &str) -> Option<ClosedTab> {
        let index = self.position(tab_id)?;
        let tab = self.tabs.remove(index);

        if self.active_tab_id.as_deref() == Some(tab_id) {
            self.active_tab_id = if self.tabs.is_empty() {
                None
            } else {
                let next = index.min(self.tabs.len() - 1);
                Some(self.tabs[next].id.clone())
            };
        }

        let recent_changed = match tab.path.as_deref() {
            Some(path) => self.recently_closed.record(path),
            None => false,
        };

        Some(ClosedTab {
            tab,
            recent_changed,
        })
    }

    pub fn restore_recently_closed(&mut self, recent: RecentlyClosed) {
        self.recently_closed = recent;
    }

    /// Move the tab at `old_index` so it ends up at `new_index`.
    ///
    /// Both indices must address an existing tab; otherwise nothing changes.
    pub fn move_tab(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        let len = self.tabs.len();
        for index in [old_index, new_index] {
            if index >= len {
                return Err(SessionError::IndexOutOfRange { index, len });
            }
        }

        let tab = self.tabs.remove(old_index);
        self.tabs.insert(new_index, tab);
        Ok(())
    }
}

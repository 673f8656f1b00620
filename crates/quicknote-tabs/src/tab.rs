//! Tab data structure
//!
//! A tab is created either empty (new note) or from a file that was just
//! read from disk. Every edit bumps `revision`, which lets a save that
//! started before the edit avoid clearing the dirty flag after it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::naming::file_name_from_path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Backing file, `None` until first saved
    pub path: Option<String>,
    /// Full text buffer
    pub content: String,
    /// Last known cursor offset, `None` when unknown
    pub cursor_pos: Option<usize>,
    /// Dirty flag
    pub is_unsaved: bool,
    /// Bumped on every change that makes the tab dirty
    #[serde(default)]
    pub revision: u64,
    /// When the tab was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Tab {
    /// An empty, clean, unsaved-to-disk tab.
    pub fn untitled(name: String) -> Self {
        Self::build(name, None, String::new(), Some(0))
    }

    /// A clean tab holding a file's content. The cursor position is unknown.
    pub fn from_file(path: String, content: String) -> Self {
        let name = file_name_from_path(&path);
        Self::build(name, Some(path), content, None)
    }

    fn build(name: String, path: Option<String>, content: String, cursor_pos: Option<usize>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            path,
            content,
            cursor_pos,
            is_unsaved: false,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the buffer and mark the tab dirty
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.touch_dirty();
    }

    pub fn set_cursor_pos(&mut self, pos: usize) {
        self.cursor_pos = Some(pos);
    }

    /// Rename to the trimmed `name`. Blank names are ignored.
    ///
    /// A rename counts as an unsaved change.
    pub fn rename(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }

        self.name = trimmed.to_string();
        self.touch_dirty();
        true
    }

    /// Point the tab at a new backing file and take its file name.
    pub fn attach_path(&mut self, path: String) {
        self.name = file_name_from_path(&path);
        self.path = Some(path);
        self.updated_at = Utc::now();
    }

    /// Clear the dirty flag if nothing changed since `revision` was observed.
    ///
    /// Returns whether the tab is now clean.
    pub fn mark_saved(&mut self, revision: u64) -> bool {
        if self.revision == revision {
            self.is_unsaved = false;
            self.updated_at = Utc::now();
        }
        !self.is_unsaved
    }

    fn touch_dirty(&mut self) {
        self.is_unsaved = true;
        self.revision += 1;
        self.updated_at = Utc::now();
    }
}

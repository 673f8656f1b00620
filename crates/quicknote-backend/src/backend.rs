//! Capability traits consumed by the session core

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A file read from the backing store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    pub path: String,
    pub content: String,
}

/// Result of a save-as request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveAsOutcome {
    /// Written to a file the user picked
    Saved(String),
    /// Handed to the user as a download; there is no path to remember
    Downloaded,
    /// The user dismissed the dialog
    Cancelled,
}

/// Answer to "this tab has unsaved changes"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscardChoice {
    Save,
    Discard,
    Cancel,
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Multi-select open dialog. `None` when cancelled or nothing was readable.
    async fn open_file(&self) -> Result<Option<Vec<FilePayload>>>;

    async fn open_specific_file(&self, path: &str) -> Result<Option<FilePayload>>;

    /// Overwrite `path` with `content`
    async fn save_file(&self, path: &str, content: &str) -> Result<()>;

    async fn save_file_as(
        &self,
        content: &str,
        default_format: &str,
        default_name: &str,
    ) -> Result<SaveAsOutcome>;

    /// Show and focus the host window
    async fn show_window(&self) -> Result<()>;

    async fn hide_window(&self) -> Result<()>;

    async fn update_tray_menu(&self, recent_files: Vec<String>) -> Result<()>;

    /// Directory picker for the default save location
    async fn select_directory(&self) -> Result<Option<String>>;
}

#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm_discard(&self, tab_name: &str) -> DiscardChoice;
}

//! Browser-hosted backend
//!
//! Used when there is no native host at all. Files cannot be opened,
//! "save as" becomes a download, window and tray calls do nothing, and the
//! unsaved-changes prompt is a plain yes/no confirm.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use quicknote_settings::{AppSettings, SettingsPersistence, ShortcutAction};

use crate::backend::{Backend, ConfirmPrompt, DiscardChoice, FilePayload, SaveAsOutcome};
use crate::Result;

pub const FILE_OPERATIONS_UNAVAILABLE: &str = "File operations are not available in the web version. Please download the desktop app for full functionality.";

const FALLBACK_DOWNLOAD_NAME: &str = "untitled.txt";

/// Page-level facilities a browser offers
#[async_trait]
pub trait BrowserHost: Send + Sync {
    async fn alert(&self, message: &str);

    async fn confirm(&self, message: &str) -> bool;

    /// Offer `content` to the user as a file download
    async fn download(&self, file_name: &str, content: &str) -> Result<()>;
}

pub struct BrowserBackend {
    host: Arc<dyn BrowserHost>,
    /// Settings only live as long as the page
    settings: RwLock<AppSettings>,
}

impl BrowserBackend {
    pub fn new(host: Arc<dyn BrowserHost>) -> Self {
        Self {
            host,
            settings: RwLock::new(AppSettings::default()),
        }
    }
}

#[async_trait]
impl Backend for BrowserBackend {
    async fn open_file(&self) -> Result<Option<Vec<FilePayload>>> {
        self.host.alert(FILE_OPERATIONS_UNAVAILABLE).await;
        Ok(None)
    }

    async fn open_specific_file(&self, _path: &str) -> Result<Option<FilePayload>> {
        self.host.alert(FILE_OPERATIONS_UNAVAILABLE).await;
        Ok(None)
    }

    async fn save_file(&self, path: &str, _content: &str) -> Result<()> {
        // Browser tabs never acquire a path, so there is nothing to write.
        tracing::debug!(path = %path, "Ignoring in-place save in browser mode");
        Ok(())
    }

    async fn save_file_as(
        &self,
        content: &str,
        _default_format: &str,
        default_name: &str,
    ) -> Result<SaveAsOutcome> {
        let file_name = if default_name.is_empty() {
            FALLBACK_DOWNLOAD_NAME
        } else {
            default_name
        };

        self.host.download(file_name, content).await?;
        Ok(SaveAsOutcome::Downloaded)
    }

    async fn show_window(&self) -> Result<()> {
        Ok(())
    }

    async fn hide_window(&self) -> Result<()> {
        Ok(())
    }

    async fn update_tray_menu(&self, _recent_files: Vec<String>) -> Result<()> {
        Ok(())
    }

    async fn select_directory(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

#[async_trait]
impl SettingsPersistence for BrowserBackend {
    async fn load_settings(&self) -> quicknote_settings::Result<AppSettings> {
        Ok(self.settings.read().clone())
    }

    async fn save_settings(&self, settings: &AppSettings) -> quicknote_settings::Result<()> {
        *self.settings.write() = settings.clone();
        Ok(())
    }

    async fn update_shortcut(
        &self,
        _action: ShortcutAction,
        _accelerator: &str,
    ) -> quicknote_settings::Result<()> {
        Ok(())
    }
}

/// Two-way prompt: OK saves, Cancel discards. There is no way to keep the tab open.
pub struct BrowserConfirm {
    host: Arc<dyn BrowserHost>,
}

impl BrowserConfirm {
    pub fn new(host: Arc<dyn BrowserHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl ConfirmPrompt for BrowserConfirm {
    async fn confirm_discard(&self, tab_name: &str) -> DiscardChoice {
        let message = format!("\"{}\" has unsaved changes. Do you want to save?", tab_name);
        if self.host.confirm(&message).await {
            DiscardChoice::Save
        } else {
            DiscardChoice::Discard
        }
    }
}

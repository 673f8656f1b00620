//! Native backend
//!
//! File contents go straight to disk with `tokio::fs`; settings and the
//! tray's recent-file list live in SQLite. Everything that needs a real
//! windowing toolkit (dialogs, window visibility, tray, global shortcuts) is
//! delegated to a [`NativeShell`] supplied by the host application.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

use quicknote_settings::{AppSettings, SettingsError, SettingsPersistence, ShortcutAction};
use quicknote_storage::Database;

use crate::backend::{Backend, ConfirmPrompt, DiscardChoice, FilePayload, SaveAsOutcome};
use crate::error::BackendError;
use crate::event::BackendEvent;
use crate::filters::{open_filters, save_filters, FileFilter};
use crate::tray::{resolve_tray_click, TrayAction, TrayMenu};
use crate::Result;

const SETTINGS_KEY: &str = "app_settings";
const RECENT_FILES_KEY: &str = "recent_files";

/// Toolkit-specific pieces of the native host
#[async_trait]
pub trait NativeShell: Send + Sync {
    async fn pick_files(&self, filters: &[FileFilter]) -> Option<Vec<PathBuf>>;

    async fn pick_save_path(&self, default_name: &str, filters: &[FileFilter]) -> Option<PathBuf>;

    async fn pick_directory(&self, title: &str) -> Option<PathBuf>;

    /// Three-way save / don't save / cancel dialog
    async fn ask_unsaved_changes(&self, tab_name: &str) -> DiscardChoice;

    fn show_window(&self) -> Result<()>;

    fn hide_window(&self) -> Result<()>;

    fn focus_window(&self) -> Result<()>;

    fn is_window_visible(&self) -> bool;

    fn set_tray_menu(&self, menu: TrayMenu) -> Result<()>;

    fn register_shortcut(&self, action: ShortcutAction, accelerator: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct NativeBackend {
    db: Database,
    shell: Arc<dyn NativeShell>,
}

impl NativeBackend {
    pub fn new(db: Database, shell: Arc<dyn NativeShell>) -> Self {
        Self { db, shell }
    }

    /// Recent files the tray menu was last built from
    pub fn recent_files(&self) -> Result<Vec<String>> {
        Ok(self.db.get_json(RECENT_FILES_KEY)?.unwrap_or_default())
    }

    /// Handle a tray click. Window toggling and quitting are handled here;
    /// anything the session must act on is returned as an event.
    pub fn handle_tray_click(&self, item_id: &str) -> Result<Option<BackendEvent>> {
        let recent = self.recent_files()?;

        match resolve_tray_click(item_id, &recent) {
            Some(TrayAction::ToggleWindow) => {
                self.toggle_window()?;
                Ok(None)
            }
            Some(TrayAction::Quit) => Ok(Some(BackendEvent::QuitRequested)),
            Some(TrayAction::Emit(event)) => Ok(Some(event)),
            None => Ok(None),
        }
    }

    /// Handle a fired global shortcut. The window is brought forward before
    /// the session hears about it.
    pub fn handle_shortcut(&self, action: ShortcutAction) -> Result<Option<BackendEvent>> {
        match BackendEvent::from_shortcut(action) {
            Some(event) => {
                self.shell.show_window()?;
                self.shell.focus_window()?;
                Ok(Some(event))
            }
            None => {
                self.toggle_window()?;
                Ok(None)
            }
        }
    }

    fn toggle_window(&self) -> Result<()> {
        if self.shell.is_window_visible() {
            self.shell.hide_window()
        } else {
            self.shell.show_window()?;
            self.shell.focus_window()
        }
    }
}

#[async_trait]
impl Backend for NativeBackend {
    async fn open_file(&self) -> Result<Option<Vec<FilePayload>>> {
        let Some(paths) = self.shell.pick_files(&open_filters()).await else {
            return Ok(None);
        };

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match fs::read_to_string(&path).await {
                Ok(content) => files.push(FilePayload {
                    path: path.to_string_lossy().to_string(),
                    content,
                }),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Failed to read file: {}", e);
                }
            }
        }

        if files.is_empty() {
            Ok(None)
        } else {
            Ok(Some(files))
        }
    }

    async fn open_specific_file(&self, path: &str) -> Result<Option<FilePayload>> {
        if !fs::try_exists(path).await? {
            return Err(BackendError::NotFound(path.to_string()));
        }

        let content = fs::read_to_string(path).await?;
        Ok(Some(FilePayload {
            path: path.to_string(),
            content,
        }))
    }

    async fn save_file(&self, path: &str, content: &str) -> Result<()> {
        fs::write(path, content).await?;
        tracing::debug!(path = %path, bytes = content.len(), "Saved file");
        Ok(())
    }

    async fn save_file_as(
        &self,
        content: &str,
        default_format: &str,
        default_name: &str,
    ) -> Result<SaveAsOutcome> {
        let filters = save_filters(default_format);
        let Some(path) = self.shell.pick_save_path(default_name, &filters).await else {
            return Ok(SaveAsOutcome::Cancelled);
        };

        fs::write(&path, content).await?;
        Ok(SaveAsOutcome::Saved(path.to_string_lossy().to_string()))
    }

    async fn show_window(&self) -> Result<()> {
        self.shell.show_window()?;
        self.shell.focus_window()
    }

    async fn hide_window(&self) -> Result<()> {
        self.shell.hide_window()
    }

    async fn update_tray_menu(&self, recent_files: Vec<String>) -> Result<()> {
        self.db.set_json(RECENT_FILES_KEY, &recent_files)?;
        self.shell
            .set_tray_menu(TrayMenu::with_recent_files(&recent_files))
    }

    async fn select_directory(&self) -> Result<Option<String>> {
        Ok(self
            .shell
            .pick_directory("Select Default Directory")
            .await
            .map(|path| path.to_string_lossy().to_string()))
    }
}

#[async_trait]
impl SettingsPersistence for NativeBackend {
    async fn load_settings(&self) -> quicknote_settings::Result<AppSettings> {
        match self.db.get_json::<AppSettings>(SETTINGS_KEY) {
            Ok(Some(settings)) => Ok(settings),
            Ok(None) => Ok(AppSettings::default()),
            Err(e) => Err(SettingsError::Load(e.to_string())),
        }
    }

    async fn save_settings(&self, settings: &AppSettings) -> quicknote_settings::Result<()> {
        self.db
            .set_json(SETTINGS_KEY, settings)
            .map_err(|e| SettingsError::Save(e.to_string()))
    }

    async fn update_shortcut(
        &self,
        action: ShortcutAction,
        accelerator: &str,
    ) -> quicknote_settings::Result<()> {
        self.shell
            .register_shortcut(action, accelerator)
            .map_err(|e| SettingsError::Shortcut {
                action,
                accelerator: accelerator.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(action = %action, accelerator = %accelerator, "Registered shortcut");
        Ok(())
    }
}

/// Unsaved-changes prompt backed by the native three-way dialog
pub struct NativeConfirm {
    shell: Arc<dyn NativeShell>,
}

impl NativeConfirm {
    pub fn new(shell: Arc<dyn NativeShell>) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl ConfirmPrompt for NativeConfirm {
    async fn confirm_discard(&self, tab_name: &str) -> DiscardChoice {
        self.shell.ask_unsaved_changes(tab_name).await
    }
}

//! Settings store
//!
//! Holds the live settings for the running app and talks to whichever
//! backend persists them.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::debounce::Debouncer;
use crate::settings::{AppSettings, ShortcutAction, Theme};
use crate::Result;

/// Quiet period before a theme change is written out
pub const THEME_SAVE_DELAY: Duration = Duration::from_millis(300);

/// Where settings live between runs.
#[async_trait]
pub trait SettingsPersistence: Send + Sync {
    async fn load_settings(&self) -> Result<AppSettings>;

    async fn save_settings(&self, settings: &AppSettings) -> Result<()>;

    /// (Re-)register a global shortcut
    async fn update_shortcut(&self, action: ShortcutAction, accelerator: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct SettingsStore {
    settings: Arc<RwLock<AppSettings>>,
    load_error: Arc<AtomicBool>,
    persistence: Arc<dyn SettingsPersistence>,
    theme_saver: Arc<Debouncer>,
}

impl SettingsStore {
    pub fn new(persistence: Arc<dyn SettingsPersistence>) -> Self {
        Self::with_theme_delay(persistence, THEME_SAVE_DELAY)
    }

    pub fn with_theme_delay(persistence: Arc<dyn SettingsPersistence>, delay: Duration) -> Self {
        Self {
            settings: Arc::new(RwLock::new(AppSettings::default())),
            load_error: Arc::new(AtomicBool::new(false)),
            persistence,
            theme_saver: Arc::new(Debouncer::new(delay)),
        }
    }

    /// Load persisted settings. On failure the defaults stay in place and
    /// `load_error()` reports it.
    pub async fn initialize(&self) {
        match self.persistence.load_settings().await {
            Ok(settings) => {
                tracing::info!(
                    theme = settings.theme.as_str(),
                    language = %settings.language,
                    "Loaded settings"
                );
                *self.settings.write() = settings;
                self.load_error.store(false, Ordering::SeqCst);
            }
            Err(e) => {
                tracing::error!("Failed to load settings: {}", e);
                self.load_error.store(true, Ordering::SeqCst);
            }
        }
    }

    pub fn load_error(&self) -> bool {
        self.load_error.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> AppSettings {
        self.settings.read().clone()
    }

    pub fn theme(&self) -> Theme {
        self.settings.read().theme
    }

    pub fn language(&self) -> String {
        self.settings.read().language.clone()
    }

    pub fn default_format(&self) -> String {
        self.settings.read().default_format.clone()
    }

    /// Apply a theme now and persist it once changes settle.
    ///
    /// Save failures are logged, never returned.
    pub fn set_theme(&self, theme: Theme) {
        self.settings.write().theme = theme;

        let settings = Arc::clone(&self.settings);
        let persistence = Arc::clone(&self.persistence);
        self.theme_saver.call(move || async move {
            let snapshot = settings.read().clone();
            if let Err(e) = persistence.save_settings(&snapshot).await {
                tracing::error!("Failed to save settings: {}", e);
            }
        });
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = self.theme().toggled();
        self.set_theme(theme);
        theme
    }

    /// Change settings in memory only; call `save_all_settings` to persist.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut AppSettings),
    {
        f(&mut *self.settings.write());
    }

    /// Persist everything and re-register every global shortcut.
    ///
    /// Unlike theme saves, failures here are returned to the caller.
    pub async fn save_all_settings(&self) -> Result<()> {
        let snapshot = self.snapshot();

        let result = self.persist_all(&snapshot).await;
        if let Err(e) = &result {
            tracing::error!("Failed to save all settings: {}", e);
        }
        result
    }

    async fn persist_all(&self, snapshot: &AppSettings) -> Result<()> {
        self.theme_saver.cancel();
        self.persistence.save_settings(snapshot).await?;

        for action in ShortcutAction::ALL {
            self.persistence
                .update_shortcut(action, snapshot.shortcut(action))
                .await?;
        }

        tracing::info!("Saved all settings");
        Ok(())
    }

    /// Restore defaults and save them.
    pub async fn reset_settings(&self) -> Result<()> {
        *self.settings.write() = AppSettings::default();
        self.save_all_settings().await
    }
}

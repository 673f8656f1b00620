//! Application state container
//!
//! One `App` exists per running process. It is built once for either the
//! native or the browser environment and the choice never changes after.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use quicknote_backend::{
    Backend, BackendEvent, BrowserBackend, BrowserConfirm, BrowserHost, ConfirmPrompt,
    NativeBackend, NativeConfirm, NativeShell,
};
use quicknote_session::SessionManager;
use quicknote_settings::{SettingsPersistence, SettingsStore, ShortcutAction};
use quicknote_storage::Database;

use crate::config::Config;
use crate::Result;

pub struct App {
    session: SessionManager,
    settings: SettingsStore,
    backend: Arc<dyn Backend>,
    /// Set only in the native environment
    native: Option<NativeBackend>,
    events: mpsc::UnboundedSender<BackendEvent>,
    listener: JoinHandle<()>,
}

impl App {
    /// Start the desktop app: settings and tray state live in SQLite under
    /// the configured data directory.
    pub async fn native(config: &Config, shell: Arc<dyn NativeShell>) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let db = Database::open(&config.database_path)?;

        let native = NativeBackend::new(db, Arc::clone(&shell));
        let backend = Arc::new(native.clone());
        let confirm = Arc::new(NativeConfirm::new(shell));

        let app = Self::start(backend.clone(), backend, confirm, Some(native)).await?;
        app.register_shortcuts().await;
        app.restore_tray().await;
        Ok(app)
    }

    /// Start without a native host
    pub async fn browser(host: Arc<dyn BrowserHost>) -> Result<Self> {
        let backend = Arc::new(BrowserBackend::new(Arc::clone(&host)));
        let confirm = Arc::new(BrowserConfirm::new(host));

        Self::start(backend.clone(), backend, confirm, None).await
    }

    async fn start(
        backend: Arc<dyn Backend>,
        persistence: Arc<dyn SettingsPersistence>,
        confirm: Arc<dyn ConfirmPrompt>,
        native: Option<NativeBackend>,
    ) -> Result<Self> {
        let settings = SettingsStore::new(persistence);
        settings.initialize().await;

        // The first tab's name depends on the loaded language.
        let session = SessionManager::new(Arc::clone(&backend), confirm, settings.clone());

        let (events, receiver) = mpsc::unbounded_channel();
        let listener = session.listen(receiver)?;

        tracing::info!(
            native = native.is_some(),
            theme = settings.theme().as_str(),
            "QuickNote started"
        );

        Ok(Self {
            session,
            settings,
            backend,
            native,
            events,
            listener,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn is_native(&self) -> bool {
        self.native.is_some()
    }

    /// Sender for host events; hand this to menu, drop and IPC handlers.
    pub fn events(&self) -> mpsc::UnboundedSender<BackendEvent> {
        self.events.clone()
    }

    /// Queue an event for the session. Returns false once the listener stopped.
    pub fn emit(&self, event: BackendEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// Forward a tray click. Ignored in the browser environment.
    pub fn tray_clicked(&self, item_id: &str) -> Result<()> {
        let Some(native) = &self.native else {
            return Ok(());
        };

        if let Some(event) = native.handle_tray_click(item_id)? {
            self.emit(event);
        }
        Ok(())
    }

    /// Forward a fired global shortcut. Ignored in the browser environment.
    pub fn shortcut_fired(&self, action: ShortcutAction) -> Result<()> {
        let Some(native) = &self.native else {
            return Ok(());
        };

        if let Some(event) = native.handle_shortcut(action)? {
            self.emit(event);
        }
        Ok(())
    }

    /// Ask for a directory and make it the default save location.
    ///
    /// Only changes settings in memory; `save_all_settings` persists it.
    pub async fn choose_default_path(&self) -> Result<Option<String>> {
        let Some(dir) = self.backend.select_directory().await? else {
            return Ok(None);
        };

        tracing::info!(path = %dir, "Selected default directory");
        self.settings
            .update(|settings| settings.default_path = Some(dir.clone()));
        Ok(Some(dir))
    }

    /// Stop the event listener and wait for the event in progress to finish.
    pub async fn shutdown(self) -> Result<()> {
        // The listener may already have stopped on a quit from the tray.
        let _ = self.events.send(BackendEvent::QuitRequested);
        self.listener.await?;

        tracing::info!("QuickNote stopped");
        Ok(())
    }

    async fn register_shortcuts(&self) {
        let Some(native) = &self.native else {
            return;
        };

        let settings = self.settings.snapshot();
        for action in ShortcutAction::ALL {
            if let Err(e) = native
                .update_shortcut(action, settings.shortcut(action))
                .await
            {
                tracing::warn!(action = %action, "Failed to register shortcut: {}", e);
            }
        }
    }

    /// Carry the previous run's recently-closed files over, then build the tray.
    async fn restore_tray(&self) {
        let Some(native) = &self.native else {
            return;
        };

        match native.recent_files() {
            Ok(paths) => self.session.restore_recently_closed(paths),
            Err(e) => tracing::warn!("Failed to load recent files: {}", e),
        }
        self.session.sync_tray().await;
    }
}

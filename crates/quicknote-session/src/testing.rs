//! In-memory collaborators for session tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};

use quicknote_backend::{
    Backend, BackendError, ConfirmPrompt, DiscardChoice, FilePayload, SaveAsOutcome,
};
use quicknote_settings::{AppSettings, SettingsPersistence, SettingsStore, ShortcutAction};

use crate::SessionManager;

type BackendResult<T> = quicknote_backend::Result<T>;

pub(crate) struct MockBackend {
    files: Mutex<HashMap<String, String>>,
    open_dialog: Mutex<Option<Vec<FilePayload>>>,
    save_as: Mutex<SaveAsOutcome>,
    save_gate: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
    pub fail_saves: AtomicBool,
    pub reads: AtomicUsize,
    pub saves: Mutex<Vec<(String, String)>>,
    pub save_as_calls: Mutex<Vec<(String, String, String)>>,
    pub shown: AtomicUsize,
    pub hidden: AtomicUsize,
    /// Make tray updates take a while, earlier ones longest
    pub slow_tray: AtomicBool,
    tray_calls: AtomicU64,
    pub last_tray: Mutex<Option<Vec<String>>>,
    tray: mpsc::UnboundedSender<Vec<String>>,
}

impl MockBackend {
    fn new(tray: mpsc::UnboundedSender<Vec<String>>) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            open_dialog: Mutex::new(None),
            save_as: Mutex::new(SaveAsOutcome::Cancelled),
            save_gate: Mutex::new(None),
            fail_saves: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            saves: Mutex::new(Vec::new()),
            save_as_calls: Mutex::new(Vec::new()),
            shown: AtomicUsize::new(0),
            hidden: AtomicUsize::new(0),
            slow_tray: AtomicBool::new(false),
            tray_calls: AtomicU64::new(0),
            last_tray: Mutex::new(None),
            tray,
        }
    }

    pub fn add_file(&self, path: &str, content: &str) {
        self.files
            .lock()
            .insert(path.to_string(), content.to_string());
    }

    pub fn answer_open_dialog(&self, files: Option<Vec<FilePayload>>) {
        *self.open_dialog.lock() = files;
    }

    pub fn answer_save_as(&self, outcome: SaveAsOutcome) {
        *self.save_as.lock() = outcome;
    }

    /// Make in-place saves wait. The first notify fires when a save starts;
    /// notify the second to let it finish.
    pub fn gate_saves(&self) -> (Arc<Notify>, Arc<Notify>) {
        let gate = (Arc::new(Notify::new()), Arc::new(Notify::new()));
        *self.save_gate.lock() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn open_file(&self) -> BackendResult<Option<Vec<FilePayload>>> {
        Ok(self.open_dialog.lock().clone())
    }

    async fn open_specific_file(&self, path: &str) -> BackendResult<Option<FilePayload>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.files.lock().get(path) {
            Some(content) => Ok(Some(FilePayload {
                path: path.to_string(),
                content: content.clone(),
            })),
            None => Err(BackendError::NotFound(path.to_string())),
        }
    }

    async fn save_file(&self, path: &str, content: &str) -> BackendResult<()> {
        let gate = self.save_gate.lock().clone();
        if let Some((started, release)) = gate {
            started.notify_one();
            release.notified().await;
        }

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(BackendError::Shell("disk full".to_string()));
        }
        self.saves
            .lock()
            .push((path.to_string(), content.to_string()));
        Ok(())
    }

    async fn save_file_as(
        &self,
        content: &str,
        default_format: &str,
        default_name: &str,
    ) -> BackendResult<SaveAsOutcome> {
        self.save_as_calls.lock().push((
            content.to_string(),
            default_format.to_string(),
            default_name.to_string(),
        ));
        Ok(self.save_as.lock().clone())
    }

    async fn show_window(&self) -> BackendResult<()> {
        self.shown.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn hide_window(&self) -> BackendResult<()> {
        self.hidden.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_tray_menu(&self, recent_files: Vec<String>) -> BackendResult<()> {
        let call = self.tray_calls.fetch_add(1, Ordering::SeqCst);
        if self.slow_tray.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_micros(2_000 / (call + 1))).await;
        }

        *self.last_tray.lock() = Some(recent_files.clone());
        let _ = self.tray.send(recent_files);
        Ok(())
    }

    async fn select_directory(&self) -> BackendResult<Option<String>> {
        Ok(None)
    }
}

pub(crate) struct MockConfirm {
    choice: Mutex<DiscardChoice>,
    pub asked: Mutex<Vec<String>>,
}

impl MockConfirm {
    pub fn answer(&self, choice: DiscardChoice) {
        *self.choice.lock() = choice;
    }
}

#[async_trait]
impl ConfirmPrompt for MockConfirm {
    async fn confirm_discard(&self, tab_name: &str) -> DiscardChoice {
        self.asked.lock().push(tab_name.to_string());
        *self.choice.lock()
    }
}

#[derive(Default)]
struct MemorySettings {
    settings: Mutex<AppSettings>,
}

#[async_trait]
impl SettingsPersistence for MemorySettings {
    async fn load_settings(&self) -> quicknote_settings::Result<AppSettings> {
        Ok(self.settings.lock().clone())
    }

    async fn save_settings(&self, settings: &AppSettings) -> quicknote_settings::Result<()> {
        *self.settings.lock() = settings.clone();
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

pub(crate) struct Harness {
    pub session: SessionManager,
    pub backend: Arc<MockBackend>,
    pub confirm: Arc<MockConfirm>,
    pub tray: mpsc::UnboundedReceiver<Vec<String>>,
}

pub(crate) fn harness() -> Harness {
    build(SettingsStore::new(Arc::new(MemorySettings::default())))
}

pub(crate) async fn harness_with_settings(settings: AppSettings) -> Harness {
    let persistence = MemorySettings {
        settings: Mutex::new(settings),
    };
    let store = SettingsStore::new(Arc::new(persistence));
    store.initialize().await;
    build(store)
}

fn build(settings: SettingsStore) -> Harness {
    let (tray_tx, tray) = mpsc::unbounded_channel();
    let backend = Arc::new(MockBackend::new(tray_tx));
    let confirm = Arc::new(MockConfirm {
        choice: Mutex::new(DiscardChoice::Discard),
        asked: Mutex::new(Vec::new()),
    });

    let session = SessionManager::new(backend.clone(), confirm.clone(), settings);

    Harness {
        session,
        backend,
        confirm,
        tray,
    }
}

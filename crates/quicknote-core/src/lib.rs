//! QuickNote Core
//!
//! Assembles the app for one host environment and exposes the pieces a UI
//! layer talks to. The session owns every tab; the UI only renders it.

mod app;
mod config;
mod error;

pub use app::App;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use quicknote_backend::{
    Backend, BackendError, BackendEvent, BrowserBackend, BrowserConfirm, BrowserHost,
    ConfirmPrompt, DiscardChoice, FilePayload, MenuCommand, NativeBackend, NativeConfirm,
    NativeShell, SaveAsOutcome, TrayMenu,
};
pub use quicknote_session::{CloseOutcome, Session, SessionError, SessionManager};
pub use quicknote_settings::{AppSettings, SettingsError, SettingsStore, ShortcutAction, Theme};
pub use quicknote_storage::{Database, StorageError};
pub use quicknote_tabs::Tab;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}

//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] quicknote_storage::StorageError),

    #[error("Backend error: {0}")]
    Backend(#[from] quicknote_backend::BackendError),

    #[error("Session error: {0}")]
    Session(#[from] quicknote_session::SessionError),

    #[error("Settings error: {0}")]
    Settings(#[from] quicknote_settings::SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event listener failed: {0}")]
    Listener(#[from] tokio::task::JoinError),
}

//! Settings error types

use thiserror::Error;

use crate::settings::ShortcutAction;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(String),

    #[error("Failed to save settings: {0}")]
    Save(String),

    #[error("Failed to register {action} shortcut '{accelerator}': {reason}")]
    Shortcut {
        action: ShortcutAction,
        accelerator: String,
        reason: String,
    },
}

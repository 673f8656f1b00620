//! QuickNote Settings
//!
//! - `AppSettings` is the persisted record shared with the backend
//! - `SettingsStore` is the in-memory copy the rest of the app reads from
//! - Theme changes are persisted through a trailing-edge `Debouncer`
//! - `save_all_settings` is the one persistence path that reports failure to its caller

mod debounce;
mod error;
mod settings;
mod store;

pub use debounce::Debouncer;
pub use error::SettingsError;
pub use settings::{AppSettings, ShortcutAction, Theme};
pub use store::{SettingsPersistence, SettingsStore, THEME_SAVE_DELAY};

pub type Result<T> = std::result::Result<T, SettingsError>;

//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "QuickNote";
const DATABASE_FILE: &str = "quicknote.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding everything the native app persists
    pub data_dir: PathBuf,
    /// Settings and tray state database
    pub database_path: PathBuf,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join(DATABASE_FILE),
            data_dir,
        }
    }

    /// Per-user data directory, falling back to a local dot-directory
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".quicknote"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::default_data_dir())
    }
}

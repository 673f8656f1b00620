//! QuickNote Storage Layer
//!
//! SQLite-backed key/value persistence for application settings and the
//! tray's recent-file list.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

//! Backend error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] quicknote_storage::StorageError),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Native shell error: {0}")]
    Shell(String),
}

//! Session error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Tab index {index} out of range for {len} tabs")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Event listeners are already running")]
    AlreadyListening,
}

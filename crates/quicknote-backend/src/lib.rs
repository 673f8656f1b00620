//! QuickNote Backend
//!
//! Everything the session core needs from the outside world, behind two
//! traits chosen once at startup:
//! - [`Backend`]: file open/save, window visibility, tray refresh
//! - [`ConfirmPrompt`]: the unsaved-changes question
//!
//! [`NativeBackend`] does real file I/O and drives an injected [`NativeShell`]
//! (dialogs, window, tray, global shortcuts). [`BrowserBackend`] is the
//! degraded variant used when no native host exists.

mod backend;
mod browser;
mod error;
mod event;
mod filters;
mod native;
mod tray;

pub use backend::{Backend, ConfirmPrompt, DiscardChoice, FilePayload, SaveAsOutcome};
pub use browser::{BrowserBackend, BrowserConfirm, BrowserHost, FILE_OPERATIONS_UNAVAILABLE};
pub use error::BackendError;
pub use event::{BackendEvent, MenuCommand};
pub use filters::{open_filters, save_filters, FileFilter};
pub use native::{NativeBackend, NativeConfirm, NativeShell};
pub use tray::{resolve_tray_click, TrayAction, TrayEntry, TrayItem, TrayMenu};

pub type Result<T> = std::result::Result<T, BackendError>;

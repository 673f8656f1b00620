//! QuickNote Session Management
//!
//! - A session is the ordered set of open tabs, the active-tab pointer and
//!   the recently-closed history
//! - Every mutation goes through `SessionManager`
//! - Closing a dirty tab asks first; a failed or cancelled save keeps it open
//! - Operations that wait on the backend for a tab are serialized per tab

mod error;
mod guard;
mod manager;
mod session;

#[cfg(test)]
mod testing;

pub use error::SessionError;
pub use manager::{CloseOutcome, SessionManager};
pub use session::{ClosedTab, Session};

pub type Result<T> = std::result::Result<T, SessionError>;

//! QuickNote Tabs
//!
//! A tab is one open in-memory document: its text buffer, backing path,
//! cursor and dirty flag. This crate holds the tab model itself plus the
//! small pieces of policy every session needs: default "Untitled-N" naming
//! and the bounded recently-closed history.

mod naming;
mod recent;
mod tab;

pub use naming::{
    file_name_from_path, next_untitled_number, untitled_name, untitled_prefix, UNTITLED_PREFIXES,
};
pub use recent::{RecentlyClosed, MAX_RECENTLY_CLOSED};
pub use tab::Tab;

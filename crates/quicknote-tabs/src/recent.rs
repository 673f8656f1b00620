//! Recently-closed file history

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const MAX_RECENTLY_CLOSED: usize = 5;

/// Most-recent-first list of backing paths of closed tabs.
///
/// Never holds duplicates and never grows past [`MAX_RECENTLY_CLOSED`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentlyClosed {
    paths: VecDeque<String>,
}

impl RecentlyClosed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `path` to the front, evicting the oldest entry past the cap.
    ///
    /// Returns `false` when the list is unchanged (the path was already first).
    pub fn record(&mut self, path: &str) -> bool {
        if self.paths.front().map(String::as_str) == Some(path) {
            return false;
        }

        self.paths.retain(|existing| existing != path);
        self.paths.push_front(path.to_string());
        self.paths.truncate(MAX_RECENTLY_CLOSED);
        true
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.iter().cloned().collect()
    }

    /// Rebuild from a stored most-recent-first list, dropping repeats and
    /// anything past the cap.
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut recent = Self::new();
        for path in paths.into_iter().rev() {
            recent.record(&path);
        }
        recent
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

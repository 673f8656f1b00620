//! Per-tab operation guard

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Tabs with a backend round-trip in progress
pub(crate) type InFlightSet = Arc<Mutex<HashSet<String>>>;

/// Marks a tab busy until dropped
pub(crate) struct InFlight {
    set: InFlightSet,
    tab_id: String,
}

impl InFlight {
    /// `None` if the tab is already busy
    pub(crate) fn acquire(set: &InFlightSet, tab_id: &str) -> Option<Self> {
        if !set.lock().insert(tab_id.to_string()) {
            return None;
        }

        Some(Self {
            set: Arc::clone(set),
            tab_id: tab_id.to_string(),
        })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.set.lock().remove(&self.tab_id);
    }
}

//! Session Manager
//!
//! Owns the open tabs and drives the save/open protocol against a `Backend`.
//! Lock guards never live across an `.await`; every backend round-trip works
//! on a snapshot of the tab and re-finds it by id afterwards.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

use quicknote_backend::{
    Backend, BackendEvent, ConfirmPrompt, DiscardChoice, MenuCommand, SaveAsOutcome,
};
use quicknote_settings::SettingsStore;
use quicknote_tabs::{next_untitled_number, untitled_name, untitled_prefix, RecentlyClosed, Tab};

use crate::error::SessionError;
use crate::guard::{InFlight, InFlightSet};
use crate::session::Session;
use crate::Result;

/// How a close request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The user kept the tab
    Cancelled,
    /// The user chose to save but the save did not complete
    SaveFailed,
    NotFound,
    /// Another operation on this tab is still running
    Busy,
}

/// Snapshot of what a save needs from a tab
struct PendingSave {
    name: String,
    path: Option<String>,
    content: String,
    revision: u64,
}

pub struct SessionManager {
    state: Arc<RwLock<Session>>,
    backend: Arc<dyn Backend>,
    confirm: Arc<dyn ConfirmPrompt>,
    settings: SettingsStore,
    in_flight: InFlightSet,
    listening: Arc<AtomicBool>,
    /// Last recently-closed list the tray accepted; held while pushing
    tray_published: Arc<AsyncMutex<Option<Vec<String>>>>,
}

impl SessionManager {
    /// Start with a single clean untitled tab, named for the configured language.
    pub fn new(
        backend: Arc<dyn Backend>,
        confirm: Arc<dyn ConfirmPrompt>,
        settings: SettingsStore,
    ) -> Self {
        let prefix = untitled_prefix(&settings.language());
        let mut first = Tab::untitled(untitled_name(prefix, 1));
        first.cursor_pos = None;

        Self {
            state: Arc::new(RwLock::new(Session::new(first))),
            backend,
            confirm,
            settings,
            in_flight: InFlightSet::default(),
            listening: Arc::new(AtomicBool::new(false)),
            tray_published: Arc::new(AsyncMutex::new(None)),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    pub fn tabs(&self) -> Vec<Tab> {
        self.state.read().tabs().to_vec()
    }

    pub fn active_tab_id(&self) -> Option<String> {
        self.state.read().active_tab_id().map(str::to_string)
    }

    pub fn active_tab(&self) -> Option<Tab> {
        self.state.read().active_tab().cloned()
    }

    pub fn get_tab(&self, tab_id: &str) -> Result<Tab> {
        self.state
            .read()
            .tab(tab_id)
            .cloned()
            .ok_or_else(|| SessionError::TabNotFound(tab_id.to_string()))
    }

    pub fn recently_closed(&self) -> Vec<String> {
        self.state.read().recently_closed().paths()
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Replace the recently-closed list with one stored by a previous run.
    ///
    /// The tray is not touched; call `sync_tray` afterwards.
    pub fn restore_recently_closed(&self, paths: Vec<String>) {
        let recent = RecentlyClosed::from_paths(paths);
        tracing::debug!(count = recent.len(), "Restored recently closed files");
        self.state.write().restore_recently_closed(recent);
    }

    /// Push the current recently-closed list to the tray.
    ///
    /// Pushes run one at a time and each reads the list when its turn comes,
    /// so the last one to run always carries the newest list.
    pub async fn sync_tray(&self) {
        let mut published = self.tray_published.lock().await;
        let recent = self.recently_closed();
        if published.as_ref() == Some(&recent) {
            return;
        }

        match self.backend.update_tray_menu(recent.clone()).await {
            Ok(()) => *published = Some(recent),
            Err(e) => tracing::warn!("Failed to update tray menu: {}", e),
        }
    }

    /// Open a new empty tab with the lowest free untitled number and activate it.
    pub async fn create_tab(&self) -> Tab {
        let prefix = untitled_prefix(&self.settings.language());

        let tab = {
            let mut state = self.state.write();
            let number = next_untitled_number(state.tab_names());
            let tab = Tab::untitled(untitled_name(prefix, number));
            state.push_and_activate(tab.clone());
            tab
        };

        tracing::info!(tab_id = %tab.id, tab_name = %tab.name, "Created tab");

        self.reveal_window().await;
        tab
    }

    /// Close a tab, asking first when it has unsaved changes.
    pub async fn close_tab(&self, tab_id: &str) -> CloseOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight, tab_id) else {
            tracing::warn!(tab_id = %tab_id, "Close ignored, tab is busy");
            return CloseOutcome::Busy;
        };

        let Some(tab) = self.find_tab(tab_id) else {
            return CloseOutcome::NotFound;
        };

        if tab.is_unsaved {
            match self.confirm.confirm_discard(&tab.name).await {
                DiscardChoice::Cancel => return CloseOutcome::Cancelled,
                DiscardChoice::Save => {
                    if !self.save_tab(tab_id).await {
                        return CloseOutcome::SaveFailed;
                    }
                }
                DiscardChoice::Discard => {}
            }
        }

        let Some((closed, recent_changed, now_empty)) = self.remove_tab(tab_id) else {
            return CloseOutcome::NotFound;
        };

        tracing::info!(tab_id = %closed.id, tab_name = %closed.name, "Closed tab");

        if recent_changed {
            self.publish_recently_closed();
        }

        if now_empty {
            if let Err(e) = self.backend.hide_window().await {
                tracing::warn!("Failed to hide window: {}", e);
            }
        }

        CloseOutcome::Closed
    }

    /// Activate a tab. Unknown ids are ignored.
    pub fn select_tab(&self, tab_id: &str) -> bool {
        self.state.write().select(tab_id)
    }

    /// Replace the active tab's content. No-op without an active tab.
    pub fn update_tab_content(&self, content: impl Into<String>) {
        if let Some(tab) = self.state.write().active_tab_mut() {
            tab.set_content(content.into());
        }
    }

    pub fn update_cursor_pos(&self, pos: usize) {
        if let Some(tab) = self.state.write().active_tab_mut() {
            tab.set_cursor_pos(pos);
        }
    }

    /// Reorder tabs. Out-of-range indices leave the order untouched.
    pub fn move_tab(&self, old_index: usize, new_index: usize) -> Result<()> {
        self.state.write().move_tab(old_index, new_index)
    }

    /// Rename a tab to the trimmed `new_name`; blank names are ignored.
    pub fn rename_tab(&self, tab_id: &str, new_name: &str) -> bool {
        self.with_tab_mut(tab_id, |tab| tab.rename(new_name))
            .unwrap_or(false)
    }

    /// Show the backend's open dialog and add one tab per file read.
    ///
    /// The last opened tab becomes active.
    pub async fn open_file_from_dialog(&self) -> Vec<Tab> {
        let files = match self.backend.open_file().await {
            Ok(Some(files)) => files,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!("Failed to open files: {}", e);
                return Vec::new();
            }
        };

        let tabs: Vec<Tab> = files
            .into_iter()
            .map(|file| Tab::from_file(file.path, file.content))
            .collect();

        {
            let mut state = self.state.write();
            for tab in &tabs {
                state.push_and_activate(tab.clone());
            }
        }

        tracing::info!(count = tabs.len(), "Opened files from dialog");
        tabs
    }

    /// Open `path`, or activate the tab that already has it open.
    pub async fn open_specific_file(&self, path: &str) -> Option<Tab> {
        if let Some(existing) = self.activate_path(path) {
            self.reveal_window().await;
            return Some(existing);
        }

        let file = match self.backend.open_specific_file(path).await {
            Ok(Some(file)) => file,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(path = %path, "Failed to open file: {}", e);
                return None;
            }
        };

        let tab = {
            let mut state = self.state.write();
            // Another open of the same path may have finished while we read.
            match state.tab_by_path(path).map(|t| t.id.clone()) {
                Some(existing_id) => {
                    state.select(&existing_id);
                    state.tab(&existing_id).cloned()
                }
                None => {
                    let tab = Tab::from_file(file.path, file.content);
                    state.push_and_activate(tab.clone());
                    Some(tab)
                }
            }
        };

        if let Some(tab) = &tab {
            tracing::info!(tab_id = %tab.id, path = %path, "Opened file");
        }

        self.reveal_window().await;
        tab
    }

    /// Save the active tab in place, or via save-as if it has no path.
    pub async fn save_active_file(&self) -> bool {
        let Some(tab_id) = self.active_tab_id() else {
            return false;
        };
        let Some(_guard) = InFlight::acquire(&self.in_flight, &tab_id) else {
            tracing::warn!(tab_id = %tab_id, "Save ignored, tab is busy");
            return false;
        };

        self.save_tab(&tab_id).await
    }

    /// Save the active tab under a new name chosen by the backend.
    pub async fn save_active_file_as(&self) -> bool {
        let Some(tab_id) = self.active_tab_id() else {
            return false;
        };
        let Some(_guard) = InFlight::acquire(&self.in_flight, &tab_id) else {
            tracing::warn!(tab_id = %tab_id, "Save as ignored, tab is busy");
            return false;
        };

        self.save_tab_as(&tab_id).await
    }

    /// Consume host events on a background task until the channel closes or
    /// a quit is requested. Only one listener may run at a time.
    pub fn listen(
        &self,
        mut events: mpsc::UnboundedReceiver<BackendEvent>,
    ) -> Result<JoinHandle<()>> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Err(SessionError::AlreadyListening);
        }

        let session = self.clone();
        Ok(tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if !session.handle_event(event).await {
                    break;
                }
            }
            session.listening.store(false, Ordering::SeqCst);
            tracing::info!("Session event listener stopped");
        }))
    }

    /// Apply one host event. Returns `false` when the host asked to quit.
    pub async fn handle_event(&self, event: BackendEvent) -> bool {
        tracing::debug!(?event, "Handling backend event");

        match event {
            BackendEvent::NewTabRequested | BackendEvent::Menu(MenuCommand::NewNote) => {
                self.create_tab().await;
            }
            BackendEvent::CloseTabRequested | BackendEvent::Menu(MenuCommand::CloseTab) => {
                if let Some(tab_id) = self.active_tab_id() {
                    self.close_tab(&tab_id).await;
                }
            }
            BackendEvent::OpenRecentFile(path) => {
                self.open_specific_file(&path).await;
            }
            BackendEvent::Menu(MenuCommand::OpenFile) => {
                self.open_file_from_dialog().await;
            }
            BackendEvent::Menu(MenuCommand::Save) => {
                self.save_active_file().await;
            }
            BackendEvent::Menu(MenuCommand::SaveAs) => {
                self.save_active_file_as().await;
            }
            BackendEvent::Menu(MenuCommand::ToggleTheme) => {
                self.settings.toggle_theme();
            }
            BackendEvent::FilesDropped(paths) => {
                for path in paths {
                    self.open_specific_file(&path).await;
                }
            }
            BackendEvent::QuitRequested => return false,
        }

        true
    }

    async fn save_tab(&self, tab_id: &str) -> bool {
        let Some(pending) = self.pending_save(tab_id) else {
            return false;
        };
        let Some(path) = pending.path else {
            return self.save_tab_as(tab_id).await;
        };

        if let Err(e) = self.backend.save_file(&path, &pending.content).await {
            tracing::error!(tab_id = %tab_id, path = %path, "Failed to save file: {}", e);
            return false;
        }

        self.with_tab_mut(tab_id, |tab| {
            if !tab.mark_saved(pending.revision) {
                tracing::debug!(tab_id = %tab.id, "Tab edited during save, still unsaved");
            }
        });

        tracing::info!(tab_id = %tab_id, path = %path, "Saved file");
        true
    }

    async fn save_tab_as(&self, tab_id: &str) -> bool {
        let Some(pending) = self.pending_save(tab_id) else {
            return false;
        };
        let default_format = self.settings.default_format();

        let outcome = match self
            .backend
            .save_file_as(&pending.content, &default_format, &pending.name)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(tab_id = %tab_id, "Failed to save file as: {}", e);
                return false;
            }
        };

        match outcome {
            SaveAsOutcome::Saved(path) => {
                tracing::info!(tab_id = %tab_id, path = %path, "Saved file as");
                self.with_tab_mut(tab_id, |tab| {
                    tab.attach_path(path);
                    tab.mark_saved(pending.revision);
                });
                true
            }
            SaveAsOutcome::Downloaded => {
                tracing::info!(tab_id = %tab_id, "Downloaded tab content");
                self.with_tab_mut(tab_id, |tab| {
                    tab.mark_saved(pending.revision);
                });
                true
            }
            SaveAsOutcome::Cancelled => false,
        }
    }

    fn find_tab(&self, tab_id: &str) -> Option<Tab> {
        self.state.read().tab(tab_id).cloned()
    }

    fn pending_save(&self, tab_id: &str) -> Option<PendingSave> {
        self.state.read().tab(tab_id).map(|tab| PendingSave {
            name: tab.name.clone(),
            path: tab.path.clone(),
            content: tab.content.clone(),
            revision: tab.revision,
        })
    }

    fn with_tab_mut<T>(&self, tab_id: &str, f: impl FnOnce(&mut Tab) -> T) -> Option<T> {
        self.state.write().tab_mut(tab_id).map(f)
    }

    fn activate_path(&self, path: &str) -> Option<Tab> {
        let mut state = self.state.write();
        let id = state.tab_by_path(path)?.id.clone();
        state.select(&id);
        state.tab(&id).cloned()
    }

    /// Removes the tab; also reports whether the recently-closed list changed
    /// and whether the session is now empty.
    fn remove_tab(&self, tab_id: &str) -> Option<(Tab, bool, bool)> {
        let mut state = self.state.write();
        let closed = state.remove_tab(tab_id)?;
        Some((closed.tab, closed.recent_changed, state.is_empty()))
    }

    /// Sync the tray on a separate task
    fn publish_recently_closed(&self) {
        let session = self.clone();
        tokio::spawn(async move { session.sync_tray().await });
    }

    async fn reveal_window(&self) {
        if let Err(e) = self.backend.show_window().await {
            tracing::warn!("Failed to show window: {}", e);
        }
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            backend: Arc::clone(&self.backend),
            confirm: Arc::clone(&self.confirm),
            settings: self.settings.clone(),
            in_flight: Arc::clone(&self.in_flight),
            listening: Arc::clone(&self.listening),
            tray_published: Arc::clone(&self.tray_published),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{harness, harness_with_settings, Harness};
    use quicknote_backend::FilePayload;
    use quicknote_settings::{AppSettings, Theme};

    fn file(path: &str, content: &str) -> FilePayload {
        FilePayload {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    fn names(h: &Harness) -> Vec<String> {
        h.session.tabs().into_iter().map(|t| t.name).collect()
    }

    #[tokio::test]
    async fn test_initial_state() {
        let h = harness();
        let tabs = h.session.tabs();

        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].name, "Untitled-1");
        assert_eq!(tabs[0].content, "");
        assert_eq!(tabs[0].path, None);
        assert_eq!(tabs[0].cursor_pos, None);
        assert!(!tabs[0].is_unsaved);
        assert_eq!(h.session.active_tab_id(), Some(tabs[0].id.clone()));
        assert!(h.session.recently_closed().is_empty());
    }

    #[tokio::test]
    async fn test_initial_name_follows_language() {
        let h = harness_with_settings(AppSettings {
            language: "zh-CN".to_string(),
            ..AppSettings::default()
        })
        .await;

        assert_eq!(names(&h), vec!["未命名-1"]);
        assert_eq!(h.session.create_tab().await.name, "未命名-2");
    }

    #[tokio::test]
    async fn test_create_tab_numbers_and_activates() {
        let h = harness();

        let second = h.session.create_tab().await;
        assert_eq!(second.name, "Untitled-2");
        assert_eq!(second.cursor_pos, Some(0));
        assert_eq!(h.session.active_tab_id(), Some(second.id.clone()));
        assert_eq!(h.backend.shown.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_tab_fills_lowest_gap() {
        let h = harness();
        let two = h.session.create_tab().await;
        h.session.create_tab().await;

        assert_eq!(h.session.close_tab(&two.id).await, CloseOutcome::Closed);
        assert_eq!(h.session.create_tab().await.name, "Untitled-2");
        assert_eq!(h.session.create_tab().await.name, "Untitled-4");
    }

    #[tokio::test]
    async fn test_create_tab_ignores_renamed_and_foreign_names() {
        let h = harness();
        let first = h.session.active_tab_id().unwrap();
        h.session.rename_tab(&first, "shopping list");

        assert_eq!(h.session.create_tab().await.name, "Untitled-1");
    }

    #[tokio::test]
    async fn test_select_tab() {
        let h = harness();
        let first = h.session.active_tab_id().unwrap();
        h.session.create_tab().await;

        assert!(h.session.select_tab(&first));
        assert_eq!(h.session.active_tab_id(), Some(first));
        assert!(!h.session.select_tab("missing"));
    }

    #[tokio::test]
    async fn test_update_content_and_cursor() {
        let h = harness();

        h.session.update_tab_content("hello");
        h.session.update_cursor_pos(5);

        let tab = h.session.active_tab().unwrap();
        assert_eq!(tab.content, "hello");
        assert_eq!(tab.cursor_pos, Some(5));
        assert!(tab.is_unsaved);
    }

    #[tokio::test]
    async fn test_cursor_update_does_not_dirty() {
        let h = harness();
        h.session.update_cursor_pos(3);
        assert!(!h.session.active_tab().unwrap().is_unsaved);
    }

    #[tokio::test]
    async fn test_updates_without_active_tab_are_noops() {
        let h = harness();
        let only = h.session.active_tab_id().unwrap();
        h.session.close_tab(&only).await;

        h.session.update_tab_content("lost");
        h.session.update_cursor_pos(1);
        assert!(h.session.tabs().is_empty());
        assert!(!h.session.save_active_file().await);
        assert!(!h.session.save_active_file_as().await);
    }

    #[tokio::test]
    async fn test_move_tab() {
        let h = harness();
        h.session.create_tab().await;
        h.session.create_tab().await;

        h.session.move_tab(0, 2).unwrap();
        assert_eq!(names(&h), vec!["Untitled-2", "Untitled-3", "Untitled-1"]);

        assert_eq!(
            h.session.move_tab(0, 3),
            Err(SessionError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(names(&h), vec!["Untitled-2", "Untitled-3", "Untitled-1"]);
    }

    #[tokio::test]
    async fn test_rename_tab() {
        let h = harness();
        let id = h.session.active_tab_id().unwrap();

        assert!(h.session.rename_tab(&id, "  notes  "));
        let tab = h.session.get_tab(&id).unwrap();
        assert_eq!(tab.name, "notes");
        assert!(tab.is_unsaved);

        assert!(!h.session.rename_tab(&id, "   "));
        assert_eq!(h.session.get_tab(&id).unwrap().name, "notes");
        assert!(!h.session.rename_tab("missing", "x"));
    }

    #[tokio::test]
    async fn test_close_clean_tab_skips_prompt() {
        let h = harness();
        h.session.create_tab().await;
        let id = h.session.active_tab_id().unwrap();

        assert_eq!(h.session.close_tab(&id).await, CloseOutcome::Closed);
        assert!(h.confirm.asked.lock().is_empty());
        assert_eq!(h.session.tabs().len(), 1);
    }

    #[tokio::test]
    async fn test_close_unknown_tab() {
        let h = harness();
        assert_eq!(h.session.close_tab("missing").await, CloseOutcome::NotFound);
        assert_eq!(h.session.tabs().len(), 1);
    }

    #[tokio::test]
    async fn test_close_dirty_cancel_keeps_tab() {
        let h = harness();
        let id = h.session.active_tab_id().unwrap();
        h.session.update_tab_content("draft");
        h.confirm.answer(DiscardChoice::Cancel);

        assert_eq!(h.session.close_tab(&id).await, CloseOutcome::Cancelled);
        assert_eq!(h.confirm.asked.lock().as_slice(), ["Untitled-1"]);
        assert_eq!(h.session.get_tab(&id).unwrap().content, "draft");
    }

    #[tokio::test]
    async fn test_close_dirty_discard_removes_tab() {
        let h = harness();
        let id = h.session.active_tab_id().unwrap();
        h.session.update_tab_content("draft");
        h.confirm.answer(DiscardChoice::Discard);

        assert_eq!(h.session.close_tab(&id).await, CloseOutcome::Closed);
        assert!(h.session.tabs().is_empty());
        assert!(h.backend.saves.lock().is_empty());
    }

    #[tokio::test]
    async fn test_close_dirty_save_writes_closing_tab() {
        let h = harness();
        h.backend.add_file("/notes/a.txt", "a");
        let a = h.session.open_specific_file("/notes/a.txt").await.unwrap();
        h.session.update_tab_content("edited a");
        h.session.create_tab().await;
        h.confirm.answer(DiscardChoice::Save);

        // `a` is not the active tab; the save must still target it.
        assert_eq!(h.session.close_tab(&a.id).await, CloseOutcome::Closed);
        assert_eq!(
            h.backend.saves.lock().as_slice(),
            [("/notes/a.txt".to_string(), "edited a".to_string())]
        );
        assert!(h.session.get_tab(&a.id).is_err());
    }

    #[tokio::test]
    async fn test_close_dirty_save_cancelled_keeps_tab() {
        let h = harness();
        let id = h.session.active_tab_id().unwrap();
        h.session.update_tab_content("draft");
        h.confirm.answer(DiscardChoice::Save);
        h.backend.answer_save_as(SaveAsOutcome::Cancelled);

        assert_eq!(h.session.close_tab(&id).await, CloseOutcome::SaveFailed);
        let tab = h.session.get_tab(&id).unwrap();
        assert!(tab.is_unsaved);
        assert_eq!(tab.content, "draft");
    }

    #[tokio::test]
    async fn test_close_dirty_save_failure_keeps_tab() {
        let h = harness();
        h.backend.add_file("/notes/a.txt", "a");
        let a = h.session.open_specific_file("/notes/a.txt").await.unwrap();
        h.session.update_tab_content("edited");
        h.confirm.answer(DiscardChoice::Save);
        h.backend.fail_saves.store(true, Ordering::SeqCst);

        assert_eq!(h.session.close_tab(&a.id).await, CloseOutcome::SaveFailed);
        assert!(h.session.get_tab(&a.id).unwrap().is_unsaved);
    }

    #[tokio::test]
    async fn test_close_active_selects_neighbour() {
        let h = harness();
        let one = h.session.active_tab_id().unwrap();
        let two = h.session.create_tab().await;
        let three = h.session.create_tab().await;

        h.session.select_tab(&two.id);
        h.session.close_tab(&two.id).await;
        assert_eq!(h.session.active_tab_id(), Some(three.id.clone()));

        h.session.close_tab(&three.id).await;
        assert_eq!(h.session.active_tab_id(), Some(one));
    }

    #[tokio::test]
    async fn test_close_inactive_keeps_active() {
        let h = harness();
        let one = h.session.active_tab_id().unwrap();
        let two = h.session.create_tab().await;

        h.session.close_tab(&one).await;
        assert_eq!(h.session.active_tab_id(), Some(two.id));
    }

    #[tokio::test]
    async fn test_close_last_tab_hides_window() {
        let h = harness();
        let id = h.session.active_tab_id().unwrap();

        h.session.close_tab(&id).await;
        assert!(h.session.tabs().is_empty());
        assert_eq!(h.session.active_tab_id(), None);
        assert_eq!(h.backend.hidden.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recently_closed_tracking() {
        let mut h = harness();
        for name in ["a", "b", "c", "d", "e", "f"] {
            h.backend.add_file(&format!("/n/{name}.txt"), name);
        }

        for name in ["a", "b", "c", "d", "e", "f"] {
            let tab = h
                .session
                .open_specific_file(&format!("/n/{name}.txt"))
                .await
                .unwrap();
            h.session.close_tab(&tab.id).await;
        }

        assert_eq!(
            h.session.recently_closed(),
            vec!["/n/f.txt", "/n/e.txt", "/n/d.txt", "/n/c.txt", "/n/b.txt"]
        );

        let mut latest = h.tray.recv().await.unwrap();
        while let Ok(next) = h.tray.try_recv() {
            latest = next;
        }
        assert_eq!(latest, h.session.recently_closed());
    }

    #[tokio::test]
    async fn test_reclosing_moves_to_front() {
        let mut h = harness();
        h.backend.add_file("/n/a.txt", "a");
        h.backend.add_file("/n/b.txt", "b");

        for path in ["/n/a.txt", "/n/b.txt", "/n/a.txt"] {
            let tab = h.session.open_specific_file(path).await.unwrap();
            h.session.close_tab(&tab.id).await;
        }

        assert_eq!(h.session.recently_closed(), vec!["/n/a.txt", "/n/b.txt"]);

        // Queued pushes collapse into one carrying the newest list.
        assert_eq!(h.tray.recv().await.unwrap(), vec!["/n/a.txt", "/n/b.txt"]);
        tokio::task::yield_now().await;
        assert!(h.tray.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_tray_settles_on_latest_list() {
        let h = harness();
        h.backend.slow_tray.store(true, Ordering::SeqCst);
        for i in 0..30 {
            h.backend.add_file(&format!("/n/{i}.txt"), "x");
        }

        for i in 0..30 {
            let tab = h
                .session
                .open_specific_file(&format!("/n/{i}.txt"))
                .await
                .unwrap();
            h.session.close_tab(&tab.id).await;
        }

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        assert_eq!(
            h.backend.last_tray.lock().clone(),
            Some(h.session.recently_closed())
        );
        assert_eq!(h.session.recently_closed()[0], "/n/29.txt");
    }

    #[tokio::test]
    async fn test_restore_recently_closed() {
        let mut h = harness();
        h.session
            .restore_recently_closed(vec!["/n/b.txt".to_string(), "/n/a.txt".to_string()]);
        assert_eq!(h.session.recently_closed(), vec!["/n/b.txt", "/n/a.txt"]);

        h.session.sync_tray().await;
        h.session.sync_tray().await;
        assert_eq!(h.tray.recv().await.unwrap(), vec!["/n/b.txt", "/n/a.txt"]);
        assert!(h.tray.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_untitled_close_leaves_recent_and_tray_alone() {
        let mut h = harness();
        h.session.create_tab().await;
        let id = h.session.active_tab_id().unwrap();
        h.session.close_tab(&id).await;

        tokio::task::yield_now().await;
        assert!(h.session.recently_closed().is_empty());
        assert!(h.tray.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_open_from_dialog() {
        let h = harness();
        h.backend.answer_open_dialog(Some(vec![
            file("/n/a.md", "alpha"),
            file("C:\\docs\\b.txt", "beta"),
        ]));

        let opened = h.session.open_file_from_dialog().await;
        assert_eq!(opened.len(), 2);
        assert_eq!(names(&h), vec!["Untitled-1", "a.md", "b.txt"]);
        assert_eq!(h.session.active_tab_id(), Some(opened[1].id.clone()));

        let b = &opened[1];
        assert_eq!(b.path.as_deref(), Some("C:\\docs\\b.txt"));
        assert_eq!(b.content, "beta");
        assert_eq!(b.cursor_pos, None);
        assert!(!b.is_unsaved);
    }

    #[tokio::test]
    async fn test_open_from_dialog_cancelled() {
        let h = harness();
        h.backend.answer_open_dialog(None);

        assert!(h.session.open_file_from_dialog().await.is_empty());
        assert_eq!(h.session.tabs().len(), 1);
    }

    #[tokio::test]
    async fn test_open_specific_file_deduplicates() {
        let h = harness();
        h.backend.add_file("/n/a.txt", "a");

        let first = h.session.open_specific_file("/n/a.txt").await.unwrap();
        h.session.create_tab().await;
        let again = h.session.open_specific_file("/n/a.txt").await.unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(h.session.tabs().len(), 3);
        assert_eq!(h.session.active_tab_id(), Some(first.id));
        assert_eq!(h.backend.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_open_specific_file_missing() {
        let h = harness();

        assert!(h.session.open_specific_file("/n/missing.txt").await.is_none());
        assert_eq!(h.session.tabs().len(), 1);
    }

    #[tokio::test]
    async fn test_save_in_place() {
        let h = harness();
        h.backend.add_file("/n/a.txt", "a");
        let a = h.session.open_specific_file("/n/a.txt").await.unwrap();
        h.session.update_tab_content("changed");

        assert!(h.session.save_active_file().await);
        assert_eq!(
            h.backend.saves.lock().as_slice(),
            [("/n/a.txt".to_string(), "changed".to_string())]
        );
        assert!(!h.session.get_tab(&a.id).unwrap().is_unsaved);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_dirty() {
        let h = harness();
        h.backend.add_file("/n/a.txt", "a");
        h.session.open_specific_file("/n/a.txt").await.unwrap();
        h.session.update_tab_content("changed");
        h.backend.fail_saves.store(true, Ordering::SeqCst);

        assert!(!h.session.save_active_file().await);
        assert!(h.session.active_tab().unwrap().is_unsaved);
    }

    #[tokio::test]
    async fn test_save_without_path_delegates_to_save_as() {
        let h = harness();
        h.session.update_tab_content("fresh");
        h.backend
            .answer_save_as(SaveAsOutcome::Saved("/n/fresh.md".to_string()));

        assert!(h.session.save_active_file().await);
        let tab = h.session.active_tab().unwrap();
        assert_eq!(tab.path.as_deref(), Some("/n/fresh.md"));
        assert_eq!(tab.name, "fresh.md");
        assert!(!tab.is_unsaved);
        assert!(h.backend.saves.lock().is_empty());
    }

    #[tokio::test]
    async fn test_save_as_passes_default_format_and_name() {
        let h = harness();
        h.session.settings().update(|s| s.default_format = "md".to_string());
        h.session.update_tab_content("body");
        h.backend.answer_save_as(SaveAsOutcome::Cancelled);

        assert!(!h.session.save_active_file_as().await);
        assert_eq!(
            h.backend.save_as_calls.lock().as_slice(),
            [(
                "body".to_string(),
                "md".to_string(),
                "Untitled-1".to_string()
            )]
        );
        let tab = h.session.active_tab().unwrap();
        assert!(tab.is_unsaved);
        assert_eq!(tab.path, None);
    }

    #[tokio::test]
    async fn test_save_as_download_clears_dirty_without_path() {
        let h = harness();
        h.session.update_tab_content("body");
        h.backend.answer_save_as(SaveAsOutcome::Downloaded);

        assert!(h.session.save_active_file_as().await);
        let tab = h.session.active_tab().unwrap();
        assert!(!tab.is_unsaved);
        assert_eq!(tab.path, None);
        assert_eq!(tab.name, "Untitled-1");
    }

    #[tokio::test]
    async fn test_save_as_rebinds_existing_path() {
        let h = harness();
        h.backend.add_file("/n/a.txt", "a");
        let a = h.session.open_specific_file("/n/a.txt").await.unwrap();
        h.backend
            .answer_save_as(SaveAsOutcome::Saved("/n/copy.txt".to_string()));

        assert!(h.session.save_active_file_as().await);
        let tab = h.session.get_tab(&a.id).unwrap();
        assert_eq!(tab.path.as_deref(), Some("/n/copy.txt"));
        assert_eq!(tab.name, "copy.txt");
    }

    #[tokio::test]
    async fn test_close_during_save_is_busy() {
        let h = harness();
        h.backend.add_file("/n/a.txt", "a");
        let a = h.session.open_specific_file("/n/a.txt").await.unwrap();
        h.session.update_tab_content("changed");
        let (started, release) = h.backend.gate_saves();

        let saving = {
            let session = h.session.clone();
            tokio::spawn(async move { session.save_active_file().await })
        };
        started.notified().await;

        assert_eq!(h.session.close_tab(&a.id).await, CloseOutcome::Busy);
        assert!(!h.session.save_active_file_as().await);
        assert!(h.confirm.asked.lock().is_empty());

        release.notify_one();
        assert!(saving.await.unwrap());
        assert_eq!(h.session.close_tab(&a.id).await, CloseOutcome::Closed);
    }

    #[tokio::test]
    async fn test_edit_during_save_stays_dirty() {
        let h = harness();
        h.backend.add_file("/n/a.txt", "a");
        h.session.open_specific_file("/n/a.txt").await.unwrap();
        h.session.update_tab_content("first");
        let (started, release) = h.backend.gate_saves();

        let saving = {
            let session = h.session.clone();
            tokio::spawn(async move { session.save_active_file().await })
        };
        started.notified().await;
        h.session.update_tab_content("second");
        release.notify_one();

        assert!(saving.await.unwrap());
        let tab = h.session.active_tab().unwrap();
        assert!(tab.is_unsaved);
        assert_eq!(tab.content, "second");
        assert_eq!(h.backend.saves.lock()[0].1, "first");
    }

    #[tokio::test]
    async fn test_listen_only_once() {
        let h = harness();
        let (_tx, rx) = mpsc::unbounded_channel();
        let (_tx2, rx2) = mpsc::unbounded_channel();

        let _handle = h.session.listen(rx).unwrap();
        assert_eq!(
            h.session.listen(rx2).unwrap_err(),
            SessionError::AlreadyListening
        );
    }

    #[tokio::test]
    async fn test_listener_dispatches_events() {
        let h = harness();
        h.backend.add_file("/n/a.txt", "a");
        h.backend.add_file("/n/b.txt", "b");
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = h.session.listen(rx).unwrap();

        tx.send(BackendEvent::NewTabRequested).unwrap();
        tx.send(BackendEvent::Menu(MenuCommand::NewNote)).unwrap();
        tx.send(BackendEvent::CloseTabRequested).unwrap();
        tx.send(BackendEvent::FilesDropped(vec![
            "/n/a.txt".to_string(),
            "/n/b.txt".to_string(),
        ]))
        .unwrap();
        tx.send(BackendEvent::OpenRecentFile("/n/a.txt".to_string()))
            .unwrap();
        tx.send(BackendEvent::Menu(MenuCommand::ToggleTheme)).unwrap();
        tx.send(BackendEvent::QuitRequested).unwrap();
        tx.send(BackendEvent::NewTabRequested).unwrap();

        handle.await.unwrap();

        assert_eq!(names(&h), vec!["Untitled-1", "Untitled-2", "a.txt", "b.txt"]);
        assert_eq!(h.session.active_tab().unwrap().name, "a.txt");
        assert_eq!(h.session.settings().theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_listener_can_restart_after_stop() {
        let h = harness();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = h.session.listen(rx).unwrap();
        drop(tx);
        handle.await.unwrap();

        let (_tx, rx) = mpsc::unbounded_channel();
        assert!(h.session.listen(rx).is_ok());
    }

    #[tokio::test]
    async fn test_menu_save_events() {
        let h = harness();
        h.session.update_tab_content("body");
        h.backend.answer_save_as(SaveAsOutcome::Saved("/n/x.txt".to_string()));

        assert!(h.session.handle_event(BackendEvent::Menu(MenuCommand::Save)).await);
        assert_eq!(h.session.active_tab().unwrap().name, "x.txt");

        h.session.update_tab_content("more");
        assert!(h.session.handle_event(BackendEvent::Menu(MenuCommand::Save)).await);
        assert_eq!(h.backend.saves.lock()[0].1, "more");

        h.backend.answer_open_dialog(Some(vec![file("/n/y.txt", "y")]));
        assert!(
            h.session
                .handle_event(BackendEvent::Menu(MenuCommand::OpenFile))
                .await
        );
        assert_eq!(h.session.active_tab().unwrap().name, "y.txt");
        assert!(!h.session.handle_event(BackendEvent::QuitRequested).await);
    }
}

//! User commands over the registry: selection, editing and notifications

use std::time::Instant;

use super::document::{normalize_name, Document, DocumentPatch};
use super::notifications::NotificationQueue;
use super::registry::Registry;
use super::upload::UploadedFile;

/// Unsaved edits of the selected document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub id: String,
    pub name: String,
    pub content: String,
}

/// Selection, edit buffer and notifications layered over a [`Registry`]
pub struct Session {
    pub registry: Registry,
    pub notifications: NotificationQueue,
    selected: Option<String>,
    draft: Option<Draft>,
}

impl Session {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            notifications: NotificationQueue::new(),
            selected: None,
            draft: None,
        }
    }

    /// Currently selected document, if it still exists
    pub fn selected(&self) -> Option<&Document> {
        self.selected.as_deref().and_then(|id| self.registry.get(id))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a document; any unsaved edit of another document is discarded
    pub fn select(&mut self, id: &str) {
        if self.draft.as_ref().is_some_and(|d| d.id != id) {
            self.draft = None;
        }
        self.selected = Some(id.to_string());
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.draft.as_mut()
    }

    /// Create an empty document, select it and open it for editing
    pub fn new_document(&mut self, name: &str, now: Instant) -> String {
        let id = self.registry.create(name, "");
        self.select(&id);
        self.begin_edit();
        if let Some(doc) = self.registry.get(&id) {
            self.notifications
                .success(format!("Created {}", doc.name), now);
        }
        id
    }

    /// Continuation of a finished upload read
    pub fn import(&mut self, file: UploadedFile, now: Instant) -> String {
        let id = self.registry.create(&file.name, file.content);
        if let Some(doc) = self.registry.get(&id) {
            self.notifications
                .success(format!("Uploaded {}", doc.name), now);
        }
        id
    }

    /// Start editing the selected document
    pub fn begin_edit(&mut self) {
        let Some(doc) = self.selected() else {
            return;
        };
        if self.draft.as_ref().is_some_and(|d| d.id == doc.id) {
            return;
        }
        let draft = Draft {
            id: doc.id.clone(),
            name: doc.name.clone(),
            content: doc.content.clone(),
        };
        self.draft = Some(draft);
    }

    /// Write the draft back to the registry
    pub fn save(&mut self, now: Instant) {
        let Some(draft) = self.draft.take() else {
            return;
        };
        let Some(doc) = self.registry.get(&draft.id) else {
            return;
        };

        let name = if draft.name.trim().is_empty() {
            None
        } else {
            Some(normalize_name(&draft.name)).filter(|name| *name != doc.name)
        };
        let patch = match name {
            Some(name) => DocumentPatch {
                name: Some(name),
                content: Some(draft.content),
            },
            None => DocumentPatch::content(draft.content),
        };

        self.registry.update(&draft.id, patch);
        if let Some(doc) = self.registry.get(&draft.id) {
            self.notifications
                .success(format!("Saved {}", doc.name), now);
        }
    }

    /// Drop the draft without saving
    pub fn cancel(&mut self, now: Instant) {
        if self.draft.take().is_some() {
            self.notifications.info("Changes discarded", now);
        }
    }

    /// Delete a document; unknown ids are ignored
    pub fn delete(&mut self, id: &str, now: Instant) {
        let Some(name) = self.registry.get(id).map(|doc| doc.name.clone()) else {
            return;
        };
        self.registry.delete(id);

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        if self.draft.as_ref().is_some_and(|d| d.id == id) {
            self.draft = None;
        }
        self.notifications.success(format!("Deleted {}", name), now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifications::NotificationKind;
    use crate::core::store::Store;
    use crate::core::upload::{UploadSource, Uploader};
    use std::sync::Arc;
    use std::time::Duration;

    fn session() -> Session {
        Session::new(Registry::load(Store::in_memory()))
    }

    fn last_message(session: &Session) -> Option<(NotificationKind, String)> {
        session
            .notifications
            .iter()
            .last()
            .map(|n| (n.kind, n.message.clone()))
    }

    #[test]
    fn test_new_document_opens_editor() {
        let mut session = session();
        let id = session.new_document("ideas", Instant::now());

        assert_eq!(session.selected_id(), Some(id.as_str()));
        assert_eq!(session.draft().map(|d| d.name.as_str()), Some("ideas.md"));
        assert_eq!(
            last_message(&session),
            Some((NotificationKind::Success, "Created ideas.md".to_string()))
        );
    }

    #[test]
    fn test_save_applies_draft() {
        let mut session = session();
        let id = session.new_document("ideas", Instant::now());
        session.draft_mut().unwrap().content = "# Ideas".to_string();
        session.save(Instant::now());

        assert!(!session.is_editing());
        assert_eq!(session.registry.get(&id).unwrap().content, "# Ideas");
        assert_eq!(session.registry.get(&id).unwrap().name, "ideas.md");
        assert_eq!(
            last_message(&session),
            Some((NotificationKind::Success, "Saved ideas.md".to_string()))
        );
    }

    #[test]
    fn test_save_renames_with_suffix() {
        let mut session = session();
        let id = session.new_document("a", Instant::now());
        session.draft_mut().unwrap().name = "journal".to_string();
        session.save(Instant::now());
        assert_eq!(session.registry.get(&id).unwrap().name, "journal.md");
    }

    #[test]
    fn test_save_ignores_blank_name() {
        let mut session = session();
        let id = session.new_document("keep", Instant::now());
        session.draft_mut().unwrap().name = "   ".to_string();
        session.save(Instant::now());
        assert_eq!(session.registry.get(&id).unwrap().name, "keep.md");
    }

    #[test]
    fn test_cancel_discards_changes() {
        let mut session = session();
        let id = session.new_document("a", Instant::now());
        session.draft_mut().unwrap().content = "lost".to_string();
        session.cancel(Instant::now());

        assert!(!session.is_editing());
        assert_eq!(session.registry.get(&id).unwrap().content, "");
        assert_eq!(
            last_message(&session).map(|(kind, _)| kind),
            Some(NotificationKind::Info)
        );
    }

    #[test]
    fn test_selecting_other_document_drops_draft() {
        let mut session = session();
        let first = session.new_document("first", Instant::now());
        session.save(Instant::now());
        session.new_document("second", Instant::now());
        assert!(session.is_editing());

        session.select(&first);
        assert!(!session.is_editing());
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut session = session();
        let id = session.new_document("a", Instant::now());
        session.delete(&id, Instant::now());

        assert!(session.selected().is_none());
        assert!(!session.is_editing());
        assert!(session.registry.is_empty());
        assert_eq!(
            last_message(&session),
            Some((NotificationKind::Success, "Deleted a.md".to_string()))
        );
    }

    #[test]
    fn test_delete_unknown_is_silent() {
        let mut session = session();
        session.delete("missing", Instant::now());
        assert!(session.notifications.is_empty());
    }

    #[test]
    fn test_import_uppercase_extension_has_single_suffix() {
        let mut uploader = Uploader::new().unwrap();
        uploader.submit(
            UploadSource::Bytes {
                name: "README.MD".to_string(),
                bytes: Arc::from(&b"# Readme"[..]),
            },
            None,
        );

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut results = Vec::new();
        while results.is_empty() && Instant::now() < deadline {
            results.extend(uploader.drain());
            std::thread::sleep(Duration::from_millis(5));
        }
        let file = results.into_iter().next().unwrap().unwrap();

        let mut session = session();
        let id = session.import(file, Instant::now());
        assert_eq!(session.registry.get(&id).unwrap().name, "README.md");
    }

    #[test]
    fn test_import_creates_without_selecting() {
        let mut session = session();
        let id = session.import(
            UploadedFile {
                name: "todo.md".to_string(),
                content: "- item".to_string(),
            },
            Instant::now(),
        );

        assert_eq!(session.registry.list()[0].id, id);
        assert!(session.selected().is_none());
        assert_eq!(
            last_message(&session),
            Some((NotificationKind::Success, "Uploaded todo.md".to_string()))
        );
    }
}

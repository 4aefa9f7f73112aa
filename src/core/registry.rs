//! Owning collection of documents, persisted on every mutation

use std::collections::HashSet;

use uuid::Uuid;

use super::document::{Document, DocumentPatch};
use super::store::{Store, StoreWriter};

/// In-memory document collection, newest first
pub struct Registry {
    documents: Vec<Document>,
    writer: StoreWriter,
}

impl Registry {
    /// Load the persisted collection, starting empty if it is missing or unreadable
    ///
    /// Records repeating an id already seen are dropped; the first one wins.
    pub fn load(store: Store) -> Self {
        let mut seen = HashSet::new();
        let mut documents = store.read_documents().unwrap_or_default();
        let total = documents.len();
        documents.retain(|doc| seen.insert(doc.id.clone()));
        if documents.len() != total {
            tracing::warn!(
                "Dropped {} stored documents with duplicate ids",
                total - documents.len()
            );
        }
        tracing::info!("Loaded {} documents", documents.len());
        Self {
            documents,
            writer: StoreWriter::spawn(store),
        }
    }

    pub fn list(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Create a document at the front of the collection and return its id
    pub fn create(&mut self, name: &str, content: impl Into<String>) -> String {
        let mut doc = Document::new(name, content);
        // Ids must stay unique within the collection
        while self.get(&doc.id).is_some() {
            doc.id = Uuid::new_v4().to_string();
        }

        let id = doc.id.clone();
        tracing::info!("Created document {} ({})", doc.name, id);
        self.documents.insert(0, doc);
        self.persist();
        id
    }

    /// Merge `patch` into the document with `id`; unknown ids are ignored
    pub fn update(&mut self, id: &str, patch: DocumentPatch) {
        let Some(doc) = self.documents.iter_mut().find(|doc| doc.id == id) else {
            tracing::debug!("Ignoring update for unknown document {}", id);
            return;
        };
        doc.apply(patch);
        self.persist();
    }

    /// Remove the document with `id`; unknown ids are ignored
    pub fn delete(&mut self, id: &str) {
        let before = self.documents.len();
        self.documents.retain(|doc| doc.id != id);
        if self.documents.len() == before {
            tracing::debug!("Ignoring delete for unknown document {}", id);
            return;
        }
        tracing::info!("Deleted document {}", id);
        self.persist();
    }

    /// Block until all queued writes have reached the store
    pub fn flush(&self) {
        self.writer.flush();
    }

    fn persist(&self) {
        self.writer.submit(self.documents.clone());
    }
}

//! Persistent key-value storage for documents and the theme preference
//!
//! Storage is a flat, synchronous string-to-string map. [`Store`] layers the
//! typed document and theme accessors on top of it, and [`StoreWriter`] moves
//! document serialization and writes onto a background thread so the UI never
//! waits on disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use super::document::Document;
use super::theme::ThemePreference;

/// Key holding the serialized document collection
pub const DOCUMENTS_KEY: &str = "markdown-files";
/// Key holding the serialized theme preference
pub const THEME_KEY: &str = "theme";

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage backend is unavailable")]
    Poisoned,
}

/// Synchronous string key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as a file inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(io_err)?;

        // Write a sibling file and rename it into place
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }
}

/// In-memory store, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to the persisted documents and theme preference
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueStore>,
}

impl Store {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Store backed by a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn write_documents(&self, documents: &[Document]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(documents).map_err(|source| StoreError::Serialize {
            key: DOCUMENTS_KEY.to_string(),
            source,
        })?;
        self.write_raw(DOCUMENTS_KEY, &raw)
    }

    /// Read the persisted collection, `None` when absent or corrupt
    pub fn read_documents(&self) -> Option<Vec<Document>> {
        let raw = self.read_raw(DOCUMENTS_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(documents) => Some(documents),
            Err(e) => {
                tracing::warn!("Discarding unreadable document collection: {}", e);
                None
            }
        }
    }

    pub fn write_theme_preference(&self, preference: ThemePreference) -> Result<(), StoreError> {
        let raw = serde_json::to_string(preference.as_str()).map_err(|source| {
            StoreError::Serialize {
                key: THEME_KEY.to_string(),
                source,
            }
        })?;
        self.write_raw(THEME_KEY, &raw)
    }

    /// Read the persisted theme preference, `None` when absent or unknown
    pub fn read_theme_preference(&self) -> Option<ThemePreference> {
        let raw = self.read_raw(THEME_KEY)?;
        let preference = serde_json::from_str::<String>(&raw)
            .ok()
            .and_then(|value| value.parse().ok());
        if preference.is_none() {
            tracing::warn!("Ignoring unknown theme preference: {:?}", raw);
        }
        preference
    }

    /// Write an already-serialized value
    pub fn write_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend.set(key, value)
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read '{}': {}", key, e);
                None
            }
        }
    }
}

enum WriteJob {
    Documents(Vec<Document>),
    Flush(Sender<()>),
}

/// Background thread serializing and writing document snapshots in submission order
pub struct StoreWriter {
    tx: Option<Sender<WriteJob>>,
    handle: Option<JoinHandle<()>>,
}

impl StoreWriter {
    /// Spawn the writer thread for `store`
    pub fn spawn(store: Store) -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("store-writer".to_string())
            .spawn(move || Self::run(store, rx));

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("Failed to spawn store writer: {}", e);
                None
            }
        };

        Self {
            tx: handle.as_ref().map(|_| tx),
            handle,
        }
    }

    fn run(store: Store, rx: Receiver<WriteJob>) {
        for job in rx {
            match job {
                WriteJob::Documents(documents) => match store.write_documents(&documents) {
                    Ok(()) => tracing::debug!("Persisted {} documents", documents.len()),
                    Err(e) => tracing::error!("Failed to persist documents: {}", e),
                },
                WriteJob::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
    }

    /// Queue a snapshot of the collection for writing
    pub fn submit(&self, documents: Vec<Document>) {
        let Some(tx) = &self.tx else {
            tracing::error!("Store writer is not running; dropping document write");
            return;
        };
        if tx.send(WriteJob::Documents(documents)).is_err() {
            tracing::error!("Store writer stopped; dropping document write");
        }
    }

    /// Block until every previously submitted write has been applied
    pub fn flush(&self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (done_tx, done_rx) = mpsc::channel();
        if tx.send(WriteJob::Flush(done_tx)).is_ok() {
            let _ = done_rx.recv();
        }
    }
}

impl Drop for StoreWriter {
    fn drop(&mut self) {
        // Closing the channel lets the thread drain the queue and exit
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Document> {
        vec![
            Document {
                id: "b".to_string(),
                name: "second.md".to_string(),
                content: "## two\n".to_string(),
                created_at: 1_700_000_000_500,
                updated_at: 1_700_000_000_900,
            },
            Document {
                id: "a".to_string(),
                name: "first.md".to_string(),
                content: "# one \u{1F600}".to_string(),
                created_at: 1_700_000_000_000,
                updated_at: 1_700_000_000_000,
            },
        ]
    }

    #[test]
    fn test_documents_round_trip_preserves_order() {
        let store = Store::in_memory();
        store.write_documents(&sample()).unwrap();
        assert_eq!(store.read_documents(), Some(sample()));
    }

    #[test]
    fn test_missing_and_corrupt_documents_read_as_none() {
        let store = Store::in_memory();
        assert_eq!(store.read_documents(), None);

        store.write_raw(DOCUMENTS_KEY, "{not json").unwrap();
        assert_eq!(store.read_documents(), None);

        store.write_raw(DOCUMENTS_KEY, r#"{"id": "x"}"#).unwrap();
        assert_eq!(store.read_documents(), None);
    }

    #[test]
    fn test_theme_preference_round_trip() {
        let store = Store::in_memory();
        assert_eq!(store.read_theme_preference(), None);

        store.write_theme_preference(ThemePreference::Dark).unwrap();
        assert_eq!(store.read_theme_preference(), Some(ThemePreference::Dark));

        store.write_raw(THEME_KEY, "\"light\"").unwrap();
        assert_eq!(store.read_theme_preference(), Some(ThemePreference::Light));

        store.write_raw(THEME_KEY, "\"sepia\"").unwrap();
        assert_eq!(store.read_theme_preference(), None);

        store.write_raw(THEME_KEY, "dark").unwrap();
        assert_eq!(store.read_theme_preference(), None);
    }

    #[test]
    fn test_theme_preference_is_stored_as_json() {
        let store = Store::in_memory();
        store.write_theme_preference(ThemePreference::Light).unwrap();

        let raw = store.backend.get(THEME_KEY).unwrap().unwrap();
        assert_eq!(raw, "\"light\"");
        assert_eq!(serde_json::from_str::<String>(&raw).unwrap(), "light");
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");

        let store = Store::new(FileStore::new(&root));
        store.write_documents(&sample()).unwrap();
        store.write_theme_preference(ThemePreference::Light).unwrap();

        let reopened = Store::new(FileStore::new(&root));
        assert_eq!(reopened.read_documents(), Some(sample()));
        assert_eq!(reopened.read_theme_preference(), Some(ThemePreference::Light));
        assert!(root.join("markdown-files.json").exists());
        assert!(!root.join("markdown-files.json.tmp").exists());
    }

    #[test]
    fn test_file_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_writer_applies_writes_in_order() {
        let store = Store::in_memory();
        let writer = StoreWriter::spawn(store.clone());

        let docs = sample();
        for i in 0..50 {
            let mut snapshot = docs.clone();
            snapshot[0].content = format!("revision {}", i);
            writer.submit(snapshot);
        }
        writer.flush();

        let persisted = store.read_documents().unwrap();
        assert_eq!(persisted[0].content, "revision 49");
    }

    #[test]
    fn test_writer_drains_queue_on_drop() {
        let store = Store::in_memory();
        {
            let writer = StoreWriter::spawn(store.clone());
            writer.submit(sample());
        }
        assert_eq!(store.read_documents(), Some(sample()));
    }
}

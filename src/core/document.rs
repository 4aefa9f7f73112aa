//! Markdown document records

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name used when a document is created without one
const FALLBACK_NAME: &str = "untitled";

/// A markdown document stored in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier, generated at creation
    pub id: String,
    /// File name, always ending in `.md` when created
    pub name: String,
    /// Raw markdown content
    pub content: String,
    /// Creation time in milliseconds since the Unix epoch
    pub created_at: i64,
    /// Last modification time in milliseconds since the Unix epoch
    pub updated_at: i64,
}

/// Partial update applied by [`Registry::update`](super::registry::Registry::update)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl DocumentPatch {
    /// Patch that only replaces the content
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            name: None,
            content: Some(content.into()),
        }
    }
}

impl Document {
    /// Create a new document with a fresh id and both timestamps set to now
    pub fn new(name: &str, content: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            name: normalize_name(name),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into the document and refresh `updated_at`
    pub fn apply(&mut self, patch: DocumentPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = now_millis().max(self.updated_at);
    }
}

/// Ensure a document name ends with `.md`
pub fn normalize_name(name: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { FALLBACK_NAME } else { name };

    if name.ends_with(".md") {
        name.to_string()
    } else {
        format!("{}.md", name)
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use graft_core::{Position, Range};
use serde::{Deserialize, Serialize};

use crate::HostError;

/// Opaque identity of a document known to the host, typically a URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One atomic, undoable edit on a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEdit {
    Insert { position: Position, text: String },
    Replace { range: Range, text: String },
}

impl DocumentEdit {
    pub fn insert(position: Position, text: impl Into<String>) -> Self {
        Self::Insert {
            position,
            text: text.into(),
        }
    }

    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self::Replace {
            range,
            text: text.into(),
        }
    }
}

/// Document access as the host editor exposes it.
///
/// The trait is intentionally small so it can be implemented for different
/// hosts (an editor frontend, an in-memory store for tests).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Full text snapshot of an open document.
    async fn text(&self, doc: &DocumentId) -> Result<String, HostError>;

    /// Applies one atomic edit, undoable by the user as a single step.
    async fn apply_edit(&self, doc: &DocumentId, edit: DocumentEdit) -> Result<(), HostError>;

    /// Opens (or reveals) the document at `path`, returning its identity.
    async fn open_path(&self, path: &Path) -> Result<DocumentId, HostError>;

    /// Opens an unsaved buffer pre-filled with `text` under a language tag.
    async fn open_untitled(&self, text: &str, language: &str) -> Result<DocumentId, HostError>;
}

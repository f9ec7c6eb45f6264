use std::path::PathBuf;

use graft_core::Position;
use graft_host::DocumentId;

/// The document the user is looking at, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDocument {
    pub id: DocumentId,
    /// On-disk path; `None` for untitled buffers.
    pub path: Option<PathBuf>,
    /// Cursor position, the last resort of anchor resolution.
    pub cursor: Position,
}

impl ActiveDocument {
    pub fn new(id: impl Into<DocumentId>, path: Option<PathBuf>, cursor: Position) -> Self {
        Self {
            id: id.into(),
            path,
            cursor,
        }
    }

    /// Basename of the backing file, when there is one.
    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Human-facing name: basename when the document has a path, otherwise
    /// the raw document id.
    pub fn display_name(&self) -> String {
        self.file_name().unwrap_or_else(|| self.id.to_string())
    }
}

/// Editor state at the moment of an apply call. Captured by the host per
/// invocation; the engine never caches it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyContext {
    pub workspace_root: Option<PathBuf>,
    pub active: Option<ActiveDocument>,
}

impl ApplyContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    pub fn with_active(mut self, active: ActiveDocument) -> Self {
        self.active = Some(active);
        self
    }
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use graft_core::{splice_insert, splice_replace};
use graft_host::{DocumentEdit, DocumentId, DocumentStore, HostError};
use parking_lot::Mutex;

/// [`DocumentStore`] over an in-memory map. Edits are applied for real via
/// the same splice routines production code uses, so post-edit text can be
/// asserted exactly.
pub struct MemoryDocuments {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    texts: HashMap<DocumentId, String>,
    opened_paths: Vec<PathBuf>,
    opened_untitled: Vec<(String, String)>,
    next_untitled: u64,
    fail_edits: u32,
}

impl MemoryDocuments {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_document(self, doc: impl Into<DocumentId>, text: impl Into<String>) -> Self {
        self.insert(doc, text);
        self
    }

    pub fn insert(&self, doc: impl Into<DocumentId>, text: impl Into<String>) {
        self.inner.lock().texts.insert(doc.into(), text.into());
    }

    /// Current text of `doc`, or `None` when it was never opened.
    pub fn text_of(&self, doc: &DocumentId) -> Option<String> {
        self.inner.lock().texts.get(doc).cloned()
    }

    /// Makes the next `count` calls to `apply_edit` fail.
    pub fn fail_next_edits(&self, count: u32) {
        self.inner.lock().fail_edits = count;
    }

    /// Paths passed to `open_path`, in call order.
    pub fn opened_paths(&self) -> Vec<PathBuf> {
        self.inner.lock().opened_paths.clone()
    }

    /// `(text, language)` pairs passed to `open_untitled`, in call order.
    pub fn opened_untitled(&self) -> Vec<(String, String)> {
        self.inner.lock().opened_untitled.clone()
    }
}

impl Default for MemoryDocuments {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocuments {
    async fn text(&self, doc: &DocumentId) -> Result<String, HostError> {
        self.inner
            .lock()
            .texts
            .get(doc)
            .cloned()
            .ok_or_else(|| HostError::DocumentNotOpen(doc.clone()))
    }

    async fn apply_edit(&self, doc: &DocumentId, edit: DocumentEdit) -> Result<(), HostError> {
        let mut inner = self.inner.lock();
        if inner.fail_edits > 0 {
            inner.fail_edits -= 1;
            return Err(HostError::other("edit rejected by host"));
        }
        let text = inner
            .texts
            .get_mut(doc)
            .ok_or_else(|| HostError::DocumentNotOpen(doc.clone()))?;
        let updated = match edit {
            DocumentEdit::Insert { position, text: code } => splice_insert(text, position, &code),
            DocumentEdit::Replace { range, text: code } => splice_replace(text, range, &code),
        }
        .map_err(|error| HostError::other(error.to_string()))?;
        *text = updated;
        Ok(())
    }

    async fn open_path(&self, path: &Path) -> Result<DocumentId, HostError> {
        let doc = DocumentId::new(format!("file://{}", path.display()));
        let mut inner = self.inner.lock();
        inner.opened_paths.push(path.to_path_buf());
        inner.texts.entry(doc.clone()).or_default();
        Ok(doc)
    }

    async fn open_untitled(&self, text: &str, language: &str) -> Result<DocumentId, HostError> {
        let mut inner = self.inner.lock();
        inner.next_untitled += 1;
        let doc = DocumentId::new(format!("untitled:Untitled-{}", inner.next_untitled));
        inner
            .opened_untitled
            .push((text.to_string(), language.to_string()));
        inner.texts.insert(doc.clone(), text.to_string());
        Ok(doc)
    }
}

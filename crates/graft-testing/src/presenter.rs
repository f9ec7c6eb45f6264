use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use graft_core::Position;
use graft_host::{DocumentId, HostError, PreviewPresenter};
use parking_lot::Mutex;

/// One ghost decoration request, as the presenter received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostShown {
    pub key: String,
    pub doc: DocumentId,
    pub position: Position,
    pub text: String,
}

/// [`PreviewPresenter`] that records registrations, diffs, decorations, and
/// closes instead of driving an editor UI.
#[derive(Default)]
pub struct RecordingPresenter {
    inner: Mutex<Inner>,
    failing: AtomicBool,
}

#[derive(Default)]
struct Inner {
    proposed: HashMap<String, String>,
    diffs: Vec<(DocumentId, String, String)>,
    ghosts: Vec<GhostShown>,
    closed: Vec<String>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every presentation call fails until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Proposed content currently registered under `key`.
    pub fn proposed_for(&self, key: &str) -> Option<String> {
        self.inner.lock().proposed.get(key).cloned()
    }

    /// `(doc, key, title)` triples of every diff shown, in order.
    pub fn diffs_shown(&self) -> Vec<(DocumentId, String, String)> {
        self.inner.lock().diffs.clone()
    }

    pub fn ghosts_shown(&self) -> Vec<GhostShown> {
        self.inner.lock().ghosts.clone()
    }

    /// Keys passed to `close_preview`, in order, including unknown ones.
    pub fn closed_keys(&self) -> Vec<String> {
        self.inner.lock().closed.clone()
    }

    fn fail_if_requested(&self, what: &str) -> Result<(), HostError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HostError::other(format!("presenter refused to {what}")));
        }
        Ok(())
    }
}

#[async_trait]
impl PreviewPresenter for RecordingPresenter {
    async fn register_proposed(&self, key: &str, content: &str) -> Result<(), HostError> {
        self.fail_if_requested("register proposed content")?;
        self.inner
            .lock()
            .proposed
            .insert(key.to_string(), content.to_string());
        Ok(())
    }

    async fn show_diff(&self, doc: &DocumentId, key: &str, title: &str) -> Result<(), HostError> {
        self.fail_if_requested("show a diff")?;
        self.inner
            .lock()
            .diffs
            .push((doc.clone(), key.to_string(), title.to_string()));
        Ok(())
    }

    async fn show_ghost(
        &self,
        key: &str,
        doc: &DocumentId,
        position: Position,
        text: &str,
    ) -> Result<(), HostError> {
        self.fail_if_requested("show ghost text")?;
        self.inner.lock().ghosts.push(GhostShown {
            key: key.to_string(),
            doc: doc.clone(),
            position,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn close_preview(&self, key: &str) -> Result<(), HostError> {
        let mut inner = self.inner.lock();
        inner.proposed.remove(key);
        inner.closed.push(key.to_string());
        Ok(())
    }
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use graft_core::{splice_insert, splice_replace, EditError, Position, Range};
use graft_host::{
    ApplyResult, DocumentEdit, DocumentId, DocumentStore, HostError, PreviewPresenter,
};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::time::MissedTickBehavior;

/// How often the expiry sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// How long a staged change may sit unattended before the sweep reclaims it.
const CHANGE_TTL: Duration = Duration::from_secs(10 * 60);

/// Failure while staging a preview.
#[derive(Debug, Error)]
pub enum PendingError {
    #[error(transparent)]
    Splice(#[from] EditError),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// One staged, not-yet-committed edit.
///
/// Created by [`PendingChangeStore::show_preview`] or
/// [`PendingChangeStore::show_ghost_text`], never mutated, and destroyed by
/// exactly one of accept, reject, or the expiry sweep. Ids are never reused.
#[derive(Debug, Clone)]
pub struct PendingChange {
    pub id: String,
    pub document: DocumentId,
    pub position: Position,
    /// Extent to replace. `None` means insert at `position`.
    pub range: Option<Range>,
    pub new_code: String,
    /// Full post-splice document text. Ghost-text staging never computes it.
    pub proposed_full_content: Option<String>,
    pub created_at: Instant,
}

/// Sweep cadence and entry lifetime. Production uses [`Default`]; tests
/// shrink both to keep runtimes short.
#[derive(Debug, Clone, Copy)]
pub struct StoreSettings {
    pub sweep_interval: Duration,
    pub ttl: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            sweep_interval: SWEEP_INTERVAL,
            ttl: CHANGE_TTL,
        }
    }
}

struct StoreInner {
    documents: Arc<dyn DocumentStore>,
    presenter: Arc<dyn PreviewPresenter>,
    ttl: Duration,
    next_id: AtomicU64,
    entries: Mutex<HashMap<String, PendingChange>>,
}

impl StoreInner {
    fn next_change_id(&self) -> String {
        format!("pending-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn sweep_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, change| now.duration_since(change.created_at) <= self.ttl);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "swept expired pending changes");
        }
    }
}

/// Owner of all staged changes and of the expiry sweeper that reclaims them.
pub struct PendingChangeStore {
    inner: Arc<StoreInner>,
    sweeper: tokio::task::JoinHandle<()>,
}

impl PendingChangeStore {
    /// Creates a store and starts its expiry sweeper.
    ///
    /// Must run inside a tokio runtime: the sweeper is a spawned task, held
    /// only through a weak handle and aborted when the store is dropped.
    pub fn new(documents: Arc<dyn DocumentStore>, presenter: Arc<dyn PreviewPresenter>) -> Self {
        Self::with_settings(documents, presenter, StoreSettings::default())
    }

    pub fn with_settings(
        documents: Arc<dyn DocumentStore>,
        presenter: Arc<dyn PreviewPresenter>,
        settings: StoreSettings,
    ) -> Self {
        let inner = Arc::new(StoreInner {
            documents,
            presenter,
            ttl: settings.ttl,
            next_id: AtomicU64::new(1),
            entries: Mutex::new(HashMap::new()),
        });
        let sweeper = spawn_sweeper(&inner, settings.sweep_interval);
        Self { inner, sweeper }
    }

    /// Stages `new_code` against `doc` and opens a diff of the proposal.
    ///
    /// The proposed full content is computed here by splicing: replacing
    /// `range` when given, otherwise inserting at `position`, preserving the
    /// prefix and suffix of the boundary lines either way.
    pub async fn show_preview(
        &self,
        doc: &DocumentId,
        position: Position,
        new_code: &str,
        range: Option<Range>,
    ) -> ApplyResult {
        let id = self.inner.next_change_id();
        match self.stage_diff(&id, doc, position, new_code, range).await {
            Ok(()) => ApplyResult::preview_shown(id),
            Err(error) => {
                self.discard(&id).await;
                ApplyResult::error(format!("failed to stage preview: {error}"))
            }
        }
    }

    async fn stage_diff(
        &self,
        id: &str,
        doc: &DocumentId,
        position: Position,
        new_code: &str,
        range: Option<Range>,
    ) -> Result<(), PendingError> {
        let original = self.inner.documents.text(doc).await?;
        let proposed = match range {
            Some(range) => splice_replace(&original, range, new_code)?,
            None => splice_insert(&original, position, new_code)?,
        };

        let change = PendingChange {
            id: id.to_string(),
            document: doc.clone(),
            position,
            range,
            new_code: new_code.to_string(),
            proposed_full_content: Some(proposed.clone()),
            created_at: Instant::now(),
        };
        self.inner.entries.lock().insert(id.to_string(), change);

        self.inner.presenter.register_proposed(id, &proposed).await?;
        self.inner
            .presenter
            .show_diff(doc, id, &format!("Proposed change to {doc}"))
            .await?;
        tracing::debug!(id, doc = %doc, "pending change staged");
        Ok(())
    }

    /// Lighter-weight staging: renders the first line of `code` as an inline
    /// decoration at `position` instead of opening a diff. Accepting still
    /// applies the whole block.
    pub async fn show_ghost_text(
        &self,
        doc: &DocumentId,
        position: Position,
        code: &str,
    ) -> ApplyResult {
        let id = self.inner.next_change_id();
        let change = PendingChange {
            id: id.clone(),
            document: doc.clone(),
            position,
            range: None,
            new_code: code.to_string(),
            proposed_full_content: None,
            created_at: Instant::now(),
        };
        self.inner.entries.lock().insert(id.clone(), change);

        let summary = ghost_summary(code);
        match self
            .inner
            .presenter
            .show_ghost(&id, doc, position, &summary)
            .await
        {
            Ok(()) => ApplyResult::preview_shown(id),
            Err(error) => {
                self.discard(&id).await;
                ApplyResult::error(format!("failed to show ghost text: {error}"))
            }
        }
    }

    /// Applies the staged change as one atomic, undoable edit.
    ///
    /// Returns `false` for unknown ids (a later duplicate accept is a no-op,
    /// not an error). When the host rejects the edit the entry is restored,
    /// so the change stays retryable and rejectable until it expires.
    pub async fn accept_change(&self, id: &str) -> bool {
        // Claim under the map lock: of two racing accepts for the same id,
        // exactly one observes the live entry.
        let Some(change) = self.inner.entries.lock().remove(id) else {
            return false;
        };

        let edit = match change.range {
            Some(range) => DocumentEdit::replace(range, change.new_code.clone()),
            None => DocumentEdit::insert(change.position, change.new_code.clone()),
        };
        match self.inner.documents.apply_edit(&change.document, edit).await {
            Ok(()) => {
                self.close_preview(id).await;
                tracing::debug!(id, doc = %change.document, "pending change accepted");
                true
            }
            Err(error) => {
                tracing::debug!(id, %error, "accept failed, change kept for retry");
                self.inner.entries.lock().insert(change.id.clone(), change);
                false
            }
        }
    }

    /// Discards the staged change and closes its preview. Never touches the
    /// underlying document. Unknown ids are a no-op.
    pub async fn reject_change(&self, id: &str) -> bool {
        let removed = self.inner.entries.lock().remove(id).is_some();
        self.close_preview(id).await;
        if removed {
            tracing::debug!(id, "pending change rejected");
        }
        removed
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.inner.entries.lock().is_empty()
    }

    /// Drops every staged change and closes each preview. Used on teardown.
    pub async fn clear_pending_changes(&self) {
        let ids: Vec<String> = {
            let mut entries = self.inner.entries.lock();
            entries.drain().map(|(id, _)| id).collect()
        };
        for id in &ids {
            self.close_preview(id).await;
        }
        if !ids.is_empty() {
            tracing::debug!(cleared = ids.len(), "pending changes cleared");
        }
    }

    async fn discard(&self, id: &str) {
        self.inner.entries.lock().remove(id);
        self.close_preview(id).await;
    }

    async fn close_preview(&self, id: &str) {
        if let Err(error) = self.inner.presenter.close_preview(id).await {
            tracing::debug!(id, %error, "failed to close preview");
        }
    }
}

impl Drop for PendingChangeStore {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}

fn spawn_sweeper(inner: &Arc<StoreInner>, sweep_interval: Duration) -> tokio::task::JoinHandle<()> {
    let weak: Weak<StoreInner> = Arc::downgrade(inner);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let Some(inner) = weak.upgrade() else { break };
            inner.sweep_expired();
        }
    })
}

/// First line of `code`, marked with an ellipsis when more follows.
fn ghost_summary(code: &str) -> String {
    let mut lines = code.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{first} …")
    } else {
        first.to_string()
    }
}

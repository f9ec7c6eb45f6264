use async_trait::async_trait;
use graft_core::Position;

use crate::{DocumentId, HostError};

/// Presentation of staged changes: side-by-side diffs and inline ghost text.
///
/// `key` is the pending-change id owning the presentation; one key owns at
/// most one live preview, and [`close_preview`](Self::close_preview) removes
/// whatever was shown under it (diff tab or decoration).
#[async_trait]
pub trait PreviewPresenter: Send + Sync {
    /// Register `content` under a virtual read-only identity addressable by
    /// `key`, so it can be diffed against the live document.
    async fn register_proposed(&self, key: &str, content: &str) -> Result<(), HostError>;

    /// Show `doc` against the proposed content registered under `key`,
    /// side by side, under `title`.
    async fn show_diff(&self, doc: &DocumentId, key: &str, title: &str) -> Result<(), HostError>;

    /// Render `text` as an inline ghost decoration in `doc` at `position`.
    async fn show_ghost(
        &self,
        key: &str,
        doc: &DocumentId,
        position: Position,
        text: &str,
    ) -> Result<(), HostError>;

    /// Remove the presentation owned by `key`, dropping any registered
    /// proposed content. Closing an unknown key is a no-op.
    async fn close_preview(&self, key: &str) -> Result<(), HostError>;
}

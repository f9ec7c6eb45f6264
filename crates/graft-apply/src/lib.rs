//! The apply pipeline: routes an AI-generated code block to the right
//! destination.
//!
//! [`ApplyEngine::apply`] takes one [`ApplyPayload`] plus an [`ApplyContext`]
//! snapshot and either creates a file, stages a terminal command, edits the
//! active document, or parks the edit as a pending preview. All host access
//! goes through the `graft-host` traits; the engine itself does no I/O of its
//! own and every expected outcome (cancelled prompt, declined overwrite,
//! failed write) is a structured [`ApplyResult`], not an error.
//!
//! Intent is resolved per unit: explicit payload fields always win, detection
//! (when enabled) fills the gaps, and anything still undecided falls back to
//! an in-file edit.

mod config;
mod context;
mod engine;
mod payload;

pub use config::{ApplyConfig, CreateLocation, PreviewMode};
pub use context::{ActiveDocument, ApplyContext};
pub use engine::ApplyEngine;
pub use payload::ApplyPayload;

pub use graft_host::{ApplyAction, ApplyResult, Notice, NoticeSeverity};
pub use graft_intent::Intent;
pub use graft_pending::{PendingChange, PendingChangeStore, StoreSettings};

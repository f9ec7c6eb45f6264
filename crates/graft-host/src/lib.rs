//! Host collaborator contracts for Graft.
//!
//! The apply pipeline never talks to a concrete editor SDK. Everything it
//! needs from its surroundings is expressed as a small trait in this crate:
//! document text and edits ([`DocumentStore`]), symbol trees ([`SymbolIndex`]),
//! interactive prompts ([`PickerPrompt`]), terminal staging ([`TerminalSink`]),
//! diff/ghost presentation ([`PreviewPresenter`]), and workspace file writes
//! ([`WorkspaceFs`]). Hosts implement these; the pipeline holds them as
//! `Arc<dyn …>`.
//!
//! The crate also owns the shared result currency ([`ApplyResult`]) returned
//! by every pipeline operation.

mod documents;
mod error;
mod fs;
mod preview;
mod prompt;
mod result;
mod symbols;
mod terminal;

pub use documents::{DocumentEdit, DocumentId, DocumentStore};
pub use error::HostError;
pub use fs::{LocalWorkspaceFs, WorkspaceFs};
pub use preview::PreviewPresenter;
pub use prompt::PickerPrompt;
pub use result::{ApplyAction, ApplyResult, Notice, NoticeSeverity};
pub use symbols::{SymbolIndex, SymbolNode};
pub use terminal::TerminalSink;

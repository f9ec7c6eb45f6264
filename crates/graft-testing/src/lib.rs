//! Deterministic in-memory collaborators for tests.
//!
//! Every boundary trait in `graft-host` has a double here: documents live in
//! a map and apply edits for real, prompts replay a script, terminals and
//! preview presenters record what they were asked to show. Tests drive the
//! pipeline against these and assert on the recordings.
//!
//! The doubles never panic on unexpected use; a prompt with no scripted
//! answer fails with a descriptive [`HostError`](graft_host::HostError) so
//! the operation under test surfaces the problem as a result.

mod documents;
mod fs;
mod presenter;
mod prompt;
mod symbols;
mod terminal;

pub use documents::MemoryDocuments;
pub use fs::MemoryFs;
pub use presenter::{GhostShown, RecordingPresenter};
pub use prompt::ScriptedPicker;
pub use symbols::StaticSymbols;
pub use terminal::RecordingTerminal;

//! Intent classification for AI-generated code blocks.
//!
//! Given a block of code and its fence language, [`detect`] decides whether
//! the block should become a new file, an edit inside an existing file, or a
//! staged terminal command. Classification is deterministic, does no I/O, and
//! matches case-insensitively throughout.
//!
//! The heuristics are organized as ordered rule tables (see [`classify`]):
//! each stage is a list of `(predicate, confidence, extractor)` entries tried
//! in order, and a stage only wins when its first matching rule clears the
//! stage's acceptance threshold. This keeps the priority order a data
//! structure rather than a chain of conditionals.

pub mod classify;
pub mod language;
pub mod project;
pub mod shape;

pub use classify::{detect, DetectedIntent, Intent};
pub use language::normalize_language;
pub use project::{detect_project_type, ProjectType};

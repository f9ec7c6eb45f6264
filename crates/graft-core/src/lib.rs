//! Core text primitives for Graft.
//!
//! Everything in the apply pipeline ultimately lands as a textual splice into
//! a document snapshot. This crate owns the coordinate model (UTF-16
//! [`Position`]s over byte-indexed text), the [`LineIndex`] that converts
//! between the two, byte-offset [`TextEdit`]s, and the splice helpers that
//! compute a full proposed document from an insertion or replacement.

pub mod edit;
pub mod splice;
pub mod text;

pub use edit::{apply_text_edits, normalize_text_edits, EditError, TextEdit};
pub use splice::{splice_insert, splice_replace};
pub use text::{LineIndex, Position, Range};
pub use text_size::{TextRange, TextSize};

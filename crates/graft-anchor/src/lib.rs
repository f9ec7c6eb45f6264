//! Anchor resolution for in-file edits.
//!
//! Given a document and an optional anchor string (usually a symbol name),
//! this crate finds the best position to insert or replace code. Resolution
//! walks a fixed fallback chain, strongest evidence first:
//!
//! 1. exact symbol match against the document symbol tree,
//! 2. fuzzy symbol match (containment or small edit distance),
//! 3. plain text search over the raw document,
//! 4. the caller's cursor position.
//!
//! Every step degrades rather than fails: the chain always produces a
//! [`ResolvedLocation`], and the [`ResolveMethod`] on it tells the caller
//! how much trust to place in the result.

mod distance;
mod imports;
mod resolve;

pub use imports::import_insertion_position;
pub use resolve::{
    resolve_in_text, AnchorResolver, ResolveMethod, ResolvedLocation, IMPORTS_ANCHOR,
};

//! Splicing proposed code into a document snapshot.
//!
//! These helpers compute the full proposed content shown in previews. They
//! are pure byte splices over clamped UTF-16 coordinates: everything outside
//! the insertion point or replaced range is preserved verbatim, including the
//! prefix of the start line and the suffix of the end line.

use crate::edit::{apply_text_edits, EditError, TextEdit};
use crate::text::{LineIndex, Position, Range};

/// Insert `code` at `position`, returning the full proposed document.
pub fn splice_insert(original: &str, position: Position, code: &str) -> Result<String, EditError> {
    let index = LineIndex::new(original);
    let offset = index.clamped_offset(original, position);
    apply_text_edits(original, &[TextEdit::insert(offset, code)])
}

/// Replace `range` with `code`, returning the full proposed document.
pub fn splice_replace(original: &str, range: Range, code: &str) -> Result<String, EditError> {
    let index = LineIndex::new(original);
    let range = index.clamped_text_range(original, range);
    apply_text_edits(original, &[TextEdit::new(range, code)])
}

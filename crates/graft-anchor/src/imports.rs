//! Locates the import section of a document.

use graft_core::Position;
use graft_intent::shape::{is_comment_line, is_import_line, is_shebang};

/// How many leading lines are searched for an import block.
const IMPORT_SCAN_LINES: usize = 10;

/// How many leading lines are searched for the first code line when no
/// imports exist.
const HEADER_SCAN_LINES: usize = 5;

/// Returns the position where new import statements should be inserted.
///
/// Scans the first [`IMPORT_SCAN_LINES`] lines for a contiguous run of
/// import/use statements (blank and comment-only lines do not break the run)
/// and returns the start of the line following the last one. Documents
/// without imports fall back to the first real code line near the top, and
/// failing that, the very start of the document.
pub fn import_insertion_position(text: &str) -> Position {
    let mut last_import: Option<usize> = None;

    for (index, line) in text.lines().take(IMPORT_SCAN_LINES).enumerate() {
        let trimmed = line.trim();
        // `#include` also reads as a `#` comment, so test for imports first.
        if is_import_line(trimmed) {
            last_import = Some(index);
        } else if trimmed.is_empty() || is_comment_line(trimmed) {
            continue;
        } else if last_import.is_some() {
            break;
        }
    }

    if let Some(line) = last_import {
        return Position::new(line as u32 + 1, 0);
    }

    for (index, line) in text.lines().take(HEADER_SCAN_LINES).enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_shebang(trimmed) || is_comment_line(trimmed) {
            continue;
        }
        return Position::new(index as u32, 0);
    }

    Position::new(0, 0)
}

//! Positions, ranges, and line indexing over a text snapshot.

use serde::{Deserialize, Serialize};
pub use text_size::{TextRange, TextSize};

/// Editor-style position in UTF-16 code units.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Editor-style range in UTF-16 code units.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// Pre-computed line boundaries for a particular text snapshot.
///
/// `line_ends` excludes the line terminator, so `line_start(i)..line_end(i)`
/// is exactly the text of line `i`. `\n`, `\r\n`, and bare `\r` all terminate
/// a line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    line_ends: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![TextSize::from(0)];
        let mut line_ends = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            let terminator = match bytes[i] {
                b'\n' => 1,
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => 2,
                b'\r' => 1,
                _ => {
                    i += 1;
                    continue;
                }
            };
            line_ends.push(TextSize::from(i as u32));
            i += terminator;
            line_starts.push(TextSize::from(i as u32));
        }
        line_ends.push(TextSize::from(text.len() as u32));

        Self {
            line_starts,
            line_ends,
            text_len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.text_len
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    #[inline]
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        self.line_starts.get(line as usize).copied()
    }

    /// End of a line, excluding its terminator.
    #[inline]
    pub fn line_end(&self, line: u32) -> Option<TextSize> {
        self.line_ends.get(line as usize).copied()
    }

    fn line_of_offset(&self, offset: TextSize) -> usize {
        // Callers may pass `text_len` to mean EOF.
        let offset = offset.min(self.text_len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// Convert a byte offset to a UTF-16 position.
    ///
    /// `text` must be the same snapshot used to construct this [`LineIndex`].
    pub fn position(&self, text: &str, offset: TextSize) -> Position {
        debug_assert_eq!(TextSize::from(text.len() as u32), self.text_len);
        let offset = offset.min(self.text_len);
        let line = self.line_of_offset(offset);
        let line_start = self.line_starts[line];
        let offset = offset.min(self.line_ends[line]);

        let start = u32::from(line_start) as usize;
        let end = u32::from(offset) as usize;
        let character: u32 = text[start..end].chars().map(|c| c.len_utf16() as u32).sum();

        Position {
            line: line as u32,
            character,
        }
    }

    /// Convert a UTF-16 position into a byte offset, clamping instead of
    /// failing:
    ///
    /// - lines past the end of the text map to EOF
    /// - characters past the end of a line map to the line end
    /// - characters inside a surrogate pair map to the start of that character
    pub fn clamped_offset(&self, text: &str, position: Position) -> TextSize {
        debug_assert_eq!(TextSize::from(text.len() as u32), self.text_len);
        let (line_start, line_end) = match (
            self.line_start(position.line),
            self.line_end(position.line),
        ) {
            (Some(start), Some(end)) => (start, end),
            _ => return self.text_len,
        };

        let start = u32::from(line_start) as usize;
        let end = u32::from(line_end) as usize;
        let line_text = &text[start..end];

        let mut utf16 = 0u32;
        for (byte_idx, ch) in line_text.char_indices() {
            let ch_utf16 = ch.len_utf16() as u32;
            if utf16 + ch_utf16 > position.character {
                // At or inside this character; land on its start.
                return line_start + TextSize::from(byte_idx as u32);
            }
            utf16 += ch_utf16;
        }
        line_end
    }

    /// Convert a UTF-16 range into a byte range, clamping both endpoints and
    /// reordering them if the input was inverted.
    pub fn clamped_text_range(&self, text: &str, range: Range) -> TextRange {
        let a = self.clamped_offset(text, range.start);
        let b = self.clamped_offset(text, range.end);
        TextRange::new(a.min(b), a.max(b))
    }

    /// Convert a byte range to a UTF-16 range.
    pub fn range(&self, text: &str, range: TextRange) -> Range {
        Range {
            start: self.position(text, range.start()),
            end: self.position(text, range.end()),
        }
    }
}

//! Logical line index.
//!
//! Provides line addressing over a document using a Rope, supporting O(log N) access and editing.
//! All offsets and columns are expressed in Unicode scalar values (`char`s).

use ropey::Rope;

/// Rope-backed line index of one document.
#[derive(Clone, Default)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty line index (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Index `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get total line count.
    ///
    /// `N` line breaks yield `N + 1` lines; an empty document has one line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total number of chars.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// The whole text.
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }

    /// Get text of the specified line (excluding the line terminator)
    pub fn get_line_text(&self, line_number: usize) -> Option<String> {
        if line_number >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line_number).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }

        Some(text)
    }

    /// Character length of a line, excluding its terminator.
    pub fn line_len_chars(&self, line_number: usize) -> usize {
        self.get_line_text(line_number)
            .map(|text| text.chars().count())
            .unwrap_or(0)
    }

    /// `(line, column)` of a char offset, clamped to the document and to the line's content.
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);
        let char_in_line = char_offset - line_start_char;

        (line_idx, char_in_line.min(self.line_len_chars(line_idx)))
    }

    /// Char offset of `(line, column)`.
    ///
    /// Lines past the end map to the end of the document; columns past the end of a line are
    /// clamped to the line end.
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start_char = self.rope.line_to_char(line);
        line_start_char + column.min(self.line_len_chars(line))
    }

    /// Insert `text` at a char offset (clamped to the end).
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Remove `len_chars` chars starting at `start_char`; out-of-range parts are ignored.
    pub fn delete(&mut self, start_char: usize, len_chars: usize) {
        let start = start_char.min(self.rope.len_chars());
        let end = start.saturating_add(len_chars).min(self.rope.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }
}

impl std::fmt::Debug for LineIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineIndex")
            .field("line_count", &self.line_count())
            .field("char_count", &self.char_count())
            .finish()
    }
}

//! UTF-16 coordinate conversion between LSP positions and engine positions.
//!
//! Engine columns count `char`s; LSP columns count UTF-16 code units.

use code_actions::{Document, Position, Range};
use serde_json::{Value, json};

/// LSP `Position` (UTF-16 based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LspPosition {
    /// Zero-based line.
    pub line: u32,
    /// Zero-based UTF-16 code unit offset in the line.
    pub character: u32,
}

impl LspPosition {
    /// Create a position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Parse a `Position`-shaped JSON value.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            line: value.get("line")?.as_u64()? as u32,
            character: value.get("character")?.as_u64()? as u32,
        })
    }

    /// Serialize as an LSP `Position`.
    pub fn to_value(self) -> Value {
        json!({ "line": self.line, "character": self.character })
    }
}

/// LSP `Range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LspRange {
    /// Start position.
    pub start: LspPosition,
    /// End position (exclusive).
    pub end: LspPosition,
}

impl LspRange {
    /// Create a range.
    pub fn new(start: LspPosition, end: LspPosition) -> Self {
        Self { start, end }
    }

    /// Parse a `Range`-shaped JSON value.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            start: LspPosition::from_value(value.get("start")?)?,
            end: LspPosition::from_value(value.get("end")?)?,
        })
    }

    /// Serialize as an LSP `Range`.
    pub fn to_value(self) -> Value {
        json!({ "start": self.start.to_value(), "end": self.end.to_value() })
    }
}

/// UTF-16 length of the first `char_offset` chars of `text`.
pub fn char_offset_to_utf16(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}

/// Number of chars covering `utf16_offset` code units of `text`.
///
/// An offset inside a surrogate pair rounds up to the end of that char.
pub fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (index, ch) in text.chars().enumerate() {
        if units >= utf16_offset {
            return index;
        }
        units += ch.len_utf16();
    }
    text.chars().count()
}

/// Convert an engine position to an LSP position.
pub fn lsp_position_for(document: &Document, position: Position) -> LspPosition {
    let line_text = document.line_text(position.line).unwrap_or_default();
    LspPosition::new(
        position.line as u32,
        char_offset_to_utf16(&line_text, position.column) as u32,
    )
}

/// Convert an engine range to an LSP range.
pub fn lsp_range_for(document: &Document, range: Range) -> LspRange {
    LspRange::new(
        lsp_position_for(document, range.start),
        lsp_position_for(document, range.end),
    )
}

/// Convert an LSP position to an engine position.
pub fn position_from_lsp(document: &Document, position: LspPosition) -> Position {
    let line = position.line as usize;
    let line_text = document.line_text(line).unwrap_or_default();
    Position::new(
        line,
        utf16_to_char_offset(&line_text, position.character as usize),
    )
}

/// Convert an LSP range to an engine range.
pub fn range_from_lsp(document: &Document, range: LspRange) -> Range {
    Range::new(
        position_from_lsp(document, range.start),
        position_from_lsp(document, range.end),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_utf16_offsets() {
        let text = "a😀b";
        assert_eq!(char_offset_to_utf16(text, 0), 0);
        assert_eq!(char_offset_to_utf16(text, 2), 3);
        assert_eq!(char_offset_to_utf16(text, 3), 4);
        assert_eq!(utf16_to_char_offset(text, 3), 2);
        assert_eq!(utf16_to_char_offset(text, 2), 2);
        assert_eq!(utf16_to_char_offset(text, 99), 3);
    }

    #[test]
    fn test_document_ranges() {
        let doc = Document::new("/w/a.txt", "plaintext", "x = \"😀\" + y\nz\n");
        let range = Range::new(Position::new(0, 9), Position::new(1, 1));
        let lsp = lsp_range_for(&doc, range);
        assert_eq!(
            lsp,
            LspRange::new(LspPosition::new(0, 10), LspPosition::new(1, 1))
        );
        assert_eq!(range_from_lsp(&doc, lsp), range);
        assert_eq!(
            lsp.to_value(),
            json!({
                "start": { "line": 0, "character": 10 },
                "end": { "line": 1, "character": 1 }
            })
        );
        assert_eq!(LspRange::from_value(&lsp.to_value()), Some(lsp));
    }
}

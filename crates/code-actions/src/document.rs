//! Document model shared between the engine and its host.
//!
//! The host editor owns the real buffers. It hands the engine [`Document`] snapshots: a path,
//! a language identifier and the text, indexed by line. Positions use zero-based lines and
//! character (Unicode scalar value) columns.

use crate::edit::TextEdit;
use crate::line_index::LineIndex;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A half-open range between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
}

impl Range {
    /// Create a range from two positions.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// An empty range (caret) at `pos`.
    pub fn caret(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Returns `true` if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A snapshot of an open document.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    language_id: String,
    version: u64,
    index: LineIndex,
}

impl Document {
    /// Create a document snapshot.
    pub fn new(path: impl Into<PathBuf>, language_id: impl Into<String>, text: &str) -> Self {
        Self {
            path: path.into(),
            language_id: language_id.into(),
            version: 0,
            index: LineIndex::from_text(text),
        }
    }

    /// Filesystem path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Editor language identifier (e.g. `"python"`).
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Monotonic version, bumped on every applied edit batch.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Full document text.
    pub fn text(&self) -> String {
        self.index.get_text()
    }

    /// Number of lines (an empty document has one line).
    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    /// Text of `line` without its terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        self.index.get_line_text(line)
    }

    /// Document-relative character offset for `pos` (clamped to the document).
    pub fn offset_at(&self, pos: Position) -> usize {
        self.index.position_to_char_offset(pos.line, pos.column)
    }

    /// Position for a document-relative character offset (clamped to the document).
    pub fn position_at(&self, offset: usize) -> Position {
        let (line, column) = self.index.char_offset_to_position(offset);
        Position::new(line, column)
    }

    /// Underlying line index.
    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// Apply a batch of edits expressed against the current text.
    ///
    /// Edits are applied in descending start-offset order so earlier edits don't shift later
    /// ones. Returns the changed `(start, end)` ranges in pre-edit character offsets.
    pub fn apply_edits(&mut self, edits: &[TextEdit]) -> Vec<(usize, usize)> {
        let mut resolved = edits
            .iter()
            .map(|edit| {
                let start = self.offset_at(edit.range.start);
                let end = self.offset_at(edit.range.end);
                (start.min(end), start.max(end), edit.new_text.as_str())
            })
            .collect::<Vec<_>>();

        // At equal starts the wider edit goes first once reversed, so an insert lands in front of
        // a replacement at the same offset. Stable sort keeps same-offset inserts in queue order.
        resolved.sort_by_key(|(start, end, _)| (*start, *end));

        let mut changed = Vec::with_capacity(resolved.len());
        for (start, end, new_text) in resolved.into_iter().rev() {
            self.index.delete(start, end - start);
            self.index.insert(start, new_text);
            changed.push((start, end));
        }

        if !changed.is_empty() {
            self.version = self.version.saturating_add(1);
        }
        changed
    }
}

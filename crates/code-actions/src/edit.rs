//! Insert/replace operations produced by the edit resolver.
//!
//! A resolved action carries a [`WorkspaceEdit`]: text edits grouped by target document path.
//! Edits for one document are expressed against that document's text at resolve time and are
//! meant to be applied together.

use crate::document::{Position, Range};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A single text edit. Inserts are edits with an empty range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// The range to replace.
    pub range: Range,
    /// Replacement text (may contain newlines).
    pub new_text: String,
}

impl TextEdit {
    /// Insert `text` at `pos`.
    pub fn insert(pos: Position, text: impl Into<String>) -> Self {
        Self {
            range: Range::caret(pos),
            new_text: text.into(),
        }
    }

    /// Replace `range` with `text`.
    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: text.into(),
        }
    }

    /// Returns `true` if this edit deletes nothing.
    pub fn is_insert(&self) -> bool {
        self.range.is_empty()
    }
}

/// Edits grouped per target document.
///
/// Documents are kept in deterministic path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceEdit {
    changes: BTreeMap<PathBuf, Vec<TextEdit>>,
}

impl WorkspaceEdit {
    /// Create an empty edit set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an insertion.
    pub fn insert(&mut self, path: &Path, pos: Position, text: impl Into<String>) {
        self.push(path, TextEdit::insert(pos, text));
    }

    /// Queue a replacement.
    pub fn replace(&mut self, path: &Path, range: Range, text: impl Into<String>) {
        self.push(path, TextEdit::replace(range, text));
    }

    /// Queue an arbitrary edit.
    pub fn push(&mut self, path: &Path, edit: TextEdit) {
        self.changes.entry(path.to_path_buf()).or_default().push(edit);
    }

    /// Returns `true` if no edits were queued.
    pub fn is_empty(&self) -> bool {
        self.changes.values().all(Vec::is_empty)
    }

    /// Total number of edits across all documents.
    pub fn edit_count(&self) -> usize {
        self.changes.values().map(Vec::len).sum()
    }

    /// Edits targeting `path`, in queue order.
    pub fn edits_for(&self, path: &Path) -> &[TextEdit] {
        self.changes.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over `(path, edits)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[TextEdit])> {
        self.changes
            .iter()
            .map(|(path, edits)| (path.as_path(), edits.as_slice()))
    }

    /// Target document paths.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.changes.keys().map(PathBuf::as_path)
    }
}

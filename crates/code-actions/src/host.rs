//! Interfaces the engine requires from its host editor.
//!
//! The engine reads documents through [`DocumentSource`] and never performs file I/O. Anything
//! with an outward effect (applying edits, showing messages, opening files) goes through
//! [`Host`].

use crate::document::Document;
use crate::edit::WorkspaceEdit;
use std::path::{Path, PathBuf};

/// Read access to the host's open documents.
pub trait DocumentSource {
    /// The document in the focused editor.
    fn active_document(&self) -> Option<&Document>;

    /// All open documents.
    fn open_documents(&self) -> Box<dyn Iterator<Item = &Document> + '_>;

    /// The open document at `path`, if any.
    fn find_open_document(&self, path: &Path) -> Option<&Document> {
        self.open_documents().find(|doc| doc.path() == path)
    }

    /// Root of the workspace folder containing `path`.
    fn workspace_root(&self, path: &Path) -> Option<PathBuf>;
}

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Error message.
    Error,
    /// Informational message.
    Information,
}

/// An actionable button attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageAction {
    /// Open the document at this path.
    OpenDocument(PathBuf),
}

impl MessageAction {
    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenDocument(_) => "Open file",
        }
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    /// Severity.
    pub kind: MessageKind,
    /// Message text.
    pub text: String,
    /// Optional button.
    pub action: Option<MessageAction>,
}

impl UserMessage {
    /// An error message without a button.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
            action: None,
        }
    }

    /// An informational message without a button.
    pub fn information(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Information,
            text: text.into(),
            action: None,
        }
    }
}

/// The host editor.
pub trait Host: DocumentSource {
    /// Error returned when an edit cannot be applied.
    type Error: std::error::Error;

    /// Apply `edit` atomically across its documents.
    fn apply_edit(&mut self, edit: &WorkspaceEdit) -> Result<(), Self::Error>;

    /// Present `message`. Returns `true` if the user chose the message's action.
    fn show_message(&mut self, message: &UserMessage) -> bool;

    /// Ask the host to open the document at `path`.
    fn open_document(&mut self, path: &Path);
}

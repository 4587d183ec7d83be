//! In-memory host model.
//!
//! [`MemoryWorkspace`] owns a set of open documents keyed by path, the active document and the
//! workspace folders. It implements [`Host`], so it can drive the engine headlessly: edits are
//! applied to its documents, messages are recorded, and open requests are queued for the
//! embedding application to fulfil.

use crate::document::Document;
use crate::edit::WorkspaceEdit;
use crate::error::WorkspaceError;
use crate::host::{DocumentSource, Host, UserMessage};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A headless host: open documents, workspace folders and a message log.
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    documents: BTreeMap<PathBuf, Document>,
    active: Option<PathBuf>,
    roots: Vec<PathBuf>,
    messages: Vec<UserMessage>,
    open_requests: Vec<PathBuf>,
    accept_prompts: bool,
}

impl MemoryWorkspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if no document is open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Open a document with the given text.
    ///
    /// The first opened document becomes active.
    pub fn open_document_with_text(
        &mut self,
        path: impl Into<PathBuf>,
        language_id: &str,
        text: &str,
    ) -> Result<(), WorkspaceError> {
        let path = path.into();
        if self.documents.contains_key(&path) {
            return Err(WorkspaceError::PathAlreadyOpen(path));
        }

        self.documents
            .insert(path.clone(), Document::new(path.clone(), language_id, text));
        if self.active.is_none() {
            self.active = Some(path);
        }
        Ok(())
    }

    /// Close a document.
    pub fn close_document(&mut self, path: &Path) -> Result<(), WorkspaceError> {
        if self.documents.remove(path).is_none() {
            return Err(WorkspaceError::DocumentNotFound(path.to_path_buf()));
        }
        if self.active.as_deref() == Some(path) {
            self.active = self.documents.keys().next().cloned();
        }
        Ok(())
    }

    /// Focus a document.
    pub fn set_active(&mut self, path: &Path) -> Result<(), WorkspaceError> {
        if !self.documents.contains_key(path) {
            return Err(WorkspaceError::DocumentNotFound(path.to_path_buf()));
        }
        self.active = Some(path.to_path_buf());
        Ok(())
    }

    /// Register a workspace folder.
    pub fn add_workspace_root(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    /// The document at `path`.
    pub fn document(&self, path: &Path) -> Option<&Document> {
        self.documents.get(path)
    }

    /// Full text of the document at `path`.
    pub fn document_text(&self, path: &Path) -> Result<String, WorkspaceError> {
        self.documents
            .get(path)
            .map(Document::text)
            .ok_or_else(|| WorkspaceError::DocumentNotFound(path.to_path_buf()))
    }

    /// Messages shown so far.
    pub fn messages(&self) -> &[UserMessage] {
        &self.messages
    }

    /// Drain the message log.
    pub fn take_messages(&mut self) -> Vec<UserMessage> {
        std::mem::take(&mut self.messages)
    }

    /// Paths the engine asked to open.
    pub fn open_requests(&self) -> &[PathBuf] {
        &self.open_requests
    }

    /// Whether message buttons are "clicked" (default: no).
    pub fn set_accept_prompts(&mut self, accept: bool) {
        self.accept_prompts = accept;
    }
}

impl DocumentSource for MemoryWorkspace {
    fn active_document(&self) -> Option<&Document> {
        self.active.as_ref().and_then(|path| self.documents.get(path))
    }

    fn open_documents(&self) -> Box<dyn Iterator<Item = &Document> + '_> {
        Box::new(self.documents.values())
    }

    fn find_open_document(&self, path: &Path) -> Option<&Document> {
        self.documents.get(path)
    }

    /// The longest registered root containing `path`.
    fn workspace_root(&self, path: &Path) -> Option<PathBuf> {
        self.roots
            .iter()
            .filter(|root| path.starts_with(root))
            .max_by_key(|root| root.components().count())
            .cloned()
    }
}

impl Host for MemoryWorkspace {
    type Error = WorkspaceError;

    /// Applies all edits, or none when a target document is not open.
    fn apply_edit(&mut self, edit: &WorkspaceEdit) -> Result<(), WorkspaceError> {
        if let Some(missing) = edit.paths().find(|path| !self.documents.contains_key(*path)) {
            return Err(WorkspaceError::DocumentNotFound(missing.to_path_buf()));
        }

        for (path, edits) in edit.iter() {
            if let Some(document) = self.documents.get_mut(path) {
                document.apply_edits(edits);
                debug!(
                    path = %path.display(),
                    edits = edits.len(),
                    version = document.version(),
                    "applied edits"
                );
            }
        }
        Ok(())
    }

    fn show_message(&mut self, message: &UserMessage) -> bool {
        self.messages.push(message.clone());
        self.accept_prompts && message.action.is_some()
    }

    fn open_document(&mut self, path: &Path) {
        self.open_requests.push(path.to_path_buf());
    }
}

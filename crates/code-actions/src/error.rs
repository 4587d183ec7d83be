use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// A malformed rule. The loader drops the rule and keeps its siblings.
pub enum RuleError {
    #[error("rule has no edit steps")]
    /// An explicit `edits` list was empty.
    EmptyEdits,

    #[error("edit step {step}: `text` is required")]
    /// An insert or replace step without text.
    MissingText {
        /// Zero-based step index.
        step: usize,
    },

    #[error("edit step {step}: replace requires `replaceFind`")]
    /// A replace step without a locate pattern.
    MissingLocatePattern {
        /// Zero-based step index.
        step: usize,
    },

    #[error("unknown action '{0}'")]
    /// `action` was neither `insert` nor `replace`.
    UnknownAction(String),

    #[error("unknown insert position '{0}'")]
    /// `where` was not a known anchor.
    UnknownAnchor(String),

    #[error("unknown needsContinue value '{0}'")]
    /// `needsContinue` was a string other than `nextCondFail`.
    UnknownContinuation(String),

    #[error("invalid pattern '{pattern}': {message}")]
    /// A regex failed to compile.
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// The compiler error message.
        message: String,
    },
}

impl RuleError {
    pub(crate) fn invalid_pattern(pattern: &str, err: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Why an action could not be resolved into edits.
pub enum ResolveError {
    #[error("document is not open: {}", path.display())]
    /// A referenced file is not open in the host.
    UnresolvedDocument {
        /// Resolved path of the referenced file.
        path: PathBuf,
    },

    #[error("current file not in this workspace: {}", path.display())]
    /// A workspace-rooted reference was used outside a workspace.
    NoWorkspaceRoot {
        /// Path of the active document.
        path: PathBuf,
    },

    #[error("no active document")]
    /// The host has no active document.
    NoActiveDocument,

    #[error("code actions for '{language}' are inactive")]
    /// The action's provider was deactivated by a configuration reload.
    ProviderInactive {
        /// Language identifier of the provider.
        language: String,
    },
}

/// In-memory workspace errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("document already open: {}", .0.display())]
    /// A document with this path already exists.
    PathAlreadyOpen(PathBuf),

    #[error("document not found: {}", .0.display())]
    /// No open document has this path.
    DocumentNotFound(PathBuf),
}

//! Candidate actions: matched, not-yet-resolved rule occurrences.

use crate::edit::WorkspaceEdit;
use crate::error::ResolveError;
use crate::host::{MessageAction, MessageKind, UserMessage};
use crate::rule::RuleSpec;
use crate::template::{LookupTables, MatchContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Code action kind reported for every candidate.
pub const QUICKFIX_KIND: &str = "quickfix";

/// Shown when a multi-step action halted and must be applied again.
pub const CONTINUE_MESSAGE: &str = "Please apply action again to continue the edits.";

/// Shown when a workspace-rooted file reference is used outside a workspace.
pub const NO_WORKSPACE_MESSAGE: &str = "Current file not in this Workspace";

/// A rule occurrence bound to the evidence that produced it.
///
/// The rule and the lookup tables are shared with the configuration epoch that produced the
/// candidate; templates are rendered lazily from the captured context when the action is
/// resolved.
#[derive(Debug, Clone)]
pub struct CandidateAction {
    title: String,
    language: String,
    document: PathBuf,
    rule: Arc<RuleSpec>,
    context: MatchContext,
    tables: Arc<LookupTables>,
    edit: Option<WorkspaceEdit>,
}

impl CandidateAction {
    pub(crate) fn new(
        title: String,
        language: &str,
        document: &Path,
        rule: Arc<RuleSpec>,
        context: MatchContext,
        tables: Arc<LookupTables>,
    ) -> Self {
        Self {
            title,
            language: language.to_string(),
            document: document.to_path_buf(),
            rule,
            context,
            tables,
            edit: None,
        }
    }

    /// Rendered title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Action kind (always [`QUICKFIX_KIND`]).
    pub fn kind(&self) -> &'static str {
        QUICKFIX_KIND
    }

    /// Language identifier of the provider that produced the candidate.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Path of the document the candidate was produced for.
    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Originating rule.
    pub fn rule(&self) -> &Arc<RuleSpec> {
        &self.rule
    }

    /// Captured evidence.
    pub fn context(&self) -> &MatchContext {
        &self.context
    }

    /// Lookup tables of the producing configuration epoch.
    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    /// Attached edits, once resolved.
    pub fn edit(&self) -> Option<&WorkspaceEdit> {
        self.edit.as_ref()
    }

    /// Returns `true` once edits have been attached.
    pub fn is_resolved(&self) -> bool {
        self.edit.is_some()
    }

    pub(crate) fn attach_edit(&mut self, edit: WorkspaceEdit) {
        self.edit = Some(edit);
    }

    pub(crate) fn detach_edit(&mut self) {
        self.edit = None;
    }
}

/// Outcome of resolving a candidate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Edits (possibly none) were attached to the action.
    Resolved {
        /// The action halted mid-sequence and should be applied again.
        needs_reapply: bool,
    },
    /// Nothing was attached.
    Unresolved(ResolveError),
}

impl Resolution {
    /// Returns `true` if edits were attached.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Messages the host should present for this outcome.
    pub fn messages(&self) -> Vec<UserMessage> {
        match self {
            Self::Resolved {
                needs_reapply: true,
            } => vec![UserMessage::information(CONTINUE_MESSAGE)],
            Self::Resolved { .. } => Vec::new(),
            Self::Unresolved(ResolveError::UnresolvedDocument { path }) => {
                vec![UserMessage {
                    kind: MessageKind::Error,
                    text: format!("Please visit file, and keep tab: {}", path.display()),
                    action: Some(MessageAction::OpenDocument(path.clone())),
                }]
            }
            Self::Unresolved(ResolveError::NoWorkspaceRoot { .. }) => {
                vec![UserMessage::error(NO_WORKSPACE_MESSAGE)]
            }
            Self::Unresolved(_) => Vec::new(),
        }
    }
}

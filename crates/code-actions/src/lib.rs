#![warn(missing_docs)]
//! Code Actions - Configuration-Driven Quick-Fix Engine
//!
//! # Overview
//!
//! `code-actions` turns statically configured rules into editor quick fixes. A rule names the
//! diagnostics (or the text around the cursor) it applies to, and an ordered list of edit steps
//! that insert or replace text, in the current document or in another open one.
//!
//! The crate is headless: the host editor supplies documents and diagnostics through
//! [`DocumentSource`] and receives edits and messages through [`Host`]. [`MemoryWorkspace`] is
//! an in-memory host for tests and tools.
//!
//! # Flow
//!
//! ```text
//! Configuration ──reload──▶ Engine ──query_actions──▶ CandidateAction
//!                                                          │
//!                            Host ◀──invoke (resolve)──────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use code_actions::{
//!     ActionSet, Configuration, Diagnostic, DocumentSource, EditStep, Engine, LanguageActionSet,
//!     MemoryWorkspace, Position, Range, RuleSpec, compile_patterns,
//! };
//! use std::path::Path;
//!
//! let rule = RuleSpec::single("Import {{diag:$1}}", EditStep::insert("import {{diag:$1}}\n"))?
//!     .gated_on_diagnostics(compile_patterns(&[r"undefined name '(\w+)'"])?);
//!
//! let mut engine = Engine::new();
//! engine.reload(Configuration {
//!     action_sets: vec![LanguageActionSet::new(["python"], ActionSet::new(vec![rule]))],
//!     ..Default::default()
//! });
//!
//! let mut ws = MemoryWorkspace::new();
//! ws.open_document_with_text("/w/main.py", "python", "print(os.name)\n")?;
//!
//! let diagnostics = [Diagnostic::new(Range::default(), "undefined name 'os'")];
//! let doc = ws.active_document().unwrap();
//! let mut actions = engine.query_actions(doc, Range::caret(Position::new(0, 0)), &diagnostics);
//! assert_eq!(actions[0].title(), "Import os");
//!
//! engine.invoke(&mut actions[0], &mut ws)?;
//! assert_eq!(
//!     ws.document_text(Path::new("/w/main.py"))?,
//!     "import os\nprint(os.name)\n"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Description
//!
//! - [`line_index`] - Rope based line index
//! - [`document`] - Document snapshots and positions
//! - [`locator`] - Regex location over document lines
//! - [`template`] - Placeholder substitution
//! - [`rule`] - Rule and edit step model
//! - [`resolver`] - Edit resolution
//! - [`engine`] - Providers, configuration snapshots and the engine facade

pub mod action;
pub mod diagnostics;
pub mod document;
pub mod edit;
pub mod engine;
mod error;
pub mod host;
pub mod line_index;
pub mod locator;
pub mod provider;
pub mod resolver;
pub mod rule;
pub mod template;
pub mod workspace;

pub use action::{
    CONTINUE_MESSAGE, CandidateAction, NO_WORKSPACE_MESSAGE, QUICKFIX_KIND, Resolution,
};
pub use diagnostics::{Diagnostic, DiagnosticSeverity};
pub use document::{Document, Position, Range};
pub use edit::{TextEdit, WorkspaceEdit};
pub use engine::{Configuration, Engine, LanguageActionSet, ReloadSummary};
pub use error::{ResolveError, RuleError, WorkspaceError};
pub use host::{DocumentSource, Host, MessageAction, MessageKind, UserMessage};
pub use line_index::LineIndex;
pub use locator::{CapturedMatch, LocatedMatch, find_location};
pub use provider::{ActionSet, LanguageProvider};
pub use resolver::{ResolvedEdits, resolve_edits};
pub use rule::{
    ActionQuery, Continuation, EditStep, InsertAnchor, RuleMatch, RuleSpec, StepCondition,
    StepOperation, compile_pattern, compile_patterns,
};
pub use template::{
    CursorMatch, DiagnosticMatch, FileVariables, LookupTables, MatchContext, TemplateEvaluator,
    UNKNOWN_LOOKUP,
};
pub use workspace::MemoryWorkspace;

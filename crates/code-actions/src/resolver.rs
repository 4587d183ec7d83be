//! Turning a candidate action into concrete workspace edits.
//!
//! Steps run in order against a read-only view of the host. Each step picks its target
//! document, checks its guard, renders its text and produces at most one [`TextEdit`]. A step's
//! continuation setting can halt the sequence early; the user then re-applies the action and the
//! guards of already-applied steps skip them.
//!
//! [`TextEdit`]: crate::edit::TextEdit

use crate::action::CandidateAction;
use crate::document::{Document, Position};
use crate::edit::WorkspaceEdit;
use crate::error::ResolveError;
use crate::host::DocumentSource;
use crate::locator::{find_lines, find_literal, find_location};
use crate::rule::{
    Continuation, EditStep, InsertAnchor, StepCondition, StepOperation, compile_pattern,
};
use crate::template::{FileVariables, TemplateEvaluator};
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Edits produced by a successful resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEdits {
    /// Accumulated edits.
    pub edit: WorkspaceEdit,
    /// The sequence halted and the action should be applied again.
    pub needs_reapply: bool,
}

/// Lexically normalize `path`: drop `.` components and fold `..` into its parent.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Map a rendered file reference to a path.
///
/// A leading `/` is relative to the workspace root of `active`; anything else is relative to the
/// directory of `active`.
pub fn resolve_file_reference(
    reference: &str,
    active: &Document,
    source: &dyn DocumentSource,
) -> Result<PathBuf, ResolveError> {
    let path = match reference.strip_prefix('/') {
        Some(rooted) => {
            let root = source.workspace_root(active.path()).ok_or_else(|| {
                ResolveError::NoWorkspaceRoot {
                    path: active.path().to_path_buf(),
                }
            })?;
            root.join(rooted)
        }
        None => active
            .path()
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(reference),
    };
    Ok(normalize_path(&path))
}

/// Compile rendered patterns. A pattern that only becomes invalid once rendered is treated as
/// matching nothing.
fn compile_rendered(patterns: &[String]) -> Option<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| match compile_pattern(pattern) {
            Ok(regex) => Some(regex),
            Err(err) => {
                debug!(%err, "rendered pattern does not compile");
                None
            }
        })
        .collect()
}

struct StepResolver<'a> {
    evaluator: TemplateEvaluator<'a>,
    active: &'a Document,
    source: &'a dyn DocumentSource,
    default_file: Option<String>,
}

impl<'a> StepResolver<'a> {
    fn target(&self, step: &EditStep) -> Result<&'a Document, ResolveError> {
        let reference = step
            .target_file
            .as_deref()
            .map(|file| self.evaluator.render(file))
            .or_else(|| self.default_file.clone());
        let Some(reference) = reference else {
            return Ok(self.active);
        };

        let path = resolve_file_reference(&reference, self.active, self.source)?;
        self.source
            .find_open_document(&path)
            .ok_or(ResolveError::UnresolvedDocument { path })
    }

    /// Returns `true` if the guard's pattern chain is found in `document`.
    fn is_satisfied(&self, condition: &StepCondition, document: &Document) -> bool {
        let Some(find) = compile_rendered(&self.evaluator.render_all(&condition.find)) else {
            return false;
        };
        let Some(stop) = self.stop_pattern(condition.stop.as_deref()) else {
            return false;
        };
        find_location(document, &find, stop.as_ref()).is_some()
    }

    fn pattern(&self, template: &str) -> Option<Regex> {
        compile_rendered(&[self.evaluator.render(template)])?.pop()
    }

    /// `None` when a configured stop pattern does not compile once rendered.
    fn stop_pattern(&self, template: Option<&str>) -> Option<Option<Regex>> {
        match template {
            Some(template) => self.pattern(template).map(Some),
            None => Some(None),
        }
    }

    /// Line receiving an insert; line 0 when nothing matches.
    fn insertion_line(
        &self,
        document: &Document,
        anchor: InsertAnchor,
        locate: Option<&str>,
    ) -> usize {
        let Some(pattern) = locate.and_then(|locate| self.pattern(locate)) else {
            return 0;
        };
        match anchor {
            InsertAnchor::Start => 0,
            InsertAnchor::BeforeFirstMatch => find_lines(document, &pattern).next().unwrap_or(0),
            InsertAnchor::AfterLastMatch => find_lines(document, &pattern)
                .last()
                .map_or(0, |line| line + 1),
            InsertAnchor::BeforeLastMatch => find_lines(document, &pattern).last().unwrap_or(0),
        }
    }

    /// Append the step's edit, if any, to `edit`.
    ///
    /// Returns `false` when an insert is skipped because its text is already present.
    fn apply(
        &self,
        step: &EditStep,
        text: String,
        document: &Document,
        edit: &mut WorkspaceEdit,
    ) -> bool {
        match &step.operation {
            StepOperation::Insert { anchor, locate } => {
                if find_literal(document, &text).is_some() {
                    debug!(
                        path = %document.path().display(),
                        "text already present, skipping insert"
                    );
                    return false;
                }
                let line = self.insertion_line(document, *anchor, locate.as_deref());
                let text = if line == document.line_count() {
                    format!("\n{text}")
                } else {
                    text
                };
                edit.insert(document.path(), Position::new(line, 0), text);
            }
            StepOperation::Replace { locate, stop } => {
                let found = compile_rendered(&self.evaluator.render_all(locate))
                    .zip(self.stop_pattern(stop.as_deref()))
                    .and_then(|(patterns, stop)| {
                        find_location(document, &patterns, stop.as_ref())
                    });
                match found {
                    Some(found) => {
                        let replacement = found.captured.substitute(&text);
                        edit.replace(document.path(), found.range(), replacement);
                    }
                    None => debug!(path = %document.path().display(), "replace target not found"),
                }
            }
        }
        true
    }
}

/// Resolve `action` into edits against the documents of `source`.
///
/// Any failure discards the edits gathered so far.
pub fn resolve_edits(
    action: &CandidateAction,
    source: &dyn DocumentSource,
) -> Result<ResolvedEdits, ResolveError> {
    let active = source
        .active_document()
        .ok_or(ResolveError::NoActiveDocument)?;
    let file = FileVariables::from_path(active.path());
    let evaluator = TemplateEvaluator::new(action.context(), action.tables()).with_file(&file);
    let rule = action.rule();
    let resolver = StepResolver {
        evaluator,
        active,
        source,
        default_file: rule.default_file().map(|file| evaluator.render(file)),
    };

    let steps = rule.steps();
    let mut resolved = ResolvedEdits::default();

    for (index, step) in steps.iter().enumerate() {
        let document = resolver.target(step)?;

        if let Some(condition) = &step.condition
            && resolver.is_satisfied(condition, document)
        {
            debug!(step = index, "condition already satisfied");
            continue;
        }

        let text = evaluator.render(&step.text);
        if text.is_empty() {
            debug!(step = index, "rendered text is empty, halting");
            break;
        }

        if !resolver.apply(step, text, document, &mut resolved.edit) {
            continue;
        }

        match step.effective_continuation() {
            Some(Continuation::Always) => {
                resolved.needs_reapply = true;
                break;
            }
            Some(Continuation::Never) => break,
            Some(Continuation::OnNextConditionFailure) => {
                // An unguarded next step is never satisfied.
                let next_unsatisfied = steps.get(index + 1).is_some_and(|next| {
                    !next
                        .condition
                        .as_ref()
                        .is_some_and(|condition| resolver.is_satisfied(condition, document))
                });
                if next_unsatisfied {
                    resolved.needs_reapply = true;
                    break;
                }
            }
            None => {}
        }
    }

    debug!(
        title = action.title(),
        edits = resolved.edit.edit_count(),
        needs_reapply = resolved.needs_reapply,
        "resolved code action"
    );
    Ok(resolved)
}

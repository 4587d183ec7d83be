//! Statically configured quick-fix rules.
//!
//! A [`RuleSpec`] is built once per configuration read. Defaults are applied eagerly and
//! malformed rules are rejected with a [`RuleError`] at construction time, so resolution never
//! has to second-guess the shape of a rule.
//!
//! Textual properties stay templates: they are rendered against the captured
//! [`MatchContext`](crate::template::MatchContext) when the rule is tested or resolved.

use crate::diagnostics::Diagnostic;
use crate::document::{Document, Range};
use crate::error::RuleError;
use crate::locator::{CapturedMatch, find_enclosing_match, find_literal};
use crate::template::{
    CursorMatch, DiagnosticMatch, FileVariables, LookupTables, MatchContext, TemplateEvaluator,
};
use regex::Regex;
use std::str::FromStr;

/// Where an insert step places its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertAnchor {
    /// Line 0.
    #[default]
    Start,
    /// Before the first line matching the locate pattern.
    BeforeFirstMatch,
    /// After the last line matching the locate pattern.
    AfterLastMatch,
    /// Before the last line matching the locate pattern.
    ///
    /// Kept for configurations written against the `beforeLast` variant of the anchor.
    BeforeLastMatch,
}

impl FromStr for InsertAnchor {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "beforeFirst" => Ok(Self::BeforeFirstMatch),
            "afterLast" => Ok(Self::AfterLastMatch),
            "beforeLast" => Ok(Self::BeforeLastMatch),
            other => Err(RuleError::UnknownAnchor(other.to_string())),
        }
    }
}

/// What happens after a step produced its edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Halt and ask the user to apply the action again.
    Always,
    /// Halt silently.
    Never,
    /// Halt and ask to apply again if the next step's condition is not satisfied yet.
    OnNextConditionFailure,
}

impl Continuation {
    /// Map a `needsContinue` flag.
    pub fn from_flag(flag: bool) -> Self {
        if flag { Self::Always } else { Self::Never }
    }
}

/// Parses the named mode of a `needsContinue` string. Booleans are flags, not modes, so `"true"`
/// and `"false"` are rejected.
impl FromStr for Continuation {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nextCondFail" => Ok(Self::OnNextConditionFailure),
            other => Err(RuleError::UnknownContinuation(other.to_string())),
        }
    }
}

/// Step guard: when `find` is located (before `stop`), the step is already satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCondition {
    /// Pattern templates, chased in order.
    pub find: Vec<String>,
    /// Optional stop pattern template.
    pub stop: Option<String>,
}

/// The edit a step performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOperation {
    /// Insert `text` at column 0 of an anchored line.
    Insert {
        /// Anchor (forced to [`InsertAnchor::Start`] when `locate` is absent).
        anchor: InsertAnchor,
        /// Locate pattern template.
        locate: Option<String>,
    },
    /// Replace the located match with `text`.
    Replace {
        /// Pattern templates, chased in order; the last one's match is replaced.
        locate: Vec<String>,
        /// Optional stop pattern template.
        stop: Option<String>,
    },
}

/// One unit of edit work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditStep {
    /// File reference template; `None` targets the active document.
    pub target_file: Option<String>,
    /// Insert or replace.
    pub operation: StepOperation,
    /// Optional guard.
    pub condition: Option<StepCondition>,
    /// Inserted text or replacement template.
    pub text: String,
    /// Explicit continuation, if configured.
    pub continuation: Option<Continuation>,
}

impl EditStep {
    /// An insertion at the start of the document.
    pub fn insert(text: impl Into<String>) -> Self {
        Self {
            target_file: None,
            operation: StepOperation::Insert {
                anchor: InsertAnchor::Start,
                locate: None,
            },
            condition: None,
            text: text.into(),
            continuation: None,
        }
    }

    /// A replacement of the first match of `locate`.
    pub fn replace(locate: impl Into<String>, text: impl Into<String>) -> Self {
        Self::replace_chain(vec![locate.into()], text)
    }

    /// A replacement of the last match of a chased pattern sequence.
    pub fn replace_chain(locate: Vec<String>, text: impl Into<String>) -> Self {
        Self {
            target_file: None,
            operation: StepOperation::Replace { locate, stop: None },
            condition: None,
            text: text.into(),
            continuation: None,
        }
    }

    /// Anchor an insertion relative to lines matching `locate`.
    ///
    /// Has no effect on replace steps.
    pub fn anchored(mut self, anchor: InsertAnchor, locate: impl Into<String>) -> Self {
        if let StepOperation::Insert {
            anchor: a,
            locate: l,
        } = &mut self.operation
        {
            *a = anchor;
            *l = Some(locate.into());
        }
        self
    }

    /// Set a stop pattern for a replace step.
    pub fn with_replace_stop(mut self, stop: impl Into<String>) -> Self {
        if let StepOperation::Replace { stop: s, .. } = &mut self.operation {
            *s = Some(stop.into());
        }
        self
    }

    /// Target another document.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.target_file = Some(file.into());
        self
    }

    /// Skip the step when `find` is located before `stop`.
    pub fn unless_found(mut self, find: Vec<String>, stop: Option<String>) -> Self {
        self.condition = Some(StepCondition { find, stop });
        self
    }

    /// Set an explicit continuation.
    pub fn with_continuation(mut self, continuation: Continuation) -> Self {
        self.continuation = Some(continuation);
        self
    }

    /// Continuation after this step's edit, with the default applied.
    ///
    /// A guarded step halts with a prompt unless configured otherwise.
    pub fn effective_continuation(&self) -> Option<Continuation> {
        self.continuation.or_else(|| {
            self.condition
                .as_ref()
                .map(|_| Continuation::Always)
        })
    }

    fn normalize(mut self) -> Self {
        if let StepOperation::Insert { anchor, locate } = &mut self.operation
            && locate.is_none()
        {
            *anchor = InsertAnchor::Start;
        }
        self
    }

    fn validate(&self, step: usize) -> Result<(), RuleError> {
        if self.text.is_empty() {
            return Err(RuleError::MissingText { step });
        }

        let mut patterns: Vec<&String> = Vec::new();
        match &self.operation {
            StepOperation::Insert { locate, .. } => patterns.extend(locate),
            StepOperation::Replace { locate, stop } => {
                if locate.is_empty() || locate.iter().any(String::is_empty) {
                    return Err(RuleError::MissingLocatePattern { step });
                }
                patterns.extend(locate);
                patterns.extend(stop);
            }
        }
        if let Some(condition) = &self.condition {
            patterns.extend(&condition.find);
            patterns.extend(&condition.stop);
        }

        for pattern in patterns {
            if !is_templated(pattern) {
                compile_pattern(pattern)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn is_templated(text: &str) -> bool {
    text.contains("{{") || text.contains("${")
}

/// Compile a single pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|err| RuleError::invalid_pattern(pattern, err))
}

/// Compile diagnostic or cursor patterns.
pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, RuleError> {
    patterns
        .iter()
        .map(|p| compile_pattern(p.as_ref()))
        .collect()
}

/// A context query: the document, the queried range and the diagnostics inside it.
#[derive(Debug, Clone, Copy)]
pub struct ActionQuery<'a> {
    /// The queried document.
    pub document: &'a Document,
    /// The queried range; its start is the cursor.
    pub range: Range,
    /// Diagnostics in context.
    pub diagnostics: &'a [Diagnostic],
}

/// A successful rule test.
#[derive(Debug, Clone)]
pub struct RuleMatch {
    /// Rendered title.
    pub title: String,
    /// Captured evidence.
    pub context: MatchContext,
}

/// A named rule: gates plus an ordered, non-empty list of edit steps.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    title: String,
    diagnostic_patterns: Vec<Regex>,
    cursor_pattern: Option<Regex>,
    steps: Vec<EditStep>,
    default_file: Option<String>,
    explicit_steps: bool,
}

impl RuleSpec {
    /// A rule whose own fields form its single edit step.
    pub fn single(title: impl Into<String>, step: EditStep) -> Result<Self, RuleError> {
        Self::build(title.into(), vec![step], false)
    }

    /// A rule with an explicit `edits` list.
    pub fn with_steps(title: impl Into<String>, steps: Vec<EditStep>) -> Result<Self, RuleError> {
        Self::build(title.into(), steps, true)
    }

    fn build(title: String, steps: Vec<EditStep>, explicit_steps: bool) -> Result<Self, RuleError> {
        if steps.is_empty() {
            return Err(RuleError::EmptyEdits);
        }
        let steps = steps
            .into_iter()
            .map(EditStep::normalize)
            .collect::<Vec<_>>();
        for (index, step) in steps.iter().enumerate() {
            step.validate(index)?;
        }

        Ok(Self {
            title,
            diagnostic_patterns: Vec::new(),
            cursor_pattern: None,
            steps,
            default_file: None,
            explicit_steps,
        })
    }

    /// Gate the rule on diagnostics whose message matches any of `patterns`.
    pub fn gated_on_diagnostics(mut self, patterns: Vec<Regex>) -> Self {
        self.diagnostic_patterns = patterns;
        self
    }

    /// Gate the rule on a match of `pattern` spanning the cursor.
    pub fn gated_on_cursor(mut self, pattern: Regex) -> Self {
        self.cursor_pattern = Some(pattern);
        self
    }

    /// File reference applied to steps that have none.
    pub fn with_default_file(mut self, file: impl Into<String>) -> Self {
        self.default_file = Some(file.into());
        self
    }

    /// Title template.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Edit steps (never empty).
    pub fn steps(&self) -> &[EditStep] {
        &self.steps
    }

    /// Default file reference template.
    pub fn default_file(&self) -> Option<&str> {
        self.default_file.as_deref()
    }

    /// Returns `true` if the rule needs a matching diagnostic.
    pub fn is_diagnostic_gated(&self) -> bool {
        !self.diagnostic_patterns.is_empty()
    }

    /// Returns `true` if the rule needs a match around the cursor.
    pub fn is_cursor_gated(&self) -> bool {
        self.cursor_pattern.is_some()
    }

    /// Text searched to suppress an already-applied rule, if the rule qualifies.
    ///
    /// Only a single implicit insert into the current document qualifies.
    fn dedup_text(&self) -> Option<&str> {
        if self.explicit_steps || self.default_file.is_some() {
            return None;
        }
        let [step] = self.steps.as_slice() else {
            return None;
        };
        match step.operation {
            StepOperation::Insert { .. } if step.target_file.is_none() => Some(&step.text),
            _ => None,
        }
    }

    fn match_diagnostics(&self, diagnostics: &[Diagnostic]) -> Option<DiagnosticMatch> {
        diagnostics.iter().find_map(|diagnostic| {
            self.diagnostic_patterns.iter().find_map(|pattern| {
                pattern
                    .captures(&diagnostic.message)
                    .map(|caps| DiagnosticMatch {
                        captured: CapturedMatch::from_captures(&caps, pattern),
                        diagnostic: diagnostic.clone(),
                    })
            })
        })
    }

    /// Test the rule against a query.
    ///
    /// Returns `None` when a gate fails or when the rule's text is already present in the
    /// document.
    pub fn test(&self, query: &ActionQuery<'_>, tables: &LookupTables) -> Option<RuleMatch> {
        let mut context = MatchContext::default();

        if self.is_diagnostic_gated() {
            if query.diagnostics.is_empty() {
                return None;
            }
            context.diagnostic = Some(self.match_diagnostics(query.diagnostics)?);
        }

        if let Some(pattern) = &self.cursor_pattern {
            let cursor = query.document.offset_at(query.range.start);
            let (captured, start, end) =
                find_enclosing_match(&query.document.text(), pattern, cursor)?;
            context.cursor = Some(CursorMatch {
                captured,
                span: (start, end),
            });
        }

        let file = FileVariables::from_path(query.document.path());
        let evaluator = TemplateEvaluator::new(&context, tables).with_file(&file);
        let title = evaluator.render(&self.title);

        if let Some(text) = self.dedup_text() {
            let text = evaluator.render(text);
            if find_literal(query.document, &text).is_some() {
                return None;
            }
        }

        Some(RuleMatch { title, context })
    }
}

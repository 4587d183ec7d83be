//! Serde model of one configured rule, and its conversion into a [`RuleSpec`].

use code_actions::{
    Continuation, EditStep, InsertAnchor, RuleError, RuleSpec, compile_pattern, compile_patterns,
};
use serde::Deserialize;

const ACTION_INSERT: &str = "insert";
const ACTION_REPLACE: &str = "replace";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
/// A field that takes one pattern or a list of patterns.
pub enum OneOrMany {
    /// A single pattern.
    One(String),
    /// Patterns chased in order.
    Many(Vec<String>),
}

impl OneOrMany {
    /// Non-empty patterns, in order.
    pub fn into_vec(self) -> Vec<String> {
        let patterns = match self {
            Self::One(pattern) => vec![pattern],
            Self::Many(patterns) => patterns,
        };
        patterns.into_iter().filter(|p| !p.is_empty()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
/// `needsContinue`: a flag or a named mode.
pub enum NeedsContinue {
    /// `true` or `false`.
    Flag(bool),
    /// A mode name such as `nextCondFail`.
    Mode(String),
}

impl NeedsContinue {
    fn into_continuation(self) -> Result<Continuation, RuleError> {
        match self {
            Self::Flag(flag) => Ok(Continuation::from_flag(flag)),
            Self::Mode(mode) => mode.parse(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Fields of one edit step.
///
/// A rule without `edits` uses its own top-level fields as its single step.
pub struct StepConfig {
    #[serde(default)]
    /// `insert` (default) or `replace`.
    pub action: Option<String>,

    #[serde(default)]
    /// Target file reference.
    pub file: Option<String>,

    #[serde(default)]
    /// Inserted text or replacement.
    pub text: Option<String>,

    #[serde(default, rename = "where")]
    /// Insert anchor: `start`, `beforeFirst`, `afterLast` or `beforeLast`.
    pub position: Option<String>,

    #[serde(default)]
    /// Pattern selecting the anchor lines of an insert.
    pub insert_find: Option<String>,

    #[serde(default)]
    /// Pattern(s) locating the replaced text.
    pub replace_find: Option<OneOrMany>,

    #[serde(default)]
    /// Stop pattern for `replaceFind`.
    pub replace_find_stop: Option<String>,

    #[serde(default)]
    /// Guard pattern(s): the step is skipped when they are found.
    pub cond_find: Option<OneOrMany>,

    #[serde(default)]
    /// Stop pattern for `condFind`.
    pub cond_find_stop: Option<String>,

    #[serde(default)]
    /// Continuation after this step.
    pub needs_continue: Option<NeedsContinue>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn check_action(action: Option<&str>) -> Result<&str, RuleError> {
    match action.unwrap_or(ACTION_INSERT) {
        action @ (ACTION_INSERT | ACTION_REPLACE) => Ok(action),
        other => Err(RuleError::UnknownAction(other.to_string())),
    }
}

impl StepConfig {
    /// Convert into an [`EditStep`].
    pub fn into_step(self) -> Result<EditStep, RuleError> {
        let text = self.text.unwrap_or_default();

        let mut step = if check_action(self.action.as_deref())? == ACTION_REPLACE {
            let locate = self
                .replace_find
                .map(OneOrMany::into_vec)
                .unwrap_or_default();
            let step = EditStep::replace_chain(locate, text);
            match non_empty(self.replace_find_stop) {
                Some(stop) => step.with_replace_stop(stop),
                None => step,
            }
        } else {
            let anchor = match self.position.as_deref() {
                Some(position) => position.parse()?,
                None => InsertAnchor::Start,
            };
            let step = EditStep::insert(text);
            match non_empty(self.insert_find) {
                Some(locate) => step.anchored(anchor, locate),
                None => step,
            }
        };

        if let Some(file) = non_empty(self.file) {
            step = step.in_file(file);
        }

        let find = self
            .cond_find
            .map(OneOrMany::into_vec)
            .unwrap_or_default();
        if !find.is_empty() {
            step = step.unless_found(find, non_empty(self.cond_find_stop));
        }

        if let Some(needs_continue) = self.needs_continue {
            step = step.with_continuation(needs_continue.into_continuation()?);
        }
        Ok(step)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One configured rule.
pub struct RuleConfig {
    #[serde(default)]
    /// Diagnostic message patterns gating the rule.
    pub diagnostics: Option<OneOrMany>,

    #[serde(default)]
    /// Pattern that must match around the cursor.
    pub at_cursor: Option<String>,

    #[serde(default)]
    /// Explicit edit steps.
    pub edits: Option<Vec<StepConfig>>,

    #[serde(flatten)]
    /// Top-level step fields.
    pub step: StepConfig,
}

impl RuleConfig {
    /// Convert into a [`RuleSpec`] titled `title`.
    pub fn into_rule(self, title: &str) -> Result<RuleSpec, RuleError> {
        let mut rule = match self.edits {
            Some(edits) => {
                check_action(self.step.action.as_deref())?;
                let steps = edits
                    .into_iter()
                    .map(StepConfig::into_step)
                    .collect::<Result<Vec<_>, _>>()?;
                let rule = RuleSpec::with_steps(title, steps)?;
                match non_empty(self.step.file) {
                    Some(file) => rule.with_default_file(file),
                    None => rule,
                }
            }
            None => RuleSpec::single(title, self.step.into_step()?)?,
        };

        let diagnostics = self
            .diagnostics
            .map(OneOrMany::into_vec)
            .unwrap_or_default();
        if !diagnostics.is_empty() {
            rule = rule.gated_on_diagnostics(compile_patterns(&diagnostics)?);
        }
        if let Some(pattern) = non_empty(self.at_cursor) {
            rule = rule.gated_on_cursor(compile_pattern(&pattern)?);
        }
        Ok(rule)
    }
}

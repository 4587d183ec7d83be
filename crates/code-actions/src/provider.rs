//! Per-language action providers.

use crate::action::CandidateAction;
use crate::rule::{ActionQuery, RuleSpec};
use crate::template::LookupTables;
use std::sync::Arc;
use tracing::trace;

/// An ordered list of rules, shared by every language its selector names.
#[derive(Debug, Clone, Default)]
pub struct ActionSet {
    rules: Vec<Arc<RuleSpec>>,
}

impl ActionSet {
    /// Create a set from rules in configuration order.
    pub fn new(rules: Vec<RuleSpec>) -> Self {
        Self {
            rules: rules.into_iter().map(Arc::new).collect(),
        }
    }

    /// Append a rule.
    pub fn push(&mut self, rule: RuleSpec) {
        self.rules.push(Arc::new(rule));
    }

    /// Rules in configuration order.
    pub fn rules(&self) -> &[Arc<RuleSpec>] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Serves the action sets registered for one language.
///
/// Providers are never removed. A configuration reload deactivates them, which clears their
/// sets, and re-activates those the new configuration still names.
#[derive(Debug, Clone)]
pub struct LanguageProvider {
    language: String,
    active: bool,
    action_sets: Vec<Arc<ActionSet>>,
}

impl LanguageProvider {
    /// Create an active provider with no action sets.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            active: true,
            action_sets: Vec::new(),
        }
    }

    /// Language identifier.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns `true` if the provider answers queries.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Registered action sets.
    pub fn action_sets(&self) -> &[Arc<ActionSet>] {
        &self.action_sets
    }

    /// Activate or deactivate. Deactivating drops all action sets.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.action_sets.clear();
        }
    }

    /// Register an action set and activate the provider.
    pub fn add_action_set(&mut self, set: Arc<ActionSet>) {
        self.action_sets.push(set);
        self.active = true;
    }

    /// Candidates for `query`, in action set order then rule order.
    pub fn provide(
        &self,
        query: &ActionQuery<'_>,
        tables: &Arc<LookupTables>,
    ) -> Vec<CandidateAction> {
        if !self.active {
            return Vec::new();
        }

        let mut actions = Vec::new();
        for rule in self.action_sets.iter().flat_map(|set| set.rules()) {
            let Some(found) = rule.test(query, tables) else {
                continue;
            };
            trace!(language = %self.language, title = %found.title, "rule matched");
            actions.push(CandidateAction::new(
                found.title,
                &self.language,
                query.document.path(),
                Arc::clone(rule),
                found.context,
                Arc::clone(tables),
            ));
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Position, Range};
    use crate::rule::EditStep;

    fn set(titles: &[&str]) -> Arc<ActionSet> {
        Arc::new(ActionSet::new(
            titles
                .iter()
                .map(|title| RuleSpec::single(*title, EditStep::insert("x")).unwrap())
                .collect(),
        ))
    }

    #[test]
    fn test_provide_in_registration_order() {
        let doc = Document::new("/w/a.py", "python", "");
        let query = ActionQuery {
            document: &doc,
            range: Range::caret(Position::new(0, 0)),
            diagnostics: &[],
        };
        let tables = Arc::new(LookupTables::new());

        let mut provider = LanguageProvider::new("python");
        provider.add_action_set(set(&["a", "b"]));
        provider.add_action_set(set(&["c"]));
        let titles = provider
            .provide(&query, &tables)
            .iter()
            .map(|action| action.title().to_string())
            .collect::<Vec<_>>();
        assert_eq!(titles, ["a", "b", "c"]);

        provider.set_active(false);
        assert!(provider.action_sets().is_empty());
        assert!(provider.provide(&query, &tables).is_empty());

        provider.add_action_set(set(&["d"]));
        assert!(provider.is_active());
        assert_eq!(provider.provide(&query, &tables).len(), 1);
    }
}

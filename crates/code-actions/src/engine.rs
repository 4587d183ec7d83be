//! Engine facade: configuration snapshots, queries and resolution.
//!
//! The engine holds an immutable [`Snapshot`] behind an `Arc`. A reload builds a new snapshot and
//! swaps it in whole, so a query never observes a half-applied configuration, and candidates
//! produced before the reload keep the lookup tables of their own epoch.

use crate::action::{CandidateAction, Resolution};
use crate::diagnostics::Diagnostic;
use crate::document::{Document, Range};
use crate::error::ResolveError;
use crate::host::{DocumentSource, Host, MessageAction};
use crate::provider::{ActionSet, LanguageProvider};
use crate::resolver::resolve_edits;
use crate::rule::ActionQuery;
use crate::template::LookupTables;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// An action set and the languages its selector names.
#[derive(Debug, Clone)]
pub struct LanguageActionSet {
    /// Language identifiers.
    pub languages: Vec<String>,
    /// Rules shared by all of `languages`.
    pub set: Arc<ActionSet>,
}

impl LanguageActionSet {
    /// Bind `set` to `languages`.
    pub fn new<S: Into<String>>(languages: impl IntoIterator<Item = S>, set: ActionSet) -> Self {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
            set: Arc::new(set),
        }
    }
}

/// A complete configuration read.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// `lookup` and `diagLookup` tables.
    pub tables: LookupTables,
    /// Action sets in configuration order.
    pub action_sets: Vec<LanguageActionSet>,
}

/// Languages affected by a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Languages seen for the first time; the host registers a provider for each.
    pub registered: Vec<String>,
    /// Languages that stayed registered but have no action sets anymore.
    pub deactivated: Vec<String>,
}

/// One configuration epoch.
#[derive(Debug, Default)]
struct Snapshot {
    providers: BTreeMap<String, LanguageProvider>,
    tables: Arc<LookupTables>,
}

/// The code action engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    snapshot: Arc<Snapshot>,
}

impl Engine {
    /// Create an engine with no providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine and load `config`.
    pub fn with_configuration(config: Configuration) -> Self {
        let mut engine = Self::new();
        engine.reload(config);
        engine
    }

    /// Replace the configuration.
    ///
    /// Every provider is deactivated first; providers named by `config` are then repopulated and
    /// re-activated. Providers are never removed.
    pub fn reload(&mut self, config: Configuration) -> ReloadSummary {
        let mut providers = self.snapshot.providers.clone();
        for provider in providers.values_mut() {
            provider.set_active(false);
        }

        let mut summary = ReloadSummary::default();
        for entry in &config.action_sets {
            for language in &entry.languages {
                let provider = providers.entry(language.clone()).or_insert_with(|| {
                    summary.registered.push(language.clone());
                    LanguageProvider::new(language.clone())
                });
                provider.add_action_set(Arc::clone(&entry.set));
            }
        }
        summary.deactivated = providers
            .values()
            .filter(|provider| !provider.is_active())
            .map(|provider| provider.language().to_string())
            .collect();

        info!(
            registered = ?summary.registered,
            deactivated = ?summary.deactivated,
            action_sets = config.action_sets.len(),
            "code action configuration reloaded"
        );

        self.snapshot = Arc::new(Snapshot {
            providers,
            tables: Arc::new(config.tables),
        });
        summary
    }

    /// Registered languages, active or not.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.snapshot.providers.keys().map(String::as_str)
    }

    /// Returns `true` if `language` has an active provider.
    pub fn is_active(&self, language: &str) -> bool {
        self.snapshot
            .providers
            .get(language)
            .is_some_and(LanguageProvider::is_active)
    }

    /// Candidate actions for `range` in `document`, in configuration order.
    pub fn query_actions(
        &self,
        document: &Document,
        range: Range,
        diagnostics: &[Diagnostic],
    ) -> Vec<CandidateAction> {
        let snapshot = Arc::clone(&self.snapshot);
        let Some(provider) = snapshot.providers.get(document.language_id()) else {
            return Vec::new();
        };

        let query = ActionQuery {
            document,
            range,
            diagnostics,
        };
        provider.provide(&query, &snapshot.tables)
    }

    /// Resolve `action` into edits and attach them.
    ///
    /// The action is left unresolved on failure; the returned [`Resolution`] carries the
    /// messages to show either way.
    pub fn resolve_action(
        &self,
        action: &mut CandidateAction,
        source: &dyn DocumentSource,
    ) -> Resolution {
        if !self.is_active(action.language()) {
            action.detach_edit();
            return Resolution::Unresolved(ResolveError::ProviderInactive {
                language: action.language().to_string(),
            });
        }

        match resolve_edits(action, source) {
            Ok(resolved) => {
                action.attach_edit(resolved.edit);
                Resolution::Resolved {
                    needs_reapply: resolved.needs_reapply,
                }
            }
            Err(err) => {
                debug!(title = action.title(), %err, "code action left unresolved");
                action.detach_edit();
                Resolution::Unresolved(err)
            }
        }
    }

    /// Resolve `action`, show its messages and apply its edits through `host`.
    pub fn invoke<H: Host>(
        &self,
        action: &mut CandidateAction,
        host: &mut H,
    ) -> Result<Resolution, H::Error> {
        let resolution = self.resolve_action(action, &*host);

        for message in resolution.messages() {
            if host.show_message(&message)
                && let Some(MessageAction::OpenDocument(path)) = &message.action
            {
                host.open_document(path);
            }
        }

        if let Some(edit) = action.edit()
            && !edit.is_empty()
        {
            host.apply_edit(edit)?;
        }
        Ok(resolution)
    }
}

//! Settings document → [`Configuration`] snapshot.

use crate::error::ConfigError;
use crate::schema::RuleConfig;
use crate::selector::parse_language_selector;
use code_actions::{ActionSet, Configuration, LanguageActionSet, LookupTables};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

const ACTIONS: &str = "actions";
const LOOKUP: &str = "lookup";
const DIAG_LOOKUP: &str = "diagLookup";

/// Text format of a settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl SettingsFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

fn section<'a>(
    root: &'a Map<String, Value>,
    name: &'static str,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    match root.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(ConfigError::NotAMapping { section: name }),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn load_action_set(selector: &str, rules: &Map<String, Value>) -> ActionSet {
    let mut set = ActionSet::default();
    for (title, value) in rules {
        let rule = RuleConfig::deserialize(value)
            .map_err(|err| err.to_string())
            .and_then(|config| config.into_rule(title).map_err(|err| err.to_string()));
        match rule {
            Ok(rule) => set.push(rule),
            Err(err) => warn!(selector, title = %title, %err, "dropping malformed rule"),
        }
    }
    set
}

fn load_actions(actions: &Map<String, Value>) -> Vec<LanguageActionSet> {
    let mut sets = Vec::new();
    for (selector, rules) in actions {
        let Value::Object(rules) = rules else {
            warn!(selector = %selector, "action set is not a mapping, skipped");
            continue;
        };
        let languages = parse_language_selector(selector);
        if languages.is_empty() {
            warn!(selector = %selector, "selector names no language, skipped");
            continue;
        }
        sets.push(LanguageActionSet::new(
            languages,
            load_action_set(selector, rules),
        ));
    }
    sets
}

fn load_lookup(lookup: &Map<String, Value>) -> HashMap<String, String> {
    lookup
        .iter()
        .map(|(key, value)| (key.clone(), stringify(value)))
        .collect()
}

fn load_diag_lookup(diag_lookup: &Map<String, Value>) -> HashMap<String, HashMap<String, String>> {
    let mut tables = HashMap::new();
    for (group, table) in diag_lookup {
        let table: HashMap<String, String> = match table {
            Value::Object(map) => load_lookup(map),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, value)| (index.to_string(), stringify(value)))
                .collect(),
            _ => {
                warn!(
                    group = %group,
                    "diagLookup entry is neither a mapping nor a list, skipped"
                );
                continue;
            }
        };
        tables.insert(group.clone(), table);
    }
    tables
}

/// Build a configuration from an already-parsed settings value.
///
/// A `null` root yields an empty configuration. Malformed rules are dropped with a warning.
pub fn load_value(value: &Value) -> Result<Configuration, ConfigError> {
    let root = match value {
        Value::Null => return Ok(Configuration::default()),
        Value::Object(map) => map,
        _ => return Err(ConfigError::NotAMapping { section: "settings" }),
    };

    let action_sets = section(root, ACTIONS)?
        .map(load_actions)
        .unwrap_or_default();
    let lookup = section(root, LOOKUP)?
        .map(load_lookup)
        .unwrap_or_default();
    let diag_lookup = section(root, DIAG_LOOKUP)?
        .map(load_diag_lookup)
        .unwrap_or_default();

    Ok(Configuration {
        tables: LookupTables::from_parts(lookup, diag_lookup),
        action_sets,
    })
}

/// Parse and load settings text.
pub fn load_str(text: &str, format: SettingsFormat) -> Result<Configuration, ConfigError> {
    let value: Value = match format {
        SettingsFormat::Json => serde_json::from_str(text)?,
        SettingsFormat::Yaml => serde_yaml::from_str(text)?,
    };
    load_value(&value)
}

/// Read, parse and load a settings file. The format follows the file extension.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigError> {
    let path = path.as_ref();
    let format =
        SettingsFormat::from_path(path).ok_or_else(|| ConfigError::UnknownFormat(path.into()))?;
    let text = std::fs::read_to_string(path)?;
    load_str(&text, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SettingsFormat::from_path(Path::new("a/settings.json")),
            Some(SettingsFormat::Json)
        );
        assert_eq!(
            SettingsFormat::from_path(Path::new("rules.yml")),
            Some(SettingsFormat::Yaml)
        );
        assert_eq!(SettingsFormat::from_path(Path::new("rules.toml")), None);
        assert_eq!(SettingsFormat::from_path(Path::new("rules")), None);
    }

    #[test]
    fn test_empty_and_invalid_roots() {
        let config = load_value(&Value::Null).unwrap();
        assert!(config.action_sets.is_empty());

        let config = load_value(&json!({})).unwrap();
        assert!(config.action_sets.is_empty());

        assert!(matches!(
            load_value(&json!([1, 2])),
            Err(ConfigError::NotAMapping {
                section: "settings"
            })
        ));
        assert!(matches!(
            load_value(&json!({ "lookup": "x" })),
            Err(ConfigError::NotAMapping { section: "lookup" })
        ));
    }

    #[test]
    fn test_lookup_values_are_stringified() {
        let config = load_value(&json!({
            "lookup": { "name": "ada", "year": 1815, "flag": true }
        }))
        .unwrap();
        assert_eq!(config.tables.lookup("name"), Some("ada"));
        assert_eq!(config.tables.lookup("year"), Some("1815"));
        assert_eq!(config.tables.lookup("flag"), Some("true"));
    }

    #[test]
    fn test_diag_lookup_forms() {
        let config = load_value(&json!({
            "diagLookup": {
                "E0425": { "0": "Declare", "1": "Import" },
                "E0433": ["Add crate", "Add module"],
                "bad": 3
            }
        }))
        .unwrap();
        let table = config.tables.diag_table("E0425").unwrap();
        assert_eq!(table.get("1").map(String::as_str), Some("Import"));
        let table = config.tables.diag_table("E0433").unwrap();
        assert_eq!(table.get("1").map(String::as_str), Some("Add module"));
        assert!(config.tables.diag_table("bad").is_none());
    }
}

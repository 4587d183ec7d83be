//! Placeholder substitution for rule text.
//!
//! Every textual rule property (titles, file references, inserted text, replacement text and
//! search patterns) is rendered through [`TemplateEvaluator`] before use. Placeholder families
//! are substituted in a fixed order:
//!
//! 1. `{{diag:<replacement>}}` - the diagnostic match, re-expanded with `<replacement>`
//!    (`$1`, `$<name>`, ...)
//! 2. `{{diagLookup:<index>}}` - `diagLookup[<diag group 1>][<index>]`
//! 3. `{{atCursor:<replacement>}}` - the cursor match, re-expanded with `<replacement>`
//! 4. `{{lookup:<key>}}` - the global `lookup` table
//! 5. `${fileBasenameNoExtension}`, `${fileBasename}`, `${fileExtname}`, `${fileDirname}`
//!
//! A family whose source is unavailable (no diagnostic match, no lookup sub-table, ...) leaves
//! its placeholders untouched. Text without placeholders renders to itself.

use crate::diagnostics::Diagnostic;
use crate::locator::CapturedMatch;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Rendered for a lookup key or index that has no entry.
pub const UNKNOWN_LOOKUP: &str = "Unknown";

/// Static lookup tables of one configuration epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTables {
    lookup: HashMap<String, String>,
    diag_lookup: HashMap<String, HashMap<String, String>>,
}

impl LookupTables {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create tables from a global `lookup` map and a two-level `diagLookup` map.
    pub fn from_parts(
        lookup: HashMap<String, String>,
        diag_lookup: HashMap<String, HashMap<String, String>>,
    ) -> Self {
        Self {
            lookup,
            diag_lookup,
        }
    }

    /// Global lookup value for `key`.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.lookup.get(key).map(String::as_str)
    }

    /// The `diagLookup` sub-table selected by a diagnostic capture.
    pub fn diag_table(&self, group_value: &str) -> Option<&HashMap<String, String>> {
        self.diag_lookup.get(group_value)
    }
}

/// Evidence captured from a diagnostic message.
#[derive(Debug, Clone)]
pub struct DiagnosticMatch {
    /// Groups captured from the diagnostic message, and the configured pattern that matched.
    pub captured: CapturedMatch,
    /// The diagnostic whose message matched.
    pub diagnostic: Diagnostic,
}

/// Evidence captured from the text around the cursor.
#[derive(Debug, Clone)]
pub struct CursorMatch {
    /// Groups captured around the cursor, and the configured pattern that matched.
    pub captured: CapturedMatch,
    /// Character offsets `(start, end)` of the match in the queried document.
    pub span: (usize, usize),
}

/// The captured contextual evidence for one candidate action.
#[derive(Debug, Clone, Default)]
pub struct MatchContext {
    /// Present when the rule is diagnostic-gated.
    pub diagnostic: Option<DiagnosticMatch>,
    /// Present when the rule is cursor-gated.
    pub cursor: Option<CursorMatch>,
}

/// Variables derived from a document path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileVariables {
    /// File name without its extension (`main` for `src/main.rs`).
    pub basename_no_extension: String,
    /// File name (`main.rs`).
    pub basename: String,
    /// Extension including the dot (`.rs`), or empty.
    pub extname: String,
    /// Containing directory.
    pub dirname: String,
}

impl FileVariables {
    /// Derive the variables from `path`.
    pub fn from_path(path: &Path) -> Self {
        let os = |s: Option<&std::ffi::OsStr>| {
            s.map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let extension = os(path.extension());
        Self {
            basename_no_extension: os(path.file_stem()),
            basename: os(path.file_name()),
            extname: if extension.is_empty() {
                String::new()
            } else {
                format!(".{extension}")
            },
            dirname: path
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// `{{<prefix>:<arg>}}`, where `<arg>` is the shortest run up to the next `}}` on the same line.
fn placeholder(prefix: &str) -> Regex {
    Regex::new(&format!(r"\{{\{{{prefix}:(.*?)\}}\}}")).expect("valid placeholder regex")
}

static DIAG: LazyLock<Regex> = LazyLock::new(|| placeholder("diag"));
static DIAG_LOOKUP: LazyLock<Regex> = LazyLock::new(|| placeholder("diagLookup"));
static AT_CURSOR: LazyLock<Regex> = LazyLock::new(|| placeholder("atCursor"));
static LOOKUP: LazyLock<Regex> = LazyLock::new(|| placeholder("lookup"));

/// Replace every match of a placeholder `pattern` in `text` with `f(<arg>)`.
fn replace_placeholders(
    text: &str,
    pattern: &Regex,
    mut f: impl FnMut(&str) -> String,
) -> String {
    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            f(caps.get(1).map_or("", |arg| arg.as_str()))
        })
        .into_owned()
}

/// Renders rule text against a [`MatchContext`] and the lookup tables.
#[derive(Debug, Clone, Copy)]
pub struct TemplateEvaluator<'a> {
    context: &'a MatchContext,
    tables: &'a LookupTables,
    file: Option<&'a FileVariables>,
}

impl<'a> TemplateEvaluator<'a> {
    /// Create an evaluator without file variables.
    pub fn new(context: &'a MatchContext, tables: &'a LookupTables) -> Self {
        Self {
            context,
            tables,
            file: None,
        }
    }

    /// Make `${file...}` variables available.
    pub fn with_file(mut self, file: &'a FileVariables) -> Self {
        self.file = Some(file);
        self
    }

    /// Render `text`.
    pub fn render(&self, text: &str) -> String {
        if !text.contains("{{") && !text.contains("${") {
            return text.to_string();
        }

        let mut text = text.to_string();

        if let Some(diag) = &self.context.diagnostic {
            text = replace_placeholders(&text, &DIAG, |replacement| {
                diag.captured.substitute(replacement)
            });

            let table = diag
                .captured
                .group(1)
                .filter(|group| !group.is_empty())
                .and_then(|group| self.tables.diag_table(group));
            if let Some(table) = table {
                text = replace_placeholders(&text, &DIAG_LOOKUP, |index| {
                    index
                        .trim()
                        .parse::<u64>()
                        .ok()
                        .and_then(|n| table.get(&n.to_string()))
                        .cloned()
                        .unwrap_or_else(|| UNKNOWN_LOOKUP.to_string())
                });
            }
        }

        if let Some(cursor) = &self.context.cursor {
            text = replace_placeholders(&text, &AT_CURSOR, |replacement| {
                cursor.captured.substitute(replacement)
            });
        }

        text = replace_placeholders(&text, &LOOKUP, |key| {
            self.tables
                .lookup(key)
                .unwrap_or(UNKNOWN_LOOKUP)
                .to_string()
        });

        if let Some(file) = self.file {
            text = text
                .replace("${fileBasenameNoExtension}", &file.basename_no_extension)
                .replace("${fileBasename}", &file.basename)
                .replace("${fileExtname}", &file.extname)
                .replace("${fileDirname}", &file.dirname);
        }

        text
    }

    /// Render every element of `texts`.
    pub fn render_all(&self, texts: &[String]) -> Vec<String> {
        texts.iter().map(|t| self.render(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Range;
    use regex::Regex;
    use std::path::PathBuf;

    fn diag_context(pattern: &str, message: &str) -> MatchContext {
        let pattern = Regex::new(pattern).unwrap();
        let caps = pattern.captures(message).unwrap();
        MatchContext {
            diagnostic: Some(DiagnosticMatch {
                captured: CapturedMatch::from_captures(&caps, &pattern),
                diagnostic: Diagnostic::new(Range::default(), message),
            }),
            cursor: None,
        }
    }

    fn tables() -> LookupTables {
        let lookup = HashMap::from([("author".to_string(), "Ada".to_string())]);
        let diag_lookup = HashMap::from([(
            "E0425".to_string(),
            HashMap::from([
                ("0".to_string(), "zero".to_string()),
                ("1".to_string(), "one".to_string()),
            ]),
        )]);
        LookupTables::from_parts(lookup, diag_lookup)
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let ctx = diag_context(r"undefined name '(\w+)'", "undefined name 'os'");
        let tables = tables();
        let eval = TemplateEvaluator::new(&ctx, &tables);
        for text in ["", "import os\n", "a { b } c", "$1 and ${x}", "{single}"] {
            assert_eq!(eval.render(text), text);
        }
    }

    #[test]
    fn test_diag_back_reference() {
        let ctx = diag_context(r"undefined name '(?P<name>\w+)'", "E: undefined name 'os'");
        let tables = tables();
        let eval = TemplateEvaluator::new(&ctx, &tables);
        assert_eq!(eval.render("import {{diag:$1}}\n"), "import os\n");
        assert_eq!(eval.render("{{diag:$<name>}}"), "os");
    }

    #[test]
    fn test_diag_back_reference_with_suffix() {
        let ctx = diag_context(r"missing (\w+)", "missing item");
        let tables = tables();
        let eval = TemplateEvaluator::new(&ctx, &tables);
        assert_eq!(eval.render("Add {{diag:$1s}}"), "Add items");
        assert_eq!(eval.render("{{diag:$1_old}} {{diag:$$1}}"), "item_old $1");
    }

    #[test]
    fn test_diag_lookup_and_unknown() {
        let ctx = diag_context(r"error\[(E\d+)\]", "error[E0425]: cannot find value");
        let tables = tables();
        let eval = TemplateEvaluator::new(&ctx, &tables);
        assert_eq!(eval.render("{{diagLookup:1}}"), "one");
        assert_eq!(eval.render("{{diagLookup: 0}}"), "zero");
        assert_eq!(eval.render("{{diagLookup:7}}"), UNKNOWN_LOOKUP);
    }

    #[test]
    fn test_diag_lookup_without_table_is_kept() {
        let ctx = diag_context(r"error\[(E\d+)\]", "error[E9999]");
        let tables = tables();
        let eval = TemplateEvaluator::new(&ctx, &tables);
        assert_eq!(eval.render("{{diagLookup:1}}"), "{{diagLookup:1}}");
    }

    #[test]
    fn test_placeholders_without_context_are_kept() {
        let ctx = MatchContext::default();
        let tables = tables();
        let eval = TemplateEvaluator::new(&ctx, &tables);
        assert_eq!(
            eval.render("{{diag:$1}} {{atCursor:$0}} {{lookup:author}}"),
            "{{diag:$1}} {{atCursor:$0}} Ada"
        );
        assert_eq!(eval.render("{{lookup:missing}}"), UNKNOWN_LOOKUP);
    }

    #[test]
    fn test_cursor_back_reference() {
        let pattern = Regex::new(r"(\w+)\.unwrap\(\)").unwrap();
        let text = "let v = value.unwrap();";
        let caps = pattern.captures(text).unwrap();
        let ctx = MatchContext {
            diagnostic: None,
            cursor: Some(CursorMatch {
                captured: CapturedMatch::from_captures(&caps, &pattern),
                span: (8, 22),
            }),
        };
        let tables = LookupTables::new();
        let eval = TemplateEvaluator::new(&ctx, &tables);
        assert_eq!(eval.render("{{atCursor:$1}}?"), "value?");
    }

    #[test]
    fn test_substitution_order_is_fixed() {
        // A diag capture that spells a lookup placeholder is expanded by the later lookup pass.
        let ctx = diag_context(r"key=(\w+)", "key=author");
        let tables = tables();
        let eval = TemplateEvaluator::new(&ctx, &tables);
        assert_eq!(eval.render("{{lookup:{{diag:$1}}}}"), "Ada");
    }

    #[test]
    fn test_file_variables() {
        let ctx = MatchContext::default();
        let tables = LookupTables::new();
        let vars = FileVariables::from_path(&PathBuf::from("/w/src/widget.test.ts"));
        let eval = TemplateEvaluator::new(&ctx, &tables).with_file(&vars);
        assert_eq!(
            eval.render("${fileDirname}/${fileBasenameNoExtension}.css"),
            "/w/src/widget.test.css"
        );
        assert_eq!(eval.render("${fileBasename} ${fileExtname}"), "widget.test.ts .ts");
    }

    #[test]
    fn test_unterminated_placeholder() {
        let ctx = MatchContext::default();
        let tables = tables();
        let eval = TemplateEvaluator::new(&ctx, &tables);
        assert_eq!(eval.render("{{lookup:author"), "{{lookup:author");
        assert_eq!(eval.render("{{lookup:a\n}} {{lookup:author}}"), "{{lookup:a\n}} Ada");
    }
}

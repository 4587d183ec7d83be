//! LSP `Diagnostic[]` → engine diagnostics.

use crate::lsp_position::{LspRange, lsp_range_for, range_from_lsp};
use code_actions::{Diagnostic, DiagnosticSeverity, Document};
use serde_json::{Map, Value, json};

/// Map the numeric LSP `DiagnosticSeverity`.
pub fn severity_from_lsp(value: u64) -> Option<DiagnosticSeverity> {
    match value {
        1 => Some(DiagnosticSeverity::Error),
        2 => Some(DiagnosticSeverity::Warning),
        3 => Some(DiagnosticSeverity::Information),
        4 => Some(DiagnosticSeverity::Hint),
        _ => None,
    }
}

/// Numeric LSP `DiagnosticSeverity`.
pub fn severity_to_lsp(severity: DiagnosticSeverity) -> u64 {
    match severity {
        DiagnosticSeverity::Error => 1,
        DiagnosticSeverity::Warning => 2,
        DiagnosticSeverity::Information => 3,
        DiagnosticSeverity::Hint => 4,
    }
}

/// Parse one LSP diagnostic. Returns `None` without a range or a message.
pub fn diagnostic_from_value(value: &Value, document: &Document) -> Option<Diagnostic> {
    let range = LspRange::from_value(value.get("range")?)?;
    let message = value.get("message")?.as_str()?;

    let mut diagnostic = Diagnostic::new(range_from_lsp(document, range), message);
    diagnostic.severity = value
        .get("severity")
        .and_then(Value::as_u64)
        .and_then(severity_from_lsp);
    diagnostic.code = match value.get("code") {
        Some(Value::String(code)) => Some(code.clone()),
        Some(Value::Number(code)) => Some(code.to_string()),
        _ => None,
    };
    diagnostic.source = value
        .get("source")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(diagnostic)
}

/// Parse an LSP `Diagnostic[]`, or `publishDiagnostics` params carrying one.
///
/// Malformed entries are skipped.
pub fn diagnostics_from_value(value: &Value, document: &Document) -> Vec<Diagnostic> {
    let items = value.get("diagnostics").unwrap_or(value);
    items
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| diagnostic_from_value(item, document))
                .collect()
        })
        .unwrap_or_default()
}

/// Serialize an engine diagnostic as an LSP `Diagnostic`.
pub fn diagnostic_to_value(diagnostic: &Diagnostic, document: &Document) -> Value {
    let mut out = Map::new();
    out.insert(
        "range".into(),
        lsp_range_for(document, diagnostic.range).to_value(),
    );
    if let Some(severity) = diagnostic.severity {
        out.insert("severity".into(), json!(severity_to_lsp(severity)));
    }
    if let Some(code) = &diagnostic.code {
        out.insert("code".into(), json!(code));
    }
    if let Some(source) = &diagnostic.source {
        out.insert("source".into(), json!(source));
    }
    out.insert("message".into(), json!(diagnostic.message));
    Value::Object(out)
}

//! Diagnostics as seen by the rule engine.
//!
//! The host passes the diagnostics that intersect the queried range. Only the message takes part
//! in rule matching; the remaining fields are carried so a candidate action can report which
//! diagnostic it fixes.

use crate::document::Range;

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    /// Error diagnostics.
    Error,
    /// Warning diagnostics.
    Warning,
    /// Informational diagnostics.
    Information,
    /// Hint diagnostics.
    Hint,
}

/// A single diagnostic item for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic range.
    pub range: Range,
    /// Optional diagnostic severity.
    pub severity: Option<DiagnosticSeverity>,
    /// Optional diagnostic code (stringified).
    pub code: Option<String>,
    /// Optional diagnostic source (e.g. `"pylint"`).
    pub source: Option<String>,
    /// Diagnostic message.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic with only a range and a message.
    pub fn new(range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: None,
            code: None,
            source: None,
            message: message.into(),
        }
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Set the code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

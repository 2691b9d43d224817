use serde::Serialize;

use crate::token::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticTag {
    /// Rendered faded out by editors.
    Unnecessary,
}

/// A protocol-independent finding. The chapter label is attached when the
/// diagnostic leaves the analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<DiagnosticTag>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
            tags: Vec::new(),
        }
    }

    pub fn unused(span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message: "Unused name".to_string(),
            span,
            tags: vec![DiagnosticTag::Unnecessary],
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

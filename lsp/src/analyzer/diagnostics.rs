use source_core::analysis::{Diagnostic as CoreDiagnostic, DiagnosticTag as CoreTag, Severity};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, DiagnosticTag};

use super::position::to_lsp_range;
use super::DocumentContext;

pub(super) fn to_lsp_diagnostic(diagnostic: &CoreDiagnostic, context: DocumentContext) -> Diagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };
    let tags: Vec<DiagnosticTag> = diagnostic
        .tags
        .iter()
        .map(|tag| match tag {
            CoreTag::Unnecessary => DiagnosticTag::UNNECESSARY,
        })
        .collect();

    let mut converted = Diagnostic::new(
        to_lsp_range(&diagnostic.span, context.prepend),
        Some(severity),
        None,
        Some(context.chapter.label()),
        diagnostic.message.clone(),
        None,
        None,
    );
    if !tags.is_empty() {
        converted.tags = Some(tags);
    }
    converted
}

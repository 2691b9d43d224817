use source_core::analysis::{analyze, Analysis, Chapter};
use source_stdlib::{documentation, Documentation};
use tower_lsp::lsp_types::{Diagnostic, DocumentSymbol};

mod completions;
mod diagnostics;
mod hover;
mod navigation;
mod outline;
mod position;
#[cfg(test)]
mod tests;

pub use completions::{resolve_completion, CompletionData, CompletionSource};
pub use position::{to_core_position, to_lsp_position, to_lsp_range};

/// How a document is to be read: which chapter it is written in, and how
/// many lines of implicit prelude precede its first line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DocumentContext {
    pub chapter: Chapter,
    pub prepend: u32,
}

impl DocumentContext {
    pub fn new(chapter: Chapter, prepend: u32) -> Self {
        Self { chapter, prepend }
    }

    /// Line number the analysis gives to the first line of the text.
    pub fn first_line(&self) -> u32 {
        1 + self.prepend
    }
}

/// One analyzed document, with its protocol-facing artifacts.
#[derive(Debug)]
pub struct AnalysisResult {
    pub analysis: Analysis,
    pub context: DocumentContext,
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: Vec<DocumentSymbol>,
    docs: &'static Documentation,
}

/// Source analyzer for providing LSP functionality
#[derive(Debug, Clone, Copy)]
pub struct SourceAnalyzer {
    docs: &'static Documentation,
}

impl Default for SourceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAnalyzer {
    pub fn new() -> Self {
        Self {
            docs: documentation(),
        }
    }

    pub fn documentation(&self) -> &'static Documentation {
        self.docs
    }

    pub fn analyze(&self, content: &str, context: DocumentContext) -> AnalysisResult {
        let analysis = analyze(content, context.chapter, context.first_line(), self.docs);
        let diagnostics = analysis
            .diagnostics
            .iter()
            .map(|d| diagnostics::to_lsp_diagnostic(d, context))
            .collect();
        let symbols = outline::document_symbols(&analysis, context);
        AnalysisResult {
            analysis,
            context,
            diagnostics,
            symbols,
            docs: self.docs,
        }
    }
}

use source_core::analysis::DeclId;
use tower_lsp::lsp_types::{DocumentHighlight, DocumentHighlightKind, Position, Range, TextEdit};

use super::position::{to_core_position, to_lsp_range};
use super::AnalysisResult;

impl AnalysisResult {
    fn declaration_id(&self, position: Position) -> Option<DeclId> {
        self.analysis
            .declaration_at(to_core_position(position, self.context.prepend))
    }

    /// Range of the name that declares the identifier at `position`.
    /// Builtins have none.
    pub fn declaration(&self, position: Position) -> Option<Range> {
        let id = self.declaration_id(position)?;
        let decl = self.analysis.declarations.get(id);
        Some(to_lsp_range(&decl.name_span, self.context.prepend))
    }

    /// The declared name and every reference to the same declaration.
    pub fn occurrences(&self, position: Position) -> Vec<Range> {
        let Some(id) = self.declaration_id(position) else {
            return Vec::new();
        };
        self.analysis
            .occurrences(id)
            .iter()
            .map(|span| to_lsp_range(span, self.context.prepend))
            .collect()
    }

    pub fn highlights(&self, position: Position) -> Vec<DocumentHighlight> {
        self.occurrences(position)
            .into_iter()
            .map(|range| DocumentHighlight {
                range,
                kind: Some(DocumentHighlightKind::TEXT),
            })
            .collect()
    }

    /// Like [`occurrences`](Self::occurrences), optionally without the
    /// declared name itself.
    pub fn references(&self, position: Position, include_declaration: bool) -> Vec<Range> {
        let Some(id) = self.declaration_id(position) else {
            return Vec::new();
        };
        let declared = self.analysis.declarations.get(id).name_span;
        self.analysis
            .occurrences(id)
            .iter()
            .filter(|span| include_declaration || **span != declared)
            .map(|span| to_lsp_range(span, self.context.prepend))
            .collect()
    }

    /// One replacement per occurrence, or `None` when there is nothing to
    /// rename.
    pub fn rename(&self, position: Position, new_name: &str) -> Option<Vec<TextEdit>> {
        let occurrences = self.occurrences(position);
        if occurrences.is_empty() {
            return None;
        }
        Some(
            occurrences
                .into_iter()
                .map(|range| TextEdit::new(range, new_name.to_string()))
                .collect(),
        )
    }
}

use source_core::analysis::{Analysis, Chapter, DeclId, DeclarationKind};
use tower_lsp::lsp_types::{DocumentSymbol, SymbolKind};

use super::position::to_lsp_range;
use super::DocumentContext;

fn symbol_kind(kind: DeclarationKind, chapter: Chapter) -> SymbolKind {
    match kind {
        DeclarationKind::Import => SymbolKind::NAMESPACE,
        DeclarationKind::Function => SymbolKind::FUNCTION,
        DeclarationKind::Let => SymbolKind::VARIABLE,
        DeclarationKind::Const => SymbolKind::CONSTANT,
        // parameters cannot be reassigned before chapter 3
        DeclarationKind::Parameter if chapter <= Chapter::Two => SymbolKind::CONSTANT,
        DeclarationKind::Parameter => SymbolKind::VARIABLE,
    }
}

#[allow(deprecated)]
fn to_symbol(analysis: &Analysis, id: DeclId, context: DocumentContext) -> DocumentSymbol {
    let decl = analysis.declarations.get(id);
    let children = decl.parameters.as_ref().map(|params| {
        params
            .iter()
            .map(|param| to_symbol(analysis, *param, context))
            .collect()
    });
    DocumentSymbol {
        name: decl.name.clone(),
        detail: None,
        kind: symbol_kind(decl.kind, context.chapter),
        tags: None,
        deprecated: None,
        range: to_lsp_range(&decl.definition_span, context.prepend),
        selection_range: to_lsp_range(&decl.name_span, context.prepend),
        children,
    }
}

/// Every declaration that is not hidden, in declaration order. Parameters
/// appear as children of their function.
pub(super) fn document_symbols(analysis: &Analysis, context: DocumentContext) -> Vec<DocumentSymbol> {
    analysis
        .declarations
        .iter()
        .filter(|(_, decl)| !decl.hidden)
        .map(|(id, _)| to_symbol(analysis, id, context))
        .collect()
}

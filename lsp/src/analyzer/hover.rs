use source_core::analysis::{DeclarationKind, Meta};
use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};

use super::position::{to_core_position, to_lsp_range};
use super::AnalysisResult;

impl AnalysisResult {
    pub fn hover(&self, position: Position) -> Option<Hover> {
        let symbol = self.analysis.symbol_at(to_core_position(position, self.context.prepend))?;
        let value = match symbol.declaration {
            Some(id) => {
                let decl = self.analysis.declarations.get(id);
                match (&decl.import, decl.kind) {
                    (Some(source), DeclarationKind::Import) => self
                        .docs
                        .module_doc(&source.module, &source.name)
                        .map(|entry| entry.description.clone())?,
                    _ => match decl.meta {
                        Meta::Func => "Function".to_string(),
                        Meta::Const => "Constant".to_string(),
                        Meta::Let => "Variable".to_string(),
                    },
                }
            }
            None => self
                .docs
                .builtin_doc(self.context.chapter, symbol.name)
                .map(|entry| entry.description.clone())?,
        };

        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: Some(to_lsp_range(&symbol.span, self.context.prepend)),
        })
    }
}

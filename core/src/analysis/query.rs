use super::{Analysis, DeclId};
use crate::ast::{NodeKind, breadth_first};
use crate::token::{Position, Span};

/// An identifier under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol<'a> {
    pub name: &'a str,
    pub span: Span,
    /// The declaration it denotes, when it has one.
    pub declaration: Option<DeclId>,
}

impl Analysis {
    /// The identifier at `pos`: a declared name, or a reference to one.
    pub fn symbol_at(&self, pos: Position) -> Option<Symbol<'_>> {
        if let Some((id, decl)) = self.declarations.iter().find(|(_, d)| d.name_span.contains(pos)) {
            return Some(Symbol {
                name: &decl.name,
                span: decl.name_span,
                declaration: Some(id),
            });
        }

        let (node, parent) = breadth_first(&self.program).find(|(node, _)| {
            matches!(node.kind, NodeKind::Identifier { .. }) && node.span.contains(pos)
        })?;
        let name = node.identifier_name()?;
        let declaration = if matches!(parent.kind, NodeKind::Import { .. }) {
            None
        } else {
            self.declarations.resolve(name, &node.span)
        };
        Some(Symbol {
            name,
            span: node.span,
            declaration,
        })
    }

    pub fn declaration_at(&self, pos: Position) -> Option<DeclId> {
        self.symbol_at(pos)?.declaration
    }

    /// Spans of the declared name of `id` and of every reference that
    /// resolves to it. References under a shadowing redeclaration resolve
    /// elsewhere and are left out.
    pub fn occurrences(&self, id: DeclId) -> Vec<Span> {
        let decl = self.declarations.get(id);
        let mut spans = vec![decl.name_span];
        for (node, parent) in breadth_first(&self.program) {
            if matches!(parent.kind, NodeKind::Import { .. }) || node.identifier_name() != Some(decl.name.as_str()) {
                continue;
            }
            if node.span != decl.name_span && self.declarations.resolve(&decl.name, &node.span) == Some(id) {
                spans.push(node.span);
            }
        }
        spans.sort_by_key(|s| s.start);
        spans
    }
}

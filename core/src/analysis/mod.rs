//! Semantic analysis of a Source program.
//!
//! [`analyze`] parses the text and walks the tree breadth-first once. Every
//! `(node, parent)` pair first goes through declaration collection, then
//! through the rules; rules that need to know about declarations queue a
//! deferred check. Once the walk is done the deferred checks run against the
//! complete index, and finally every declaration nothing referred to is
//! reported as unused.

mod catalogue;
mod chapter;
mod collector;
mod declarations;
mod deferred;
mod diagnostic;
mod operand;
mod query;
mod rules;

#[cfg(test)]
mod analysis_test;

use std::collections::BTreeMap;
use std::time::Instant;

pub use catalogue::{Arity, Catalogue, EmptyCatalogue, EntryInfo};
pub use chapter::Chapter;
pub use declarations::{DeclId, Declaration, DeclarationIndex, DeclarationKind, ImportSource, Meta};
pub use diagnostic::{Diagnostic, DiagnosticTag, Severity};
pub use operand::ValueKind;
pub use query::Symbol;
pub use rules::is_banned;

use crate::ast::{Node, breadth_first};
use crate::parser::parse;
use crate::token::Span;
use deferred::Deferred;

/// A named import: where its specifier sits and what it is bound to locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    pub span: Span,
    pub local: String,
}

/// Module name to exported name to import site.
pub type Imports = BTreeMap<String, BTreeMap<String, ImportedName>>;

/// Everything known about one document at one chapter. Never mutated once
/// built.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub chapter: Chapter,
    /// Line number given to the first line of the text.
    pub first_line: u32,
    pub program: Node,
    pub declarations: DeclarationIndex,
    pub diagnostics: Vec<Diagnostic>,
    pub imports: Imports,
    /// Whether the strict parse failed and the tree came from the lenient one.
    pub recovered: bool,
}

/// Shared state the collector and the rules report into.
pub(crate) struct Context<'c> {
    pub chapter: Chapter,
    pub catalogue: &'c dyn Catalogue,
    pub index: DeclarationIndex,
    pub imports: Imports,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'c> Context<'c> {
    fn new(chapter: Chapter, catalogue: &'c dyn Catalogue) -> Self {
        Self {
            chapter,
            catalogue,
            index: DeclarationIndex::new(),
            imports: Imports::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    /// Insert into the index, reporting a redeclaration in the same scope.
    pub fn declare(&mut self, decl: Declaration) -> Option<DeclId> {
        match self.index.insert(decl) {
            Ok(id) => Some(id),
            Err(rejected) => {
                self.error(
                    format!("Identifier '{}' has already been declared", rejected.name),
                    rejected.name_span,
                );
                None
            }
        }
    }
}

/// Analyze `source` at `chapter`, numbering its first line `first_line`.
pub fn analyze(source: &str, chapter: Chapter, first_line: u32, catalogue: &dyn Catalogue) -> Analysis {
    let started = Instant::now();
    let outcome = parse(source, first_line);
    let mut cx = Context::new(chapter, catalogue);
    cx.diagnostics
        .extend(outcome.notes.iter().map(|note| Diagnostic::error(note.message(), note.span)));

    let mut deferred: Vec<Deferred<'_>> = Vec::new();
    for (node, parent) in breadth_first(&outcome.program) {
        collector::collect(node, parent, &mut cx);
        rules::check(node, parent, &mut cx, &mut deferred);
    }

    let queued = deferred.len();
    for check in deferred {
        check.run(&mut cx);
    }

    let unused: Vec<Span> = cx
        .index
        .iter()
        .filter(|(_, decl)| !decl.used)
        .map(|(_, decl)| decl.name_span)
        .collect();
    cx.diagnostics.extend(unused.into_iter().map(Diagnostic::unused));

    tracing::debug!(
        "analyzed {} bytes at chapter {}: {} declarations, {} deferred checks, {} diagnostics in {:?}",
        source.len(),
        chapter,
        cx.index.len(),
        queued,
        cx.diagnostics.len(),
        started.elapsed()
    );

    Analysis {
        chapter,
        first_line,
        program: outcome.program,
        declarations: cx.index,
        diagnostics: cx.diagnostics,
        imports: cx.imports,
        recovered: outcome.error.is_some(),
    }
}

//! Scope-indexed symbol table.
//!
//! Declarations live in an arena in insertion order; a side map groups their
//! ids by name. A name may be declared once per scope. Declarations of the
//! same name in nested scopes shadow each other, and lookups pick the most
//! deeply nested scope that contains the use site.

use std::fmt;

use super::catalogue::Arity;
use super::operand::ValueKind;
use crate::token::{Position, Span};
use crate::util::fast_map::{FastHashMap, fast_hash_map_new};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Import,
    Function,
    Let,
    Const,
    Parameter,
}

/// Coarse classification shown next to completion labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meta {
    Const,
    Let,
    Func,
}

impl Meta {
    pub fn as_str(self) -> &'static str {
        match self {
            Meta::Const => "const",
            Meta::Let => "let",
            Meta::Func => "func",
        }
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

impl DeclId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where an imported name comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSource {
    pub module: String,
    /// The name as the module exports it; may differ from the local alias.
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    /// Span of the block in which the name is visible.
    pub scope: Span,
    pub kind: DeclarationKind,
    pub meta: Meta,
    pub definition_span: Span,
    pub name_span: Span,
    /// Parameters of a function or lambda, in order.
    pub parameters: Option<Vec<DeclId>>,
    /// Callable shape, when known.
    pub arity: Option<Arity>,
    pub is_rest: bool,
    /// Left out of the outline (parameters appear under their function).
    pub hidden: bool,
    pub import: Option<ImportSource>,
    /// Kind of a constant's literal initializer.
    pub value: Option<ValueKind>,
    pub used: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind, meta: Meta, scope: Span, name_span: Span) -> Self {
        Self {
            name: name.into(),
            scope,
            kind,
            meta,
            definition_span: name_span,
            name_span,
            parameters: None,
            arity: None,
            is_rest: false,
            hidden: false,
            import: None,
            value: None,
            used: false,
        }
    }

    pub fn with_definition(mut self, span: Span) -> Self {
        self.definition_span = span;
        self
    }

    /// Whether an assignment to this name is legal.
    pub fn is_reassignable(&self) -> bool {
        match self.kind {
            DeclarationKind::Let => true,
            DeclarationKind::Parameter => self.meta == Meta::Let,
            DeclarationKind::Import | DeclarationKind::Function | DeclarationKind::Const => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeclarationIndex {
    decls: Vec<Declaration>,
    by_name: FastHashMap<String, Vec<DeclId>>,
}

impl DeclarationIndex {
    pub fn new() -> Self {
        Self {
            decls: Vec::new(),
            by_name: fast_hash_map_new(),
        }
    }

    /// Insert `decl` unless its name is already declared in the same scope,
    /// in which case it is handed back.
    pub fn insert(&mut self, decl: Declaration) -> Result<DeclId, Box<Declaration>> {
        let ids = self.by_name.entry(decl.name.clone()).or_default();
        if ids.iter().any(|id| self.decls[id.0].scope == decl.scope) {
            return Err(Box::new(decl));
        }
        let id = DeclId(self.decls.len());
        ids.push(id);
        self.decls.push(decl);
        Ok(id)
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0]
    }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.0]
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// All declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls.iter().enumerate().map(|(i, d)| (DeclId(i), d))
    }

    pub fn named(&self, name: &str) -> &[DeclId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The declaration of `name` visible at `site`: among those whose scope
    /// contains it, the one with the innermost scope.
    pub fn resolve(&self, name: &str, site: &Span) -> Option<DeclId> {
        self.most_specific(self.named(name).iter().copied(), |d| d.scope.contains_span(site))
    }

    pub fn mark_used(&mut self, id: DeclId) {
        self.decls[id.0].used = true;
    }

    /// One declaration per name visible at `pos`, imports excluded, in
    /// insertion order.
    pub fn visible_at(&self, pos: Position) -> Vec<DeclId> {
        let mut out: Vec<DeclId> = self
            .by_name
            .values()
            .filter_map(|ids| {
                self.most_specific(ids.iter().copied(), |d| {
                    d.kind != DeclarationKind::Import && d.scope.contains(pos)
                })
            })
            .collect();
        out.sort();
        out
    }

    fn most_specific(
        &self,
        ids: impl Iterator<Item = DeclId>,
        visible: impl Fn(&Declaration) -> bool,
    ) -> Option<DeclId> {
        let mut best: Option<DeclId> = None;
        for id in ids {
            let decl = self.get(id);
            if !visible(decl) {
                continue;
            }
            match best {
                Some(b) if !self.get(b).scope.contains_span(&decl.scope) => {}
                _ => best = Some(id),
            }
        }
        best
    }
}

//! Checks that need the complete declaration index.
//!
//! The first phase queues them in walk order; the second runs them once
//! every declaration in the document is known, so a use may precede the
//! declaration it refers to.

use super::Context;
use super::declarations::{DeclarationKind, Meta};
use super::operand::{ValueKind, literal_kind};
use crate::ast::{Node, NodeKind};

#[derive(Debug, Clone, Copy)]
pub(super) enum Deferred<'n> {
    /// Reference must resolve to a declaration or a builtin.
    Resolve { ident: &'n Node },
    /// Assignment target must be reassignable.
    Assign { target: &'n Node },
    /// Callee must be callable with this many arguments.
    Call {
        node: &'n Node,
        callee: &'n Node,
        arguments: &'n [Node],
    },
    /// Operands of a strict (in)equality must be strings or numbers of the
    /// same kind.
    Equality {
        node: &'n Node,
        left: &'n Node,
        right: &'n Node,
    },
    /// Computed member index must be a non-negative integer.
    Index { property: &'n Node },
}

impl Deferred<'_> {
    pub(super) fn run(self, cx: &mut Context<'_>) {
        match self {
            Deferred::Resolve { ident } => resolve(ident, cx),
            Deferred::Assign { target } => assign(target, cx),
            Deferred::Call {
                node,
                callee,
                arguments,
            } => call(node, callee, arguments, cx),
            Deferred::Equality { node, left, right } => equality(node, left, right, cx),
            Deferred::Index { property } => index(property, cx),
        }
    }
}

fn resolve(ident: &Node, cx: &mut Context<'_>) {
    let Some(name) = ident.identifier_name() else {
        return;
    };
    match cx.index.resolve(name, &ident.span) {
        Some(id) => cx.index.mark_used(id),
        None => {
            if cx.catalogue.builtin(cx.chapter, name).is_none() {
                cx.error(format!("Name '{}' not declared", name), ident.span);
            }
        }
    }
}

fn assign(target: &Node, cx: &mut Context<'_>) {
    let Some(name) = target.identifier_name() else {
        return;
    };
    let Some(id) = cx.index.resolve(name, &target.span) else {
        return;
    };
    if !cx.index.get(id).is_reassignable() {
        cx.error(format!("Cannot assign new value to constant {}", name), target.span);
    }
}

fn call(node: &Node, callee: &Node, arguments: &[Node], cx: &mut Context<'_>) {
    let Some(name) = callee.identifier_name() else {
        return;
    };

    let arity = match cx.index.resolve(name, &callee.span) {
        Some(id) => {
            let decl = cx.index.get(id);
            // parameters and let-bound names may hold a function by now
            if decl.meta == Meta::Const && decl.kind != DeclarationKind::Parameter {
                cx.error(format!("'{}' is not a function", name), callee.span);
                return;
            }
            decl.arity
        }
        None => cx.catalogue.builtin(cx.chapter, name).and_then(|entry| entry.arity),
    };

    // spread arguments make the count unknowable
    if arguments.iter().any(|a| matches!(a.kind, NodeKind::Spread { .. })) {
        return;
    }
    if let Some(message) = arity.and_then(|a| a.mismatch(arguments.len())) {
        cx.error(message, node.span);
    }
}

/// Kind of an operand: a literal directly, or a constant initialised with one.
fn operand_kind(node: &Node, cx: &Context<'_>) -> Option<ValueKind> {
    if let Some(name) = node.identifier_name() {
        if let Some(id) = cx.index.resolve(name, &node.span) {
            let decl = cx.index.get(id);
            return if decl.kind == DeclarationKind::Const { decl.value } else { None };
        }
    }
    literal_kind(node)
}

fn equality(node: &Node, left: &Node, right: &Node, cx: &mut Context<'_>) {
    let left_kind = operand_kind(left, cx);
    let right_kind = operand_kind(right, cx);

    if let Some(l) = left_kind.filter(|k| !k.is_string_or_number()) {
        cx.error(
            format!("Expected string or number on left hand side of operation, got {}", l.name()),
            node.span,
        );
        return;
    }
    if let Some(r) = right_kind.filter(|k| !k.is_string_or_number()) {
        cx.error(
            format!("Expected string or number on right hand side of operation, got {}", r.name()),
            node.span,
        );
        return;
    }
    if let (Some(l), Some(r)) = (left_kind, right_kind) {
        if !l.same_kind(r) {
            cx.error(
                format!("Expected {} on right hand side of operation, got {}", l.name(), r.name()),
                node.span,
            );
        }
    }
}

fn index(property: &Node, cx: &mut Context<'_>) {
    let Some(kind) = operand_kind(property, cx) else {
        return;
    };
    if let Some(got) = kind.index_complaint() {
        cx.error(
            format!("Expected non negative integer as array index, got {}.", got),
            property.span,
        );
    }
}

//! Declaration collection, run on every `(node, parent)` pair of the
//! breadth-first walk. The parent supplies the scope of names declared by
//! the node itself.

use super::catalogue::Arity;
use super::declarations::{DeclId, Declaration, DeclarationKind, ImportSource, Meta};
use super::operand::literal_kind;
use super::{Context, ImportedName};
use crate::ast::{LiteralValue, Node, NodeKind, SpecifierKind, VarKind};

pub(super) fn collect(node: &Node, parent: &Node, cx: &mut Context<'_>) {
    match &node.kind {
        NodeKind::Import { specifiers, source } => {
            let NodeKind::Literal {
                value: LiteralValue::Str(module),
                ..
            } = &source.kind
            else {
                return;
            };
            if !cx.catalogue.has_module(module) {
                return;
            }
            for spec in specifiers {
                if spec.kind != SpecifierKind::Named {
                    cx.error("Only normal imports are allowed", spec.span);
                    continue;
                }
                let (Some(source_name), Some(local)) = (spec.imported_name(), spec.local.identifier_name()) else {
                    continue;
                };
                // names the module does not export are dropped silently
                let Some(entry) = cx.catalogue.module_entry(module, source_name) else {
                    continue;
                };
                cx.imports.entry(module.clone()).or_default().insert(
                    source_name.to_string(),
                    ImportedName {
                        span: spec.span,
                        local: local.to_string(),
                    },
                );
                let mut decl = Declaration::new(local, DeclarationKind::Import, entry.meta, parent.span, spec.local.span)
                    .with_definition(node.span);
                decl.arity = entry.arity;
                decl.import = Some(ImportSource {
                    module: module.clone(),
                    name: source_name.to_string(),
                });
                cx.declare(decl);
            }
        }

        NodeKind::VariableDeclaration { kind, declarations } => {
            for declarator in declarations {
                let Some(name) = declarator.id.identifier_name() else {
                    continue;
                };
                let (decl_kind, mut meta) = match kind {
                    VarKind::Const => (DeclarationKind::Const, Meta::Const),
                    VarKind::Let | VarKind::Var => (DeclarationKind::Let, Meta::Let),
                };
                let init = declarator.init.as_ref();
                let lambda = init.filter(|n| n.is_lambda());
                if lambda.is_some() {
                    meta = Meta::Func;
                }

                let mut decl = Declaration::new(name, decl_kind, meta, parent.span, declarator.id.span)
                    .with_definition(declarator.span);
                if decl_kind == DeclarationKind::Const {
                    decl.value = init.and_then(literal_kind);
                }
                let own = cx.declare(decl);
                let Some((params, body)) = lambda.and_then(Node::function_parts) else {
                    continue;
                };
                // a rejected duplicate still scopes its lambda's parameters
                match own {
                    Some(id) => attach_parameters(id, params, body, cx),
                    None => {
                        declare_parameters(params, body, cx);
                    }
                }
            }
        }

        NodeKind::FunctionDeclaration { id, params, body } => {
            let own = id.identifier_name().and_then(|name| {
                let decl = Declaration::new(name, DeclarationKind::Function, Meta::Func, parent.span, id.span)
                    .with_definition(node.span);
                cx.declare(decl)
            });
            match own {
                Some(own) => attach_parameters(own, params, body, cx),
                None => {
                    declare_parameters(params, body, cx);
                }
            }
        }

        NodeKind::Arrow { params, body } | NodeKind::FunctionExpression { params, body, .. } => {
            if !is_bound_initializer(node, parent) {
                declare_parameters(params, body, cx);
            }
        }

        _ => {}
    }
}

/// A lambda initializing a plain `name = ...` declarator has its parameters
/// attached to that declaration instead.
fn is_bound_initializer(lambda: &Node, parent: &Node) -> bool {
    let NodeKind::VariableDeclaration { declarations, .. } = &parent.kind else {
        return false;
    };
    declarations
        .iter()
        .any(|d| d.id.identifier_name().is_some() && d.init.as_ref().is_some_and(|init| std::ptr::eq(init, lambda)))
}

fn attach_parameters(owner: DeclId, params: &[Node], body: &Node, cx: &mut Context<'_>) {
    let ids = declare_parameters(params, body, cx);
    let rest = params.iter().any(|p| matches!(p.kind, NodeKind::Rest { .. }));
    let required = params.len() - usize::from(rest);

    let decl = cx.index.get_mut(owner);
    decl.arity = Some(Arity {
        required,
        optional: 0,
        rest,
    });
    decl.parameters = Some(ids);
}

/// Declare each parameter in the scope of `body`. Shapes other than a plain
/// name or `...name` are reported and skipped.
fn declare_parameters(params: &[Node], body: &Node, cx: &mut Context<'_>) -> Vec<DeclId> {
    let meta = if cx.chapter.number() <= 2 { Meta::Const } else { Meta::Let };
    let mut ids = Vec::with_capacity(params.len());
    for param in params {
        let (ident, is_rest): (&Node, bool) = match &param.kind {
            NodeKind::Identifier { .. } => (param, false),
            NodeKind::Rest { argument } if argument.identifier_name().is_some() => (argument, true),
            _ => {
                cx.error("Unexpected token", param.span);
                continue;
            }
        };
        let Some(name) = ident.identifier_name() else {
            continue;
        };
        let mut decl = Declaration::new(name, DeclarationKind::Parameter, meta, body.span, ident.span)
            .with_definition(param.span);
        decl.is_rest = is_rest;
        decl.hidden = true;
        if let Some(id) = cx.declare(decl) {
            ids.push(id);
        }
    }
    ids
}

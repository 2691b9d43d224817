//! Per-node rules.
//!
//! Each rule looks at one node, its parent and the chapter, reports what it
//! can decide immediately, and queues a [`Deferred`] check for anything that
//! depends on declarations the walk may not have reached yet.

use super::Context;
use super::chapter::Chapter;
use super::deferred::Deferred;
use crate::ast::{LiteralValue, Node, NodeKind, VarKind};
use crate::token::Span;

/// Node kinds rejected wholesale, by their ESTree name.
const BANNED: &[&str] = &[
    "ExportDefaultDeclaration",
    "SwitchStatement",
    "TryStatement",
    "ClassDeclaration",
    "DoWhileStatement",
    "NewExpression",
    "ThisExpression",
    "ThrowStatement",
    "WithStatement",
    "ObjectExpression",
    "ForInStatement",
    "ForOfStatement",
];

const BINARY_OPERATORS: &[&str] = &["+", "-", "*", "/", "%", "===", "!==", "<", ">", "<=", ">="];

const UNARY_OPERATORS: &[&str] = &["-", "!"];

pub fn is_banned(node: &Node) -> bool {
    BANNED.contains(&node.type_name())
}

pub(super) fn check<'n>(node: &'n Node, parent: &'n Node, cx: &mut Context<'_>, deferred: &mut Vec<Deferred<'n>>) {
    if is_banned(node) {
        cx.error(format!("{} is not allowed", node.type_name()), node.span);
        return;
    }

    let chapter = cx.chapter;
    match &node.kind {
        NodeKind::Binary { operator, left, right } => {
            incomplete_pair(left, right, node.span, "Incomplete binary expression", cx);
            if *operator == "==" || *operator == "!=" {
                cx.error(format!("Use {}= instead of {}", operator, operator), node.span);
            } else if !BINARY_OPERATORS.contains(operator) {
                cx.error(format!("{} operator is not allowed", operator), node.span);
            }
            if (*operator == "===" || *operator == "!==") && chapter < Chapter::Three {
                deferred.push(Deferred::Equality { node, left, right });
            }
        }

        NodeKind::Logical { operator, left, right } => {
            incomplete_pair(left, right, node.span, "Incomplete binary expression", cx);
            if *operator == "??" {
                cx.error("?? operator is not allowed", node.span);
            }
        }

        NodeKind::Unary { operator, .. } => {
            if !UNARY_OPERATORS.contains(operator) {
                cx.error(format!("{} operator is not allowed", operator), node.span);
            }
        }

        NodeKind::Update { operator, .. } => cx.error(format!("{} operator is not allowed", operator), node.span),

        NodeKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if test.is_malformed() || consequent.is_malformed() || alternate.is_malformed() {
                cx.error("Incomplete ternary", node.span);
            }
        }

        NodeKind::Assignment { operator, left, .. } => {
            if *operator != "=" {
                cx.error(format!("{} operator is not allowed", operator), node.span);
            }
            if left.identifier_name().is_some() {
                deferred.push(Deferred::Assign { target: left });
            }
        }

        NodeKind::Call { callee, arguments } => {
            if callee.identifier_name().is_some() {
                deferred.push(Deferred::Call {
                    node,
                    callee,
                    arguments,
                });
            }
        }

        NodeKind::Identifier { name } => {
            if name == "eval" {
                cx.error("eval is not allowed", node.span);
            }
            if !matches!(parent.kind, NodeKind::Import { .. }) {
                deferred.push(Deferred::Resolve { ident: node });
            }
        }

        NodeKind::If {
            consequent,
            alternate,
            ..
        } => {
            if chapter < Chapter::Three && alternate.is_none() {
                cx.error("Missing \"else\" in \"if-else\" statement", node.span.until(&consequent.span));
            }
            if !consequent.is_block() {
                cx.error("Missing curly braces around if", consequent.span);
            }
            if let Some(alternate) = alternate {
                if !alternate.is_block() && !matches!(alternate.kind, NodeKind::If { .. }) {
                    cx.error("Missing curly braces around else", alternate.span);
                }
            }
        }

        NodeKind::While { body, .. } => {
            let head = node.span.until(&body.span);
            if chapter < Chapter::Three {
                cx.error("While statements are not allowed", head);
            }
            if !body.is_block() {
                cx.error("Missing curly braces around while", head);
            }
        }

        NodeKind::For {
            init,
            test,
            update,
            body,
        } => {
            let head = node.span.until(&body.span);
            if chapter < Chapter::Three {
                cx.error("For statements are not allowed", head);
            }
            if !body.is_block() {
                cx.error("Missing curly braces around for", head);
            }
            if init.is_none() || test.is_none() || update.is_none() {
                cx.error("Incomplete for loop", head);
            }
        }

        NodeKind::Break => {
            if chapter < Chapter::Three {
                cx.error("Break statements are not allowed", node.span);
            }
        }

        NodeKind::Continue => {
            if chapter < Chapter::Three {
                cx.error("Continue statements are not allowed", node.span);
            }
        }

        NodeKind::Return { argument } => {
            if argument.is_none() {
                cx.error("Missing value in return statement", node.span);
            }
        }

        NodeKind::Literal { value, raw } => match value {
            LiteralValue::Str(_) if !is_closed_string(raw) => cx.error("Incomplete string expression", node.span),
            LiteralValue::Null if chapter == Chapter::One => cx.error("Null literals not allowed", node.span),
            _ => {}
        },

        NodeKind::Template { interpolations } => {
            for span in interpolations {
                cx.error("Expressions not allowed in template literal", *span);
            }
        }

        NodeKind::Array { elements } => {
            if chapter < Chapter::Three {
                cx.error("Array expressions are not allowed", node.span);
            }
            if elements.iter().any(Option::is_none) {
                cx.error("No holes are allowed in array literals", node.span);
            }
        }

        NodeKind::Member {
            property, computed, ..
        } => {
            if chapter < Chapter::Three {
                cx.error("Member access expressions are not allowed", node.span);
            }
            if !computed {
                cx.error("No dot abbreviations", node.span);
            } else {
                deferred.push(Deferred::Index { property });
            }
        }

        NodeKind::Spread { .. } => {
            if !matches!(parent.kind, NodeKind::Call { .. }) {
                cx.error(
                    "Spread syntax is only allowed when supplying arguments to a function",
                    node.span,
                );
            }
        }

        NodeKind::VariableDeclaration { kind, declarations } => {
            if declarations.len() > 1 {
                cx.error("Multiple declarations not allowed", node.span);
            }
            // a for-in/of head has no initializer of its own
            let loop_head = matches!(parent.kind, NodeKind::ForIn { .. });
            for declarator in declarations {
                let id = &declarator.id;
                if !id.is_malformed() && id.identifier_name().is_none() {
                    cx.error("Destructuring declarations are not allowed", declarator.span);
                }
                let init_missing = declarator.init.as_ref().is_none_or(Node::is_malformed);
                if id.is_malformed() || (init_missing && !loop_head) {
                    cx.error("Incomplete variable declaration", node.span);
                }
            }
            if chapter < Chapter::Three && *kind != VarKind::Const {
                cx.error("Use keyword \"const\" instead to declare a constant", node.span);
            }
        }

        NodeKind::FunctionDeclaration { id, params, .. } => {
            if id.is_malformed() {
                cx.error("Missing function name", node.span);
            }
            params_after_rest(params, cx);
        }

        NodeKind::FunctionExpression { params, .. } | NodeKind::Arrow { params, .. } => params_after_rest(params, cx),

        NodeKind::Import { source, .. } => {
            if source.is_malformed() {
                cx.error("Expected module name", node.span);
            }
        }

        _ => {}
    }
}

fn incomplete_pair(left: &Node, right: &Node, span: Span, message: &str, cx: &mut Context<'_>) {
    if left.is_malformed() || right.is_malformed() {
        cx.error(message, span);
    }
}

/// Raw string text opened and closed by the same quote.
fn is_closed_string(raw: &str) -> bool {
    let mut chars = raw.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) => open == close,
        _ => false,
    }
}

fn params_after_rest(params: &[Node], cx: &mut Context<'_>) {
    let Some(rest) = params.iter().position(|p| matches!(p.kind, NodeKind::Rest { .. })) else {
        return;
    };
    if let (Some(first), Some(last)) = (params.get(rest + 1), params.last()) {
        cx.error("No params allowed after rest element", first.span.to(&last.span));
    }
}

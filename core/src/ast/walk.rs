use std::collections::VecDeque;

use super::{Node, NodeKind, SpecifierKind};

/// Semantically relevant children of `node`.
///
/// Binding positions (declared names, parameters, import aliases other than
/// named specifiers) and non-computed property names are left out; they are
/// not references. Declaration collection and rule dispatch both walk this.
pub fn children(node: &Node) -> Vec<&Node> {
    let mut out: Vec<&Node> = Vec::new();
    match &node.kind {
        NodeKind::Program { body } | NodeKind::Block { body } => out.extend(body),
        NodeKind::Expression { expression } => out.push(expression),
        NodeKind::VariableDeclaration { declarations, .. } => {
            out.extend(declarations.iter().filter_map(|d| d.init.as_ref()));
        }
        NodeKind::FunctionDeclaration { body, .. } => out.push(body),
        NodeKind::FunctionExpression { body, .. } | NodeKind::Arrow { body, .. } => out.push(body),
        NodeKind::Return { argument } => out.extend(argument.as_deref()),
        NodeKind::If {
            test,
            consequent,
            alternate,
        } => {
            out.push(test);
            out.push(consequent);
            out.extend(alternate.as_deref());
        }
        NodeKind::While { test, body } => {
            out.push(test);
            out.push(body);
        }
        NodeKind::DoWhile { body, test } => {
            out.push(body);
            out.push(test);
        }
        NodeKind::For {
            init,
            test,
            update,
            body,
        } => {
            out.extend(init.as_deref());
            out.extend(test.as_deref());
            out.extend(update.as_deref());
            out.push(body);
        }
        NodeKind::ForIn { left, right, body, .. } => {
            out.push(left);
            out.push(right);
            out.push(body);
        }
        NodeKind::Throw { argument } => out.push(argument),
        NodeKind::Try {
            block,
            handler,
            finalizer,
        } => {
            out.push(block);
            if let Some(h) = handler {
                out.push(&h.body);
            }
            out.extend(finalizer.as_deref());
        }
        NodeKind::Switch { discriminant, cases } => {
            out.push(discriminant);
            for case in cases {
                out.extend(case.test.as_ref());
                out.extend(&case.consequent);
            }
        }
        NodeKind::With { object, body } => {
            out.push(object);
            out.push(body);
        }
        NodeKind::Import { specifiers, .. } => {
            for spec in specifiers.iter().filter(|s| s.kind == SpecifierKind::Named) {
                if let Some(imported) = &spec.imported {
                    out.push(imported);
                    if imported.span != spec.local.span {
                        out.push(&spec.local);
                    }
                }
            }
        }
        NodeKind::ExportNamed { declaration } => out.extend(declaration.as_deref()),
        NodeKind::ExportDefault { declaration } => out.push(declaration),
        NodeKind::Array { elements } => out.extend(elements.iter().flatten()),
        NodeKind::Object { properties } => out.extend(properties),
        NodeKind::Property {
            key, value, computed, ..
        } => {
            if *computed {
                out.push(key);
            }
            out.push(value);
        }
        NodeKind::Unary { argument, .. }
        | NodeKind::Update { argument, .. }
        | NodeKind::Spread { argument }
        | NodeKind::Rest { argument } => out.push(argument),
        NodeKind::Binary { left, right, .. }
        | NodeKind::Logical { left, right, .. }
        | NodeKind::Assignment { left, right, .. } => {
            out.push(left);
            out.push(right);
        }
        NodeKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            out.push(test);
            out.push(alternate);
            out.push(consequent);
        }
        NodeKind::Call { callee, arguments } | NodeKind::New { callee, arguments } => {
            out.extend(arguments);
            out.push(callee);
        }
        NodeKind::Member {
            object,
            property,
            computed,
        } => {
            out.push(object);
            if *computed {
                out.push(property);
            }
        }
        NodeKind::Sequence { expressions } => out.extend(expressions),
        NodeKind::Empty
        | NodeKind::Break
        | NodeKind::Continue
        | NodeKind::Debugger
        | NodeKind::Class { .. }
        | NodeKind::Identifier { .. }
        | NodeKind::Literal { .. }
        | NodeKind::Template { .. }
        | NodeKind::This
        | NodeKind::Malformed => {}
    }
    out
}

/// Every child node, binding positions included.
pub fn all_children(node: &Node) -> Vec<&Node> {
    let mut out: Vec<&Node> = Vec::new();
    match &node.kind {
        NodeKind::VariableDeclaration { declarations, .. } => {
            for d in declarations {
                out.push(&d.id);
                out.extend(d.init.as_ref());
            }
        }
        NodeKind::FunctionDeclaration { id, params, body } => {
            out.push(id);
            out.extend(params);
            out.push(body);
        }
        NodeKind::FunctionExpression { id, params, body } => {
            out.extend(id.as_deref());
            out.extend(params);
            out.push(body);
        }
        NodeKind::Arrow { params, body } => {
            out.extend(params);
            out.push(body);
        }
        NodeKind::Try {
            block,
            handler,
            finalizer,
        } => {
            out.push(block);
            if let Some(h) = handler {
                out.extend(h.param.as_ref());
                out.push(&h.body);
            }
            out.extend(finalizer.as_deref());
        }
        NodeKind::Import { specifiers, source } => {
            for spec in specifiers {
                if let Some(imported) = &spec.imported {
                    out.push(imported);
                }
                if spec.imported.as_ref().map(|i| i.span) != Some(spec.local.span) {
                    out.push(&spec.local);
                }
            }
            out.push(source);
        }
        NodeKind::Class { id } => out.extend(id.as_deref()),
        NodeKind::Property { key, value, shorthand, .. } => {
            out.push(key);
            if !*shorthand {
                out.push(value);
            }
        }
        NodeKind::Member { object, property, .. } => {
            out.push(object);
            out.push(property);
        }
        _ => return children(node),
    }
    out
}

/// Breadth-first traversal yielding `(node, parent)` pairs.
///
/// The root itself is never yielded; its children come first with the root
/// as their parent.
pub struct BreadthFirst<'a> {
    queue: VecDeque<(&'a Node, &'a Node)>,
    expand: fn(&'a Node) -> Vec<&'a Node>,
}

impl<'a> BreadthFirst<'a> {
    fn new(root: &'a Node, expand: fn(&'a Node) -> Vec<&'a Node>) -> Self {
        let queue = expand(root).into_iter().map(|child| (child, root)).collect();
        Self { queue, expand }
    }

    /// Same traversal over [`all_children`].
    pub fn all(root: &'a Node) -> Self {
        Self::new(root, all_children)
    }
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = (&'a Node, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, parent) = self.queue.pop_front()?;
        for child in (self.expand)(node) {
            self.queue.push_back((child, node));
        }
        Some((node, parent))
    }
}

pub fn breadth_first(root: &Node) -> BreadthFirst<'_> {
    BreadthFirst::new(root, children)
}

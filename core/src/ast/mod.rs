//! Syntax tree for the Source language.
//!
//! One tagged union covers statements and expressions. Fragments the lenient
//! parser could not make sense of become [`NodeKind::Malformed`].

mod walk;

pub use walk::{BreadthFirst, all_children, breadth_first, children};

use crate::token::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

impl VarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarKind::Const => "const",
            VarKind::Let => "let",
            VarKind::Var => "var",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub id: Node,
    pub init: Option<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    Named,
    Default,
    Namespace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    pub kind: SpecifierKind,
    /// Name as exported by the module; only present for named specifiers.
    pub imported: Option<Node>,
    pub local: Node,
    pub span: Span,
}

impl ImportSpecifier {
    pub fn imported_name(&self) -> Option<&str> {
        self.imported.as_ref().and_then(Node::identifier_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Node>,
    pub body: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Node>,
    pub consequent: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        body: Vec<Node>,
    },

    // Statements
    Block {
        body: Vec<Node>,
    },
    Empty,
    Expression {
        expression: Box<Node>,
    },
    VariableDeclaration {
        kind: VarKind,
        declarations: Vec<Declarator>,
    },
    FunctionDeclaration {
        id: Box<Node>,
        params: Vec<Node>,
        body: Box<Node>,
    },
    Return {
        argument: Option<Box<Node>>,
    },
    If {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    While {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhile {
        body: Box<Node>,
        test: Box<Node>,
    },
    For {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    /// `for (x in y)` when `of` is false, `for (x of y)` otherwise.
    ForIn {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
        of: bool,
    },
    Break,
    Continue,
    Throw {
        argument: Box<Node>,
    },
    Try {
        block: Box<Node>,
        handler: Option<Box<CatchClause>>,
        finalizer: Option<Box<Node>>,
    },
    Switch {
        discriminant: Box<Node>,
        cases: Vec<SwitchCase>,
    },
    With {
        object: Box<Node>,
        body: Box<Node>,
    },
    Debugger,
    Class {
        id: Option<Box<Node>>,
    },
    Import {
        specifiers: Vec<ImportSpecifier>,
        source: Box<Node>,
    },
    ExportNamed {
        declaration: Option<Box<Node>>,
    },
    ExportDefault {
        declaration: Box<Node>,
    },

    // Expressions
    Identifier {
        name: String,
    },
    Literal {
        value: LiteralValue,
        raw: String,
    },
    Template {
        interpolations: Vec<Span>,
    },
    Array {
        elements: Vec<Option<Node>>,
    },
    Object {
        properties: Vec<Node>,
    },
    Property {
        key: Box<Node>,
        value: Box<Node>,
        computed: bool,
        shorthand: bool,
    },
    Arrow {
        params: Vec<Node>,
        body: Box<Node>,
    },
    FunctionExpression {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
    },
    Unary {
        operator: &'static str,
        argument: Box<Node>,
    },
    Update {
        operator: &'static str,
        prefix: bool,
        argument: Box<Node>,
    },
    Binary {
        operator: &'static str,
        left: Box<Node>,
        right: Box<Node>,
    },
    Logical {
        operator: &'static str,
        left: Box<Node>,
        right: Box<Node>,
    },
    Assignment {
        operator: &'static str,
        left: Box<Node>,
        right: Box<Node>,
    },
    Conditional {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    New {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    Member {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    Sequence {
        expressions: Vec<Node>,
    },
    Spread {
        argument: Box<Node>,
    },
    Rest {
        argument: Box<Node>,
    },
    This,

    /// Placeholder for a fragment the lenient parser had to skip over.
    Malformed,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn malformed(span: Span) -> Self {
        Self {
            kind: NodeKind::Malformed,
            span,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, NodeKind::Malformed)
    }

    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, NodeKind::Block { .. })
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self.kind, NodeKind::Arrow { .. } | NodeKind::FunctionExpression { .. })
    }

    /// Parameters and body of a function-like node.
    pub fn function_parts(&self) -> Option<(&[Node], &Node)> {
        match &self.kind {
            NodeKind::FunctionDeclaration { params, body, .. }
            | NodeKind::FunctionExpression { params, body, .. }
            | NodeKind::Arrow { params, body } => Some((params, body)),
            _ => None,
        }
    }

    /// ESTree-style name of the node kind, used in user-facing messages.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Program { .. } => "Program",
            NodeKind::Block { .. } => "BlockStatement",
            NodeKind::Empty => "EmptyStatement",
            NodeKind::Expression { .. } => "ExpressionStatement",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::FunctionDeclaration { .. } => "FunctionDeclaration",
            NodeKind::Return { .. } => "ReturnStatement",
            NodeKind::If { .. } => "IfStatement",
            NodeKind::While { .. } => "WhileStatement",
            NodeKind::DoWhile { .. } => "DoWhileStatement",
            NodeKind::For { .. } => "ForStatement",
            NodeKind::ForIn { of: false, .. } => "ForInStatement",
            NodeKind::ForIn { of: true, .. } => "ForOfStatement",
            NodeKind::Break => "BreakStatement",
            NodeKind::Continue => "ContinueStatement",
            NodeKind::Throw { .. } => "ThrowStatement",
            NodeKind::Try { .. } => "TryStatement",
            NodeKind::Switch { .. } => "SwitchStatement",
            NodeKind::With { .. } => "WithStatement",
            NodeKind::Debugger => "DebuggerStatement",
            NodeKind::Class { .. } => "ClassDeclaration",
            NodeKind::Import { .. } => "ImportDeclaration",
            NodeKind::ExportNamed { .. } => "ExportNamedDeclaration",
            NodeKind::ExportDefault { .. } => "ExportDefaultDeclaration",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::Template { .. } => "TemplateLiteral",
            NodeKind::Array { .. } => "ArrayExpression",
            NodeKind::Object { .. } => "ObjectExpression",
            NodeKind::Property { .. } => "Property",
            NodeKind::Arrow { .. } => "ArrowFunctionExpression",
            NodeKind::FunctionExpression { .. } => "FunctionExpression",
            NodeKind::Unary { .. } => "UnaryExpression",
            NodeKind::Update { .. } => "UpdateExpression",
            NodeKind::Binary { .. } => "BinaryExpression",
            NodeKind::Logical { .. } => "LogicalExpression",
            NodeKind::Assignment { .. } => "AssignmentExpression",
            NodeKind::Conditional { .. } => "ConditionalExpression",
            NodeKind::Call { .. } => "CallExpression",
            NodeKind::New { .. } => "NewExpression",
            NodeKind::Member { .. } => "MemberExpression",
            NodeKind::Sequence { .. } => "SequenceExpression",
            NodeKind::Spread { .. } => "SpreadElement",
            NodeKind::Rest { .. } => "RestElement",
            NodeKind::This => "ThisExpression",
            NodeKind::Malformed => "Malformed",
        }
    }
}

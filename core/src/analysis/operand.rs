use crate::ast::{LiteralValue, Node, NodeKind};

/// Statically known shape of a value, as far as literals reveal it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number { integer: bool, negative: bool },
    Boolean,
    Null,
    Undefined,
    Array,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number { .. } => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Undefined => "undefined",
            ValueKind::Array => "array",
        }
    }

    pub fn is_string_or_number(self) -> bool {
        matches!(self, ValueKind::String | ValueKind::Number { .. })
    }

    /// Same kind, ignoring numeric detail.
    pub fn same_kind(self, other: ValueKind) -> bool {
        self.name() == other.name()
    }

    /// What a rejected array index is called, `None` when it is acceptable.
    pub fn index_complaint(self) -> Option<&'static str> {
        match self {
            ValueKind::Number {
                integer: true,
                negative: false,
            } => None,
            ValueKind::Number { integer: false, .. } => Some("float"),
            ValueKind::Number { negative: true, .. } => Some("negative number"),
            other => Some(other.name()),
        }
    }
}

fn number(value: f64) -> ValueKind {
    ValueKind::Number {
        integer: value.is_finite() && value.fract() == 0.0,
        negative: value < 0.0,
    }
}

/// Kind of `node` when it is a literal (or `undefined`, or a negated
/// number). Identifiers other than `undefined` are left to the caller.
pub fn literal_kind(node: &Node) -> Option<ValueKind> {
    match &node.kind {
        NodeKind::Literal { value, .. } => Some(match value {
            LiteralValue::Str(_) => ValueKind::String,
            LiteralValue::Num(n) => number(*n),
            LiteralValue::Bool(_) => ValueKind::Boolean,
            LiteralValue::Null => ValueKind::Null,
        }),
        NodeKind::Identifier { name } if name == "undefined" => Some(ValueKind::Undefined),
        NodeKind::Array { .. } => Some(ValueKind::Array),
        NodeKind::Unary { operator: "-", argument } => match &argument.kind {
            NodeKind::Literal {
                value: LiteralValue::Num(n),
                ..
            } => Some(number(-*n)),
            _ => None,
        },
        _ => None,
    }
}

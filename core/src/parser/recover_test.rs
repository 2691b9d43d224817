use crate::ast::{Node, NodeKind};
use crate::parser::{ParseNoteKind, parse};
use crate::token::{Position, Span};

fn span(l1: u32, c1: u32, l2: u32, c2: u32) -> Span {
    Span::new(Position::at(l1, c1), Position::at(l2, c2))
}

fn body(program: &Node) -> &[Node] {
    match &program.kind {
        NodeKind::Program { body } => body,
        other => panic!("expected program, got {:?}", other),
    }
}

fn expression(stmt: &Node) -> &Node {
    match &stmt.kind {
        NodeKind::Expression { expression } => expression,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_dangling_dot_becomes_malformed_property() {
    let outcome = parse("display(\"hello world\".);", 1);
    assert!(outcome.recovered());
    let NodeKind::Call { arguments, .. } = &expression(&body(&outcome.program)[0]).kind else {
        panic!("expected call");
    };
    match &arguments[0].kind {
        NodeKind::Member {
            property, computed, ..
        } => {
            assert!(!*computed);
            assert!(property.is_malformed());
            assert_eq!(property.span, span(1, 22, 1, 22));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(arguments[0].span, span(1, 8, 1, 22));
}

#[test]
fn test_missing_operand_inside_parens() {
    let outcome = parse("10 + (5 / );", 1);
    assert!(outcome.recovered());
    let NodeKind::Binary { right, .. } = &expression(&body(&outcome.program)[0]).kind else {
        panic!("expected binary");
    };
    match &right.kind {
        NodeKind::Binary { operator, right, .. } => {
            assert_eq!(*operator, "/");
            assert!(right.is_malformed());
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(right.span, span(1, 6, 1, 10));
}

#[test]
fn test_function_without_name() {
    let outcome = parse("function (x) {\n  return x;\n}", 1);
    assert!(outcome.recovered());
    match &body(&outcome.program)[0].kind {
        NodeKind::FunctionDeclaration { id, params, .. } => {
            assert!(id.is_malformed());
            assert_eq!(params.len(), 1);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_missing_initializer_expression() {
    let outcome = parse("const x = ;\nconst y = 2;", 1);
    assert!(outcome.recovered());
    let stmts = body(&outcome.program);
    assert_eq!(stmts.len(), 2);
    let NodeKind::VariableDeclaration { declarations, .. } = &stmts[0].kind else {
        panic!("expected declaration");
    };
    assert!(declarations[0].init.as_ref().unwrap().is_malformed());
}

#[test]
fn test_rest_parameter_not_last_is_kept() {
    let outcome = parse("const f = (a, ...b, c) => a;", 1);
    assert!(outcome.recovered());
    let NodeKind::VariableDeclaration { declarations, .. } = &body(&outcome.program)[0].kind else {
        panic!("expected declaration");
    };
    match &declarations[0].init.as_ref().unwrap().kind {
        NodeKind::Arrow { params, .. } => {
            assert_eq!(params.len(), 3);
            assert!(matches!(params[1].kind, NodeKind::Rest { .. }));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_unterminated_string_literal() {
    let outcome = parse("const s = \"abc;\nconst t = 1;", 1);
    assert!(outcome.recovered());
    let stmts = body(&outcome.program);
    let NodeKind::VariableDeclaration { declarations, .. } = &stmts[0].kind else {
        panic!("expected declaration");
    };
    match &declarations[0].init.as_ref().unwrap().kind {
        NodeKind::Literal { raw, .. } => assert_eq!(raw, "\"abc;"),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(stmts.len(), 2);
}

#[test]
fn test_extra_semicolon_in_for_header() {
    let outcome = parse("for (let i = 0; i < 5; i = i + 1;) {\n  i;\n}", 1);
    assert!(outcome.recovered());
    match &body(&outcome.program)[0].kind {
        NodeKind::For { update, body, .. } => {
            assert!(update.is_some());
            assert!(body.is_block());
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_unclosed_block() {
    let outcome = parse("if (x) {\n  y;\n", 1);
    assert!(outcome.recovered());
    assert!(matches!(body(&outcome.program)[0].kind, NodeKind::If { .. }));
}

#[test]
fn test_missing_module_name() {
    let outcome = parse("import { heart } from ;", 1);
    assert!(outcome.recovered());
    match &body(&outcome.program)[0].kind {
        NodeKind::Import { specifiers, source } => {
            assert_eq!(specifiers.len(), 1);
            assert!(source.is_malformed());
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_notes_before_failure_are_kept() {
    let outcome = parse("const a = 1\nconst b = ;", 1);
    assert!(outcome.recovered());
    assert_eq!(outcome.notes.len(), 1);
    assert_eq!(outcome.notes[0].kind, ParseNoteKind::MissingSemicolon);
}

#[test]
fn test_stray_tokens_are_skipped() {
    let outcome = parse(") ] # const x = 1;", 1);
    assert!(outcome.recovered());
    let stmts = body(&outcome.program);
    assert_eq!(stmts.len(), 1);
    assert_eq!(stmts[0].type_name(), "VariableDeclaration");
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let src = format!("{}1{};", "(".repeat(500), ")".repeat(500));
    let outcome = parse(&src, 1);
    assert!(outcome.recovered());
    assert!(!body(&outcome.program).is_empty());
}

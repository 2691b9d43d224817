use super::*;
use crate::token::Position;

/// A handful of builtins and one module, enough to exercise the rules.
pub(super) struct TestCatalogue;

fn func(required: usize, optional: usize, rest: bool) -> Option<EntryInfo> {
    Some(EntryInfo {
        meta: Meta::Func,
        arity: Some(Arity {
            required,
            optional,
            rest,
        }),
    })
}

fn constant() -> Option<EntryInfo> {
    Some(EntryInfo {
        meta: Meta::Const,
        arity: None,
    })
}

impl Catalogue for TestCatalogue {
    fn builtin(&self, chapter: Chapter, name: &str) -> Option<EntryInfo> {
        match name {
            "display" => func(1, 1, false),
            "math_max" => func(0, 0, true),
            "is_number" => func(1, 0, false),
            "undefined" | "math_PI" | "NaN" | "Infinity" => constant(),
            "pair" if chapter >= Chapter::Two => func(2, 0, false),
            "list" if chapter >= Chapter::Two => func(0, 0, true),
            "set_head" if chapter >= Chapter::Three => func(2, 0, false),
            _ => None,
        }
    }

    fn has_module(&self, module: &str) -> bool {
        module == "rune"
    }

    fn module_entry(&self, module: &str, name: &str) -> Option<EntryInfo> {
        if module != "rune" {
            return None;
        }
        match name {
            "heart" => constant(),
            "show" => func(1, 0, false),
            "beside" => func(2, 0, false),
            _ => None,
        }
    }
}

pub(super) fn run(src: &str, chapter: Chapter) -> Analysis {
    analyze(src, chapter, 1, &TestCatalogue)
}

fn errors(analysis: &Analysis) -> Vec<&str> {
    analysis
        .diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.message.as_str())
        .collect()
}

fn find<'a>(analysis: &'a Analysis, message: &str) -> &'a Diagnostic {
    analysis
        .diagnostics
        .iter()
        .find(|d| d.message == message)
        .unwrap_or_else(|| panic!("no diagnostic {:?} in {:#?}", message, analysis.diagnostics))
}

fn span(l1: u32, c1: u32, l2: u32, c2: u32) -> Span {
    Span::new(Position::at(l1, c1), Position::at(l2, c2))
}

#[test]
fn test_innermost_declaration_wins() {
    let analysis = run("const x = 1;\n{ const x = 2; display(x); }", Chapter::One);
    assert_eq!(analysis.diagnostics.len(), 1, "{:#?}", analysis.diagnostics);
    let unused = &analysis.diagnostics[0];
    assert_eq!(unused.message, "Unused name");
    assert_eq!(unused.severity, Severity::Warning);
    assert_eq!(unused.tags, vec![DiagnosticTag::Unnecessary]);
    assert_eq!(unused.span, span(1, 6, 1, 7));
}

#[test]
fn test_duplicate_declaration_in_same_scope() {
    let analysis = run("let x = 1; let x = 2; x;", Chapter::Four);
    assert_eq!(analysis.diagnostics.len(), 1, "{:#?}", analysis.diagnostics);
    let dup = &analysis.diagnostics[0];
    assert_eq!(dup.message, "Identifier 'x' has already been declared");
    assert_eq!(dup.span, span(1, 15, 1, 16));
    assert_eq!(analysis.declarations.named("x").len(), 1);
}

#[test]
fn test_shadowing_in_nested_scope_is_not_duplicate() {
    let analysis = run("const x = 1;\nfunction f(x) {\n  return x;\n}\nf(x);", Chapter::One);
    assert!(errors(&analysis).is_empty(), "{:#?}", analysis.diagnostics);
    assert_eq!(analysis.declarations.named("x").len(), 2);
}

#[test]
fn test_builtin_arity_with_optional_parameter() {
    let analysis = run("display();", Chapter::One);
    let d = find(&analysis, "Expected between 1 and 2 arguments, but got 0");
    assert_eq!(d.span, span(1, 0, 1, 9));
    assert!(errors(&run("display(1, \"label\");", Chapter::One)).is_empty());
}

#[test]
fn test_user_function_arity() {
    let analysis = run(
        "function f(a, b) { return a + b; }\nf(1);\nfunction g(a, ...rest) { return rest; }\ng();",
        Chapter::Three,
    );
    let exact = find(&analysis, "Expected 2 arguments, but got 1");
    assert_eq!(exact.span, span(2, 0, 2, 4));
    find(&analysis, "Expected 1 or more arguments, but got 0");
}

#[test]
fn test_spread_argument_skips_arity() {
    let analysis = run("const xs = list(1, 2);\npair(...xs);", Chapter::Three);
    assert!(errors(&analysis).is_empty(), "{:#?}", analysis.diagnostics);
}

#[test]
fn test_let_bound_lambda_arity() {
    let analysis = run("let f = (a) => a;\nf();", Chapter::Three);
    assert_eq!(errors(&analysis), vec!["Expected 1 arguments, but got 0"]);
    assert_eq!(find(&analysis, "Expected 1 arguments, but got 0").span, span(2, 0, 2, 3));

    let reassigned = run("let h = 1;\nh = x => x;\nh(2);", Chapter::Three);
    assert!(errors(&reassigned).is_empty(), "{:#?}", reassigned.diagnostics);
}

#[test]
fn test_duplicate_lambda_binding_keeps_parameters() {
    let analysis = run("let f = 1;\nlet f = x => x + 1;\nf;", Chapter::Three);
    assert_eq!(errors(&analysis), vec!["Identifier 'f' has already been declared"]);
    assert_eq!(analysis.declarations.named("x").len(), 1);
}

fn nested_pairs(depth: usize) -> String {
    format!("{}null{}", "pair(1, ".repeat(depth), ")".repeat(depth))
}

/// Deep nesting recurses once per level; give it room in debug builds.
fn on_large_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

#[test]
fn test_deeply_nested_list_parses_strictly() {
    let analysis = on_large_stack(|| {
        let src = format!("const a = {};\nconst b = 2;\nb + a;\nc;", nested_pairs(70));
        run(&src, Chapter::Two)
    });
    assert!(!analysis.recovered);
    assert_eq!(errors(&analysis), vec!["Name 'c' not declared"]);
}

#[test]
fn test_code_after_over_deep_expression_is_analyzed() {
    let analysis = on_large_stack(|| {
        let src = format!(
            "const a = {};\nconst b = 2;\nb + a;\nc;",
            nested_pairs(crate::parser::MAX_DEPTH + 20)
        );
        run(&src, Chapter::Two)
    });
    assert!(analysis.recovered);
    assert_eq!(errors(&analysis), vec!["Name 'c' not declared"]);
    assert_eq!(analysis.diagnostics.len(), 1, "{:#?}", analysis.diagnostics);
}

#[test]
fn test_call_of_constant() {
    let analysis = run("const x = 1;\nx();", Chapter::One);
    let d = find(&analysis, "'x' is not a function");
    assert_eq!(d.span, span(2, 0, 2, 1));
}

#[test]
fn test_analysis_is_deterministic() {
    let src = "const a = 1;\nconst b = a + c;\nfunction f(x, y) { return x; }\nf(b);";
    let first = run(src, Chapter::Two);
    let second = run(src, Chapter::Two);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_array_gated_by_chapter() {
    assert!(errors(&run("[1, 2, 3];", Chapter::One)).contains(&"Array expressions are not allowed"));
    assert!(errors(&run("[1, 2, 3];", Chapter::Three)).is_empty());
    assert!(errors(&run("[1, , 3];", Chapter::Three)).contains(&"No holes are allowed in array literals"));
}

#[test]
fn test_banned_node_kinds() {
    let analysis = run("class A {}\nthis;\nconst o = {};\nfor (const k of o) { k; }", Chapter::Four);
    let errs = errors(&analysis);
    assert!(errs.contains(&"ClassDeclaration is not allowed"));
    assert!(errs.contains(&"ThisExpression is not allowed"));
    assert!(errs.contains(&"ObjectExpression is not allowed"));
    assert!(errs.contains(&"ForOfStatement is not allowed"));
    assert!(!errs.contains(&"Incomplete variable declaration"));
}

#[test]
fn test_operator_whitelists() {
    let analysis = run("1 == 1;\n1 != 2;\n1 & 2;\n-1;\n!true;\ntypeof 1;\n1 ?? 2;", Chapter::Three);
    let errs = errors(&analysis);
    assert!(errs.contains(&"Use === instead of =="));
    assert!(errs.contains(&"Use !== instead of !="));
    assert!(errs.contains(&"& operator is not allowed"));
    assert!(errs.contains(&"typeof operator is not allowed"));
    assert!(errs.contains(&"?? operator is not allowed"));
    assert_eq!(errs.len(), 5, "{:#?}", errs);
}

#[test]
fn test_compound_and_update_operators() {
    let errs_of = |src| {
        run(src, Chapter::Three)
            .diagnostics
            .into_iter()
            .filter(Diagnostic::is_error)
            .map(|d| d.message)
            .collect::<Vec<_>>()
    };
    assert_eq!(errs_of("let i = 0;\ni += 1;"), vec!["+= operator is not allowed"]);
    assert_eq!(errs_of("let i = 0;\ni++;"), vec!["++ operator is not allowed"]);
}

#[test]
fn test_strict_equality_operand_kinds() {
    let analysis = run("true === 1;\n1 === \"a\";\nconst s = \"a\";\ns === 1;\n1 === null;", Chapter::One);
    let errs = errors(&analysis);
    assert!(errs.contains(&"Expected string or number on left hand side of operation, got boolean"));
    assert!(errs.contains(&"Expected number on right hand side of operation, got string"));
    assert!(errs.contains(&"Expected string on right hand side of operation, got number"));
    assert!(errs.contains(&"Null literals not allowed"));
    assert!(errs.contains(&"Expected string or number on right hand side of operation, got null"));
    assert!(errors(&run("true === 1;", Chapter::Three)).is_empty());
}

#[test]
fn test_undeclared_name() {
    let analysis = run("foo;", Chapter::One);
    let d = find(&analysis, "Name 'foo' not declared");
    assert_eq!(d.span, span(1, 0, 1, 3));
}

#[test]
fn test_use_before_declaration_resolves() {
    let analysis = run("f();\nfunction f() {\n  return 1;\n}", Chapter::One);
    assert!(analysis.diagnostics.is_empty(), "{:#?}", analysis.diagnostics);
}

#[test]
fn test_assignment_to_constant() {
    let analysis = run("const x = 1;\nx = 2;\nlet y = 1;\ny = 2;", Chapter::Three);
    assert_eq!(errors(&analysis), vec!["Cannot assign new value to constant x"]);
    assert_eq!(find(&analysis, "Cannot assign new value to constant x").span, span(2, 0, 2, 1));
}

#[test]
fn test_parameters_reassignable_from_chapter_three() {
    let src = "function f(a) {\n  a = 1;\n  return a;\n}\nf(0);";
    assert!(errors(&run(src, Chapter::One)).contains(&"Cannot assign new value to constant a"));
    assert!(errors(&run(src, Chapter::Three)).is_empty());
}

#[test]
fn test_named_imports() {
    let analysis = run("import { heart, show as s } from \"rune\";\ns(heart);", Chapter::One);
    assert!(analysis.diagnostics.is_empty(), "{:#?}", analysis.diagnostics);
    let rune = &analysis.imports["rune"];
    assert_eq!(rune["show"].local, "s");
    assert_eq!(rune["show"].span, span(1, 16, 1, 25));
    let id = analysis.declarations.named("s")[0];
    let decl = analysis.declarations.get(id);
    assert_eq!(decl.kind, DeclarationKind::Import);
    assert_eq!(
        decl.import,
        Some(ImportSource {
            module: "rune".to_string(),
            name: "show".to_string()
        })
    );
}

#[test]
fn test_default_and_unknown_imports() {
    let analysis = run("import h from \"rune\";\nimport { nope } from \"rune\";\nnope;", Chapter::One);
    let errs = errors(&analysis);
    assert_eq!(errs, vec!["Only normal imports are allowed", "Name 'nope' not declared"]);
    assert_eq!(find(&analysis, "Only normal imports are allowed").span, span(1, 7, 1, 8));
}

#[test]
fn test_imported_function_arity() {
    let analysis = run("import { beside } from \"rune\";\nbeside(1);", Chapter::One);
    assert_eq!(errors(&analysis), vec!["Expected 2 arguments, but got 1"]);
}

#[test]
fn test_unused_declarations() {
    let analysis = run("const unused = 1;\nfunction f(a) {\n  return 1;\n}\nf(2);", Chapter::One);
    let warnings: Vec<Span> = analysis
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .map(|d| d.span)
        .collect();
    assert_eq!(warnings, vec![span(1, 6, 1, 12), span(2, 11, 2, 12)]);
}

#[test]
fn test_if_without_else() {
    let analysis = run("if (true) { 1; }", Chapter::One);
    let d = find(&analysis, "Missing \"else\" in \"if-else\" statement");
    assert_eq!(d.span, span(1, 0, 1, 10));
    assert!(errors(&run("if (true) { 1; }", Chapter::Three)).is_empty());
}

#[test]
fn test_missing_braces() {
    let analysis = run("if (true) 1; else 2;\nwhile (false) 1;", Chapter::Three);
    let errs = errors(&analysis);
    assert!(errs.contains(&"Missing curly braces around if"));
    assert!(errs.contains(&"Missing curly braces around else"));
    assert!(errs.contains(&"Missing curly braces around while"));
    assert!(errors(&run("if (true) { 1; } else if (false) { 2; } else { 3; }", Chapter::Three)).is_empty());
}

#[test]
fn test_loops_gated_by_chapter() {
    let analysis = run("while (true) { break; }", Chapter::One);
    assert_eq!(
        find(&analysis, "While statements are not allowed").span,
        span(1, 0, 1, 13)
    );
    assert!(errors(&analysis).contains(&"Break statements are not allowed"));

    let analysis = run("for (let i = 0; i < 3; ) { continue; }", Chapter::Three);
    assert_eq!(errors(&analysis), vec!["Incomplete for loop"]);
}

#[test]
fn test_let_before_chapter_three() {
    let analysis = run("let x = 1;\nx;", Chapter::One);
    let d = find(&analysis, "Use keyword \"const\" instead to declare a constant");
    assert_eq!(d.span, span(1, 0, 1, 10));
}

#[test]
fn test_member_access_rules() {
    let analysis = run(
        "const a = [1];\nconst i = 0;\na[i];\na[1.5];\na[-1];\na[\"x\"];\na.length;",
        Chapter::Three,
    );
    assert_eq!(
        errors(&analysis),
        vec![
            "No dot abbreviations",
            "Expected non negative integer as array index, got float.",
            "Expected non negative integer as array index, got negative number.",
            "Expected non negative integer as array index, got string.",
        ]
    );
    assert!(errors(&run("const a = 1;\na[0];", Chapter::One)).contains(&"Member access expressions are not allowed"));
}

#[test]
fn test_literal_rules() {
    assert_eq!(errors(&run("null;", Chapter::One)), vec!["Null literals not allowed"]);
    assert!(errors(&run("null;", Chapter::Two)).is_empty());
    let analysis = run("const s = \"abc;\ndisplay(s);", Chapter::One);
    assert!(errors(&analysis).contains(&"Incomplete string expression"));
}

#[test]
fn test_template_interpolation() {
    let analysis = run("`a${b}c`;", Chapter::One);
    assert_eq!(errors(&analysis), vec!["Expressions not allowed in template literal"]);
    assert_eq!(analysis.diagnostics[0].span, span(1, 4, 1, 5));
}

#[test]
fn test_spread_outside_call() {
    let analysis = run("const xs = list(1);\n[...xs];", Chapter::Three);
    assert_eq!(
        errors(&analysis),
        vec!["Spread syntax is only allowed when supplying arguments to a function"]
    );
}

#[test]
fn test_rest_parameter_position() {
    let analysis = run("const f = (a, ...b, c) => a;\nf(1);", Chapter::Three);
    assert!(analysis.recovered);
    let d = find(&analysis, "No params allowed after rest element");
    assert_eq!(d.span, span(1, 20, 1, 21));
}

#[test]
fn test_multiple_and_destructuring_declarations() {
    let analysis = run("let a = 1, b = 2;\nconst [c] = list(1);\na; b; c;", Chapter::Three);
    let errs = errors(&analysis);
    assert!(errs.contains(&"Multiple declarations not allowed"));
    assert!(errs.contains(&"Destructuring declarations are not allowed"));
}

#[test]
fn test_eval_is_rejected() {
    assert!(errors(&run("eval(\"1\");", Chapter::Four)).contains(&"eval is not allowed"));
}

#[test]
fn test_missing_semicolon_diagnostic() {
    let analysis = run("const x = 1\ndisplay(x);", Chapter::One);
    assert_eq!(errors(&analysis), vec!["Missing semicolon"]);
    assert_eq!(analysis.diagnostics[0].span, span(1, 11, 1, 12));
}

#[test]
fn test_recovered_member_access() {
    let analysis = run("display(\"hello world\".);", Chapter::One);
    assert!(analysis.recovered);
    assert_eq!(
        errors(&analysis),
        vec!["Member access expressions are not allowed", "No dot abbreviations"]
    );
}

#[test]
fn test_recovered_binary_operand() {
    let analysis = run("10 + (5 / );", Chapter::One);
    assert_eq!(errors(&analysis), vec!["Incomplete binary expression"]);
    assert_eq!(analysis.diagnostics[0].span, span(1, 6, 1, 10));
}

#[test]
fn test_missing_function_name() {
    let analysis = run("function (x) {\n  return x;\n}", Chapter::One);
    assert!(errors(&analysis).contains(&"Missing function name"));
    assert!(!errors(&analysis).iter().any(|m| m.contains("not declared")));
}

#[test]
fn test_first_line_offset() {
    let analysis = analyze("foo;", Chapter::One, 3, &TestCatalogue);
    assert_eq!(analysis.diagnostics[0].span, span(3, 0, 3, 3));
}

#[test]
fn test_empty_catalogue_reports_builtins() {
    let analysis = analyze("display(1);", Chapter::One, 1, &EmptyCatalogue);
    assert_eq!(errors(&analysis), vec!["Name 'display' not declared"]);
}

use super::*;
use tower_lsp::lsp_types::{
    CompletionItem, DiagnosticSeverity, DiagnosticTag, HoverContents, InsertTextFormat, Position, Range, SymbolKind,
};

fn analyze_at(content: &str, chapter: Chapter) -> AnalysisResult {
    SourceAnalyzer::new().analyze(content, DocumentContext::new(chapter, 0))
}

fn range(l1: u32, c1: u32, l2: u32, c2: u32) -> Range {
    Range::new(Position::new(l1, c1), Position::new(l2, c2))
}

fn find<'a>(items: &'a [CompletionItem], label: &str) -> &'a CompletionItem {
    items
        .iter()
        .find(|item| item.label == label)
        .unwrap_or_else(|| panic!("no completion labelled {label}"))
}

fn hover_text(result: &AnalysisResult, position: Position) -> Option<String> {
    match result.hover(position)?.contents {
        HoverContents::Markup(markup) => Some(markup.value),
        _ => None,
    }
}

#[test]
fn test_positions_round_trip() {
    for prepend in [0, 3] {
        for (line, character) in [(0, 0), (0, 7), (4, 12)] {
            let pos = Position::new(line, character);
            assert_eq!(to_lsp_position(to_core_position(pos, prepend), prepend), pos);
        }
    }
}

#[test]
fn test_diagnostics_carry_chapter_and_tags() {
    let result = analyze_at("const x = 1;", Chapter::Two);
    assert_eq!(result.diagnostics.len(), 1);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.message, "Unused name");
    assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::WARNING));
    assert_eq!(diagnostic.source.as_deref(), Some("Source 2"));
    assert_eq!(diagnostic.tags, Some(vec![DiagnosticTag::UNNECESSARY]));
    assert_eq!(diagnostic.range, range(0, 6, 0, 7));
}

#[test]
fn test_prepend_is_invisible_to_the_editor() {
    let content = "const x = 1;\ndisplay(x, y);";
    let plain = analyze_at(content, Chapter::One);
    let shifted = SourceAnalyzer::new().analyze(content, DocumentContext::new(Chapter::One, 2));
    assert_eq!(shifted.analysis.first_line, 3);
    assert_eq!(plain.diagnostics, shifted.diagnostics);
    assert_eq!(shifted.diagnostics[0].range, range(1, 11, 1, 12));
    assert_eq!(shifted.declaration(Position::new(1, 8)), Some(range(0, 6, 0, 7)));
}

#[test]
fn test_completion_sections_in_order() {
    let result = analyze_at("const x = 1;\n", Chapter::One);
    let items = result.completions(Position::new(1, 0));

    let display = find(&items, "display");
    assert_eq!(display.sort_text.as_deref(), Some("0"));
    assert_eq!(display.label_details.as_ref().and_then(|d| d.detail.as_deref()), Some(" (func)"));

    let keyword = find(&items, "function");
    assert_eq!(keyword.sort_text.as_deref(), Some("1"));
    assert_eq!(keyword.insert_text_format, Some(InsertTextFormat::SNIPPET));

    let local = find(&items, "x");
    assert_eq!(local.sort_text.as_deref(), Some("2"));
    assert_eq!(local.label_details.as_ref().and_then(|d| d.detail.as_deref()), Some(" (const)"));

    let heart = find(&items, "heart");
    assert_eq!(heart.sort_text.as_deref(), Some("3"));
    let edits = heart.additional_text_edits.clone().unwrap_or_default();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].range, range(0, 0, 0, 0));
    assert_eq!(edits[0].new_text, "import { heart } from \"rune\";\n");

    let sections: Vec<&str> = items.iter().filter_map(|i| i.sort_text.as_deref()).collect();
    let mut sorted = sections.clone();
    sorted.sort();
    assert_eq!(sections, sorted);
}

#[test]
fn test_completion_respects_chapter() {
    let one = analyze_at("", Chapter::One).completions(Position::new(0, 0));
    assert!(!one.iter().any(|i| i.label == "pair" || i.label == "let"));
    let three = analyze_at("", Chapter::Three).completions(Position::new(0, 0));
    assert!(three.iter().any(|i| i.label == "pair"));
    assert!(three.iter().any(|i| i.label == "let"));
}

#[test]
fn test_completion_only_offers_names_in_scope() {
    let content = "function f(a) {\n  return a;\n}\n";
    let result = analyze_at(content, Chapter::One);
    let inside = result.completions(Position::new(1, 2));
    assert!(inside.iter().any(|i| i.label == "a"));
    let outside = result.completions(Position::new(3, 0));
    assert!(!outside.iter().any(|i| i.label == "a"));
    assert!(outside.iter().any(|i| i.label == "f"));
}

#[test]
fn test_completion_of_already_imported_name() {
    let result = analyze_at("import { heart as h } from \"rune\";\nh;", Chapter::One);
    let items = result.completions(Position::new(1, 0));
    let aliased = items
        .iter()
        .find(|i| i.detail.as_deref() == Some("Imported from rune"))
        .expect("imported item");
    assert_eq!(aliased.label, "h");
    assert!(aliased.additional_text_edits.is_none());
    // imports are offered through their module, not as local symbols
    assert_eq!(items.iter().filter(|i| i.label == "h").count(), 1);
}

#[test]
fn test_completion_extends_existing_import() {
    let result = analyze_at("import { heart, show } from \"rune\";\nshow(heart);", Chapter::One);
    let items = result.completions(Position::new(1, 0));
    let beside = find(&items, "beside");
    let edits = beside.additional_text_edits.clone().unwrap_or_default();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].range, range(0, 20, 0, 20));
    assert_eq!(edits[0].new_text, ", beside");

    let play = find(&items, "play");
    let edits = play.additional_text_edits.clone().unwrap_or_default();
    assert_eq!(edits[0].new_text, "import { play } from \"sound\";\n");
}

#[test]
fn test_resolve_builds_call_snippets() {
    let docs = SourceAnalyzer::new().documentation();
    let result = analyze_at("function add(a, b) { return a + b; }\n", Chapter::One);
    let items = result.completions(Position::new(1, 0));

    let display = resolve_completion(find(&items, "display").clone(), docs);
    assert_eq!(display.insert_text.as_deref(), Some("display(${1:value})"));
    assert_eq!(display.insert_text_format, Some(InsertTextFormat::SNIPPET));
    assert_eq!(display.detail.as_deref(), Some("display(value, prepend)"));

    let math_max = resolve_completion(find(&items, "math_max").clone(), docs);
    assert_eq!(math_max.insert_text.as_deref(), Some("math_max()"));

    let add = resolve_completion(find(&items, "add").clone(), docs);
    assert_eq!(add.insert_text.as_deref(), Some("add(${1:a}, ${2:b})"));

    let pi = resolve_completion(find(&items, "math_PI").clone(), docs);
    assert!(pi.insert_text.is_none());
    assert!(pi.detail.is_some());

    let beside = resolve_completion(find(&items, "beside").clone(), docs);
    assert_eq!(beside.insert_text.as_deref(), Some("beside(${1:left}, ${2:right})"));
}

#[test]
fn test_hover_texts() {
    let content = "import { heart } from \"rune\";\nconst x = 1;\nlet y = 2;\nfunction f() { return heart; }\ndisplay(x + y, f);";
    let result = analyze_at(content, Chapter::Three);
    assert_eq!(hover_text(&result, Position::new(1, 6)).as_deref(), Some("Constant"));
    assert_eq!(hover_text(&result, Position::new(2, 4)).as_deref(), Some("Variable"));
    assert_eq!(hover_text(&result, Position::new(3, 9)).as_deref(), Some("Function"));
    assert_eq!(
        hover_text(&result, Position::new(3, 24)).as_deref(),
        Some("Rune in the shape of a heart.")
    );
    let display = hover_text(&result, Position::new(4, 2)).unwrap_or_default();
    assert!(display.starts_with("Optional second argument."));
    assert!(result.hover(Position::new(3, 13)).is_none());
}

#[test]
fn test_declaration_and_highlights() {
    let result = analyze_at("const x = 1;\ndisplay(x);\ndisplay(x);", Chapter::One);
    assert_eq!(result.declaration(Position::new(2, 8)), Some(range(0, 6, 0, 7)));
    let highlights: Vec<Range> = result.highlights(Position::new(0, 6)).into_iter().map(|h| h.range).collect();
    assert_eq!(highlights, vec![range(0, 6, 0, 7), range(1, 8, 1, 9), range(2, 8, 2, 9)]);
    assert!(result.declaration(Position::new(1, 3)).is_none());
}

#[test]
fn test_references_with_and_without_declaration() {
    let result = analyze_at("const x = 1;\ndisplay(x);", Chapter::One);
    assert_eq!(result.references(Position::new(1, 8), true).len(), 2);
    assert_eq!(result.references(Position::new(1, 8), false), vec![range(1, 8, 1, 9)]);
}

#[test]
fn test_rename_stays_out_of_shadowing_scope() {
    let result = analyze_at("let x = 1; { let x = 2; x = 3; } x;", Chapter::Three);
    let edits = result.rename(Position::new(0, 4), "y").expect("edits");
    let ranges: Vec<Range> = edits.iter().map(|e| e.range).collect();
    assert_eq!(ranges, vec![range(0, 4, 0, 5), range(0, 33, 0, 34)]);
    assert!(edits.iter().all(|e| e.new_text == "y"));
}

#[test]
fn test_rename_of_builtin_is_none() {
    let result = analyze_at("display(1);", Chapter::One);
    assert!(result.rename(Position::new(0, 2), "show").is_none());
}

#[test]
fn test_outline_nests_parameters() {
    let content = "import { heart } from \"rune\";\nfunction f(a, b) {\n  return a;\n}\nconst c = 1;\nlet v = 2;";
    let result = analyze_at(content, Chapter::Three);
    let names: Vec<&str> = result.symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["heart", "f", "c", "v"]);

    let kinds: Vec<SymbolKind> = result.symbols.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![SymbolKind::NAMESPACE, SymbolKind::FUNCTION, SymbolKind::CONSTANT, SymbolKind::VARIABLE]
    );

    let params = result.symbols[1].children.clone().unwrap_or_default();
    let param_names: Vec<&str> = params.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(param_names, vec!["a", "b"]);
    assert!(params.iter().all(|p| p.kind == SymbolKind::VARIABLE));
    assert_eq!(params[0].selection_range, range(1, 11, 1, 12));

    let early = analyze_at("function f(a) { return a; }", Chapter::One);
    let params = early.symbols[0].children.clone().unwrap_or_default();
    assert_eq!(params[0].kind, SymbolKind::CONSTANT);
}

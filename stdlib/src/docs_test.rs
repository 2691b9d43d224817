#[cfg(test)]
mod tests {
    use crate::{DocEntry, Documentation, EntryKind, documentation};
    use anyhow::Result;
    use source_core::analysis::{Arity, Catalogue, Chapter, Meta, analyze};

    fn func(label: &str, parameters: &[&str], optional: &[&str], rest: bool) -> DocEntry {
        DocEntry {
            label: label.to_string(),
            title: label.to_string(),
            description: String::new(),
            meta: EntryKind::Func,
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            optional_params: optional.iter().map(|p| p.to_string()).collect(),
            rest,
        }
    }

    #[test]
    fn test_embedded_tables_load() -> Result<()> {
        let docs = Documentation::load()?;
        assert!(docs.builtin_doc(Chapter::One, "display").is_some());
        assert!(docs.builtin_doc(Chapter::One, "math_PI").is_some());
        assert!(docs.modules().any(|(name, _)| name == "rune"));
        assert!(!docs.keywords(Chapter::One).is_empty());
        Ok(())
    }

    #[test]
    fn test_builtins_accumulate_across_chapters() {
        let docs = documentation();
        assert!(docs.builtin_doc(Chapter::One, "pair").is_none());
        assert!(docs.builtin_doc(Chapter::Two, "pair").is_some());
        assert!(docs.builtin_doc(Chapter::Four, "pair").is_some());
        assert!(docs.builtin_doc(Chapter::Four, "display").is_some());
        assert!(docs.builtin_doc(Chapter::Two, "set_head").is_none());
        assert!(docs.builtin_doc(Chapter::Three, "set_head").is_some());

        let one = docs.builtins(Chapter::One).len();
        let four = docs.builtins(Chapter::Four).len();
        assert!(four > one);
        assert_eq!(docs.builtins(Chapter::Four)[0].label, "display");
    }

    #[test]
    fn test_standard_tables_are_complete() {
        let docs = documentation();
        for name in ["math_atan2", "math_hypot", "math_log10", "math_SQRT2", "stringify"] {
            assert!(docs.builtin_doc(Chapter::One, name).is_some(), "{name} missing from chapter 1");
        }
        assert!(docs.builtin_doc(Chapter::One, "display_list").is_none());
        assert!(docs.builtin_doc(Chapter::Two, "display_list").is_some());
        assert!(docs.builtin_doc(Chapter::Three, "stream_for_each").is_some());

        let src = "display_list(list(math_hypot(3, 4), math_atan2(1, 1)));\nstream_for_each(display, stream(1, 2));";
        let analysis = analyze(src, Chapter::Three, 1, docs);
        assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
    }

    #[test]
    fn test_keywords_per_chapter() {
        let docs = documentation();
        let labels = |chapter| -> Vec<String> { docs.keywords(chapter).iter().map(|k| k.label.clone()).collect() };
        assert!(!labels(Chapter::One).contains(&"let".to_string()));
        assert!(!labels(Chapter::Two).contains(&"while".to_string()));
        assert!(labels(Chapter::Three).contains(&"let".to_string()));
        assert!(labels(Chapter::Three).contains(&"while".to_string()));
        let function = docs
            .keywords(Chapter::One)
            .iter()
            .find(|k| k.label == "function")
            .and_then(|k| k.insert_text.clone());
        assert!(function.is_some_and(|t| t.starts_with("function ${1:name}")));
    }

    #[test]
    fn test_arity_from_parameters() {
        assert_eq!(func("f", &["a", "b"], &[], false).arity(), Some(Arity::exact(2)));
        assert_eq!(
            func("display", &["value", "prepend"], &["prepend"], false).arity(),
            Some(Arity {
                required: 1,
                optional: 1,
                rest: false
            })
        );
        assert_eq!(
            func("list", &["xs"], &[], true).arity(),
            Some(Arity {
                required: 0,
                optional: 0,
                rest: true
            })
        );
        let docs = documentation();
        let math_pi = docs.builtin_doc(Chapter::One, "math_PI");
        assert!(math_pi.is_some_and(|e| e.arity().is_none() && e.meta() == Meta::Const));
    }

    #[test]
    fn test_required_parameters_skip_optional_and_rest() {
        let display = func("display", &["value", "prepend"], &["prepend"], false);
        assert_eq!(display.required_parameters().collect::<Vec<_>>(), vec!["value"]);
        let stream = func("f", &["x", "rest"], &[], true);
        assert_eq!(stream.required_parameters().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_rest_parameter_listed_as_optional() {
        let entry = func("math_max", &["xs"], &["xs"], true);
        assert_eq!(
            entry.arity(),
            Some(Arity {
                required: 0,
                optional: 0,
                rest: true
            })
        );
        let entry = func("g", &["a", "b", "more"], &["b", "more"], true);
        assert_eq!(
            entry.arity(),
            Some(Arity {
                required: 1,
                optional: 1,
                rest: true
            })
        );
        assert_eq!(entry.required_parameters().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_catalogue_lookups() {
        let docs = documentation();
        assert!(docs.has_module("rune"));
        assert!(!docs.has_module("runes"));
        let beside = docs.module_entry("rune", "beside");
        assert_eq!(beside.and_then(|e| e.arity), Some(Arity::exact(2)));
        assert!(docs.module_entry("rune", "nothing").is_none());
        assert!(docs.builtin(Chapter::One, "list").is_none());
        assert_eq!(docs.builtin(Chapter::Two, "list").map(|e| e.meta), Some(Meta::Func));
    }

    #[test]
    fn test_malformed_tables_are_errors() {
        assert!(Documentation::from_json("{}", "{}", r#"{"keywords":{},"source":[[],[],[],[]]}"#).is_err());
        assert!(Documentation::from_json("[[],[],[],[]]", "{}", r#"{"keywords":{},"source":[["let"],[],[],[]]}"#).is_err());
        let empty = Documentation::from_json("[[],[],[],[]]", "{}", r#"{"keywords":{},"source":[[],[],[],[]]}"#);
        assert!(empty.is_ok_and(|d| d.builtins(Chapter::Four).is_empty()));
    }

    #[test]
    fn test_analysis_against_documentation() {
        let docs = documentation();
        let analysis = analyze("display();\nmath_max();\nconst x = math_PI;\nx;", Chapter::One, 1, docs);
        let messages: Vec<&str> = analysis.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["Expected between 1 and 2 arguments, but got 0"]);

        let imported = analyze("import { heart, show } from \"rune\";\nshow(heart);", Chapter::One, 1, docs);
        assert!(imported.diagnostics.is_empty(), "{:?}", imported.diagnostics);
    }
}

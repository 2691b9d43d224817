use serde::{Deserialize, Serialize};
use source_core::analysis::{Chapter, Meta};
use source_core::token::Span;
use source_stdlib::{DocEntry, Documentation};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionItemLabelDetails, Documentation as ItemDocumentation,
    InsertTextFormat, MarkupContent, MarkupKind, Position, Range, TextEdit,
};

use super::position::{to_core_position, to_lsp_position};
use super::AnalysisResult;

/// Where a completion item came from. The order is the order items are
/// listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionSource {
    Builtin,
    Keyword,
    Symbol,
    Module,
}

impl CompletionSource {
    fn sort_text(self) -> String {
        (self as u8).to_string()
    }
}

/// Payload carried from `completion` to `completionItem/resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionData {
    pub source: CompletionSource,
    pub chapter: u8,
    /// Catalogue name, which an import alias may hide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Parameters of a local function the call snippet should fill in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
}

impl CompletionData {
    fn new(source: CompletionSource, chapter: Chapter) -> Self {
        Self {
            source,
            chapter: chapter.number(),
            name: None,
            module: None,
            parameters: None,
        }
    }
}

fn markdown(value: &str) -> ItemDocumentation {
    ItemDocumentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value: value.to_string(),
    })
}

fn label_details(meta: &str) -> Option<CompletionItemLabelDetails> {
    Some(CompletionItemLabelDetails {
        detail: Some(format!(" ({meta})")),
        description: None,
    })
}

fn meta_kind(meta: Meta) -> CompletionItemKind {
    match meta {
        Meta::Const => CompletionItemKind::CONSTANT,
        Meta::Let => CompletionItemKind::VARIABLE,
        Meta::Func => CompletionItemKind::FUNCTION,
    }
}

fn entry_item(entry: &DocEntry, data: CompletionData) -> CompletionItem {
    CompletionItem {
        label: entry.label.clone(),
        label_details: label_details(entry.meta().as_str()),
        kind: Some(meta_kind(entry.meta())),
        documentation: Some(markdown(&entry.description)),
        sort_text: Some(data.source.sort_text()),
        data: serde_json::to_value(&data).ok(),
        ..Default::default()
    }
}

/// `name(${1:a}, ${2:b})`
fn call_snippet<'p>(name: &str, parameters: impl Iterator<Item = &'p str>) -> String {
    let placeholders: Vec<String> = parameters
        .enumerate()
        .map(|(i, p)| format!("${{{}:{}}}", i + 1, p))
        .collect();
    format!("{}({})", name, placeholders.join(", "))
}

impl AnalysisResult {
    /// Everything that may be typed at `position`: builtins, then keywords,
    /// then names declared in scope, then exports of importable modules.
    pub fn completions(&self, position: Position) -> Vec<CompletionItem> {
        let chapter = self.context.chapter;
        let mut items: Vec<CompletionItem> = self
            .docs
            .builtins(chapter)
            .iter()
            .map(|entry| entry_item(entry, CompletionData::new(CompletionSource::Builtin, chapter)))
            .collect();

        items.extend(self.docs.keywords(chapter).iter().map(|keyword| CompletionItem {
            label: keyword.label.clone(),
            label_details: label_details("keyword"),
            kind: Some(CompletionItemKind::KEYWORD),
            documentation: Some(markdown(&keyword.documentation)),
            insert_text: keyword.insert_text.clone(),
            insert_text_format: keyword.insert_text.as_ref().map(|_| InsertTextFormat::SNIPPET),
            sort_text: Some(CompletionSource::Keyword.sort_text()),
            ..Default::default()
        }));

        items.extend(self.symbol_completions(position));
        items.extend(self.module_completions());
        items
    }

    fn symbol_completions(&self, position: Position) -> Vec<CompletionItem> {
        let at = to_core_position(position, self.context.prepend);
        let index = &self.analysis.declarations;
        index
            .visible_at(at)
            .into_iter()
            .map(|id| {
                let decl = index.get(id);
                let mut data = CompletionData::new(CompletionSource::Symbol, self.context.chapter);
                data.parameters = decl.parameters.as_ref().map(|params| {
                    params
                        .iter()
                        .map(|p| index.get(*p))
                        .filter(|p| !p.is_rest)
                        .map(|p| p.name.clone())
                        .collect()
                });
                CompletionItem {
                    label: decl.name.clone(),
                    label_details: label_details(decl.meta.as_str()),
                    kind: Some(meta_kind(decl.meta)),
                    sort_text: Some(CompletionSource::Symbol.sort_text()),
                    data: serde_json::to_value(&data).ok(),
                    ..Default::default()
                }
            })
            .collect()
    }

    fn module_completions(&self) -> Vec<CompletionItem> {
        let chapter = self.context.chapter;
        let mut items = Vec::new();
        for (module, exports) in self.docs.modules() {
            let imported = self.analysis.imports.get(module);
            for entry in exports.values() {
                let mut data = CompletionData::new(CompletionSource::Module, chapter);
                data.name = Some(entry.label.clone());
                data.module = Some(module.to_string());
                let mut item = entry_item(entry, data);
                item.detail = Some(entry.title.clone());

                match imported {
                    Some(names) => match names.get(&entry.label) {
                        Some(name) => {
                            item.label = name.local.clone();
                            item.detail = Some(format!("Imported from {module}"));
                        }
                        None => {
                            let last = names.values().map(|n| n.span).max_by_key(|s: &Span| s.end);
                            if let Some(span) = last {
                                let end = to_lsp_position(span.end, self.context.prepend);
                                item.additional_text_edits =
                                    Some(vec![TextEdit::new(Range::new(end, end), format!(", {}", entry.label))]);
                            }
                        }
                    },
                    None => {
                        let start = Position::new(0, 0);
                        item.additional_text_edits = Some(vec![TextEdit::new(
                            Range::new(start, start),
                            format!("import {{ {} }} from \"{}\";\n", entry.label, module),
                        )]);
                    }
                }
                items.push(item);
            }
        }
        items
    }
}

/// Fill in the signature and, for functions, a call snippet naming the
/// parameters a call has to supply.
pub fn resolve_completion(mut item: CompletionItem, docs: &Documentation) -> CompletionItem {
    let Some(data) = item
        .data
        .clone()
        .and_then(|value| serde_json::from_value::<CompletionData>(value).ok())
    else {
        return item;
    };
    let chapter = Chapter::from_number(u64::from(data.chapter)).unwrap_or_default();

    let entry = match data.source {
        CompletionSource::Builtin => docs.builtin_doc(chapter, &item.label),
        CompletionSource::Module => match (&data.module, &data.name) {
            (Some(module), Some(name)) => docs.module_doc(module, name),
            _ => None,
        },
        CompletionSource::Symbol => {
            if let Some(parameters) = &data.parameters {
                item.insert_text = Some(call_snippet(&item.label, parameters.iter().map(String::as_str)));
                item.insert_text_format = Some(InsertTextFormat::SNIPPET);
            }
            return item;
        }
        CompletionSource::Keyword => return item,
    };

    if let Some(entry) = entry {
        if item.detail.is_none() {
            item.detail = Some(entry.title.clone());
        }
        item.documentation = Some(markdown(&entry.description));
        if entry.is_function() {
            item.insert_text = Some(call_snippet(&item.label, entry.required_parameters()));
            item.insert_text_format = Some(InsertTextFormat::SNIPPET);
        }
    }
    item
}

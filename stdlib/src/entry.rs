use serde::Deserialize;
use source_core::analysis::{Arity, EntryInfo, Meta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Const,
    Func,
}

/// Documentation for one builtin or module export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocEntry {
    pub label: String,
    /// Signature line, e.g. `display(value, prepend)`.
    pub title: String,
    /// Markdown.
    pub description: String,
    pub meta: EntryKind,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub optional_params: Vec<String>,
    /// The last parameter collects any remaining arguments.
    #[serde(default)]
    pub rest: bool,
}

impl DocEntry {
    pub fn is_function(&self) -> bool {
        self.meta == EntryKind::Func
    }

    pub fn meta(&self) -> Meta {
        match self.meta {
            EntryKind::Const => Meta::Const,
            EntryKind::Func => Meta::Func,
        }
    }

    pub fn arity(&self) -> Option<Arity> {
        if !self.is_function() {
            return None;
        }
        let rest = self.rest && !self.parameters.is_empty();
        // the rest parameter counts as rest even if also listed as optional
        let fixed = &self.parameters[..self.parameters.len() - usize::from(rest)];
        let optional = fixed.iter().filter(|p| self.optional_params.contains(*p)).count();
        Some(Arity {
            required: fixed.len() - optional,
            optional,
            rest,
        })
    }

    pub fn info(&self) -> EntryInfo {
        EntryInfo {
            meta: self.meta(),
            arity: self.arity(),
        }
    }

    /// Parameters a call has to supply: optional and rest ones left out.
    pub fn required_parameters(&self) -> impl Iterator<Item = &str> {
        let rest_at = if self.rest { self.parameters.len().checked_sub(1) } else { None };
        self.parameters
            .iter()
            .enumerate()
            .filter(move |(i, p)| Some(*i) != rest_at && !self.optional_params.contains(*p))
            .map(|(_, p)| p.as_str())
    }
}

/// A language keyword offered by completion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub label: String,
    /// Markdown.
    pub documentation: String,
    /// Snippet text; plain keywords insert their label.
    #[serde(default)]
    pub insert_text: Option<String>,
}

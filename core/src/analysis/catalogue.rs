//! Lookup interface onto the builtin and module documentation.
//!
//! The analysis only needs to know whether a name exists and how it may be
//! called; descriptions live with the implementor.

use super::chapter::Chapter;
use super::declarations::Meta;

/// How many arguments a callable accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Arity {
    /// Leading parameters that must be supplied.
    pub required: usize,
    /// Parameters after the required ones that may be left out.
    pub optional: usize,
    /// Whether a trailing rest parameter absorbs any further arguments.
    pub rest: bool,
}

impl Arity {
    pub fn exact(required: usize) -> Self {
        Self {
            required,
            optional: 0,
            rest: false,
        }
    }

    /// The complaint for a call with `argc` arguments, if any.
    pub fn mismatch(&self, argc: usize) -> Option<String> {
        if self.rest {
            return (argc < self.required)
                .then(|| format!("Expected {} or more arguments, but got {}", self.required, argc));
        }
        if self.optional > 0 {
            let max = self.required + self.optional;
            return (argc < self.required || argc > max).then(|| {
                format!(
                    "Expected between {} and {} arguments, but got {}",
                    self.required, max, argc
                )
            });
        }
        (argc != self.required).then(|| format!("Expected {} arguments, but got {}", self.required, argc))
    }
}

/// What the analysis knows about a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryInfo {
    pub meta: Meta,
    /// Present for functions.
    pub arity: Option<Arity>,
}

pub trait Catalogue: Send + Sync {
    /// Builtin constant or function available in `chapter`.
    fn builtin(&self, chapter: Chapter, name: &str) -> Option<EntryInfo>;

    fn has_module(&self, module: &str) -> bool;

    /// Name exported by an importable module.
    fn module_entry(&self, module: &str, name: &str) -> Option<EntryInfo>;
}

/// A catalogue with no entries at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyCatalogue;

impl Catalogue for EmptyCatalogue {
    fn builtin(&self, _chapter: Chapter, _name: &str) -> Option<EntryInfo> {
        None
    }

    fn has_module(&self, _module: &str) -> bool {
        false
    }

    fn module_entry(&self, _module: &str, _name: &str) -> Option<EntryInfo> {
        None
    }
}

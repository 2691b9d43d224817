//! Documentation for everything a Source program can use without declaring
//! it: builtins per chapter, importable modules, and keywords.

pub mod docs;
pub mod entry;

#[cfg(test)]
mod docs_test;

pub use docs::{Documentation, ModuleExports, documentation};
pub use entry::{DocEntry, EntryKind, Keyword};

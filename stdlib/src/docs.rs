//! The documentation tables, loaded once from the JSON embedded at build
//! time.
//!
//! `builtins.json` lists, per chapter, the entries that chapter adds; each
//! chapter sees its own entries and those of every earlier chapter.
//! `modules.json` maps module names to their exports. `keywords.json` holds
//! keyword descriptions and, per chapter, which of them are available.

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow, bail};
use once_cell::sync::Lazy;
use serde::Deserialize;
use source_core::analysis::{Catalogue, Chapter, EntryInfo};
use source_core::util::fast_map::{FastHashMap, fast_hash_map_new};

use crate::entry::{DocEntry, Keyword};

const BUILTINS_JSON: &str = include_str!("../data/builtins.json");
const MODULES_JSON: &str = include_str!("../data/modules.json");
const KEYWORDS_JSON: &str = include_str!("../data/keywords.json");

static DOCUMENTATION: Lazy<Documentation> = Lazy::new(|| match Documentation::load() {
    Ok(docs) => {
        tracing::debug!(
            "loaded documentation: {} builtins, {} modules",
            docs.builtins(Chapter::Four).len(),
            docs.modules.len()
        );
        docs
    }
    Err(e) => {
        tracing::error!("failed to load builtin documentation: {e:#}");
        Documentation::empty()
    }
});

/// The process-wide documentation tables.
pub fn documentation() -> &'static Documentation {
    &DOCUMENTATION
}

pub type ModuleExports = BTreeMap<String, DocEntry>;

#[derive(Debug, Clone, Default)]
struct ChapterDocs {
    entries: Vec<DocEntry>,
    by_label: FastHashMap<String, usize>,
}

impl ChapterDocs {
    fn push(&mut self, entry: DocEntry) {
        match self.by_label.get(&entry.label) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.by_label.insert(entry.label.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    fn get(&self, label: &str) -> Option<&DocEntry> {
        self.by_label.get(label).map(|&i| &self.entries[i])
    }
}

#[derive(Debug, Deserialize)]
struct KeywordFile {
    keywords: BTreeMap<String, Keyword>,
    source: Vec<Vec<String>>,
}

#[derive(Debug)]
pub struct Documentation {
    chapters: Vec<ChapterDocs>,
    modules: BTreeMap<String, ModuleExports>,
    keywords: Vec<Vec<Keyword>>,
}

impl Documentation {
    /// Parse the embedded tables.
    pub fn load() -> Result<Self> {
        Self::from_json(BUILTINS_JSON, MODULES_JSON, KEYWORDS_JSON)
    }

    pub fn from_json(builtins: &str, modules: &str, keywords: &str) -> Result<Self> {
        let additions: Vec<Vec<DocEntry>> = serde_json::from_str(builtins).context("parsing builtins.json")?;
        if additions.len() != Chapter::ALL.len() {
            bail!("builtins.json lists {} chapters, expected {}", additions.len(), Chapter::ALL.len());
        }
        let mut chapters = Vec::with_capacity(additions.len());
        let mut current = ChapterDocs {
            entries: Vec::new(),
            by_label: fast_hash_map_new(),
        };
        for added in additions {
            for entry in added {
                current.push(entry);
            }
            chapters.push(current.clone());
        }

        let modules: BTreeMap<String, ModuleExports> =
            serde_json::from_str(modules).context("parsing modules.json")?;

        let file: KeywordFile = serde_json::from_str(keywords).context("parsing keywords.json")?;
        if file.source.len() != Chapter::ALL.len() {
            bail!("keywords.json lists {} chapters, expected {}", file.source.len(), Chapter::ALL.len());
        }
        let keywords = file
            .source
            .iter()
            .map(|names| {
                names
                    .iter()
                    .map(|name| {
                        file.keywords
                            .get(name)
                            .cloned()
                            .ok_or_else(|| anyhow!("keywords.json: no description for keyword '{name}'"))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            chapters,
            modules,
            keywords,
        })
    }

    /// Tables with nothing in them.
    pub fn empty() -> Self {
        Self {
            chapters: Chapter::ALL.iter().map(|_| ChapterDocs::default()).collect(),
            modules: BTreeMap::new(),
            keywords: vec![Vec::new(); Chapter::ALL.len()],
        }
    }

    /// Every builtin available in `chapter`, earlier chapters' first.
    pub fn builtins(&self, chapter: Chapter) -> &[DocEntry] {
        self.chapters
            .get(chapter.index())
            .map(|c| c.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn builtin_doc(&self, chapter: Chapter, name: &str) -> Option<&DocEntry> {
        self.chapters.get(chapter.index())?.get(name)
    }

    /// Importable modules in name order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &ModuleExports)> {
        self.modules.iter().map(|(name, exports)| (name.as_str(), exports))
    }

    pub fn module_doc(&self, module: &str, name: &str) -> Option<&DocEntry> {
        self.modules.get(module)?.get(name)
    }

    pub fn keywords(&self, chapter: Chapter) -> &[Keyword] {
        self.keywords
            .get(chapter.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Catalogue for Documentation {
    fn builtin(&self, chapter: Chapter, name: &str) -> Option<EntryInfo> {
        self.builtin_doc(chapter, name).map(DocEntry::info)
    }

    fn has_module(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    fn module_entry(&self, module: &str, name: &str) -> Option<EntryInfo> {
        self.module_doc(module, name).map(DocEntry::info)
    }
}

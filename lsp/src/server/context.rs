//! The `source/publishInfo` notification: the client tells the server which
//! chapter each document is written in and how many prelude lines precede
//! it. This is the only way a document's chapter is set.

use std::collections::HashMap;

use dashmap::DashMap;
use serde::Deserialize;
use source_core::analysis::Chapter;
use tower_lsp::lsp_types::Url;
use tracing::{info, warn};

use crate::analyzer::DocumentContext;

use super::state::SourceLanguageServer;

pub const PUBLISH_INFO_METHOD: &str = "source/publishInfo";

/// Context announced for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ContextInfo {
    pub chapter: u64,
    #[serde(default)]
    pub prepend: u32,
}

pub(crate) type PublishInfoParams = HashMap<Url, ContextInfo>;

/// Record the announced contexts and return the documents whose context
/// actually changed.
pub(crate) fn apply_contexts(contexts: &DashMap<Url, DocumentContext>, params: PublishInfoParams) -> Vec<Url> {
    let mut changed = Vec::new();
    for (uri, info) in params {
        let Some(chapter) = Chapter::from_number(info.chapter) else {
            warn!("ignoring unknown chapter {} for {}", info.chapter, uri);
            continue;
        };
        let context = DocumentContext::new(chapter, info.prepend);
        let previous = contexts.insert(uri.clone(), context).unwrap_or_default();
        if previous != context {
            changed.push(uri);
        }
    }
    changed
}

impl SourceLanguageServer {
    pub(crate) async fn publish_info(&self, params: PublishInfoParams) {
        let changed = apply_contexts(&self.contexts, params);
        for uri in changed {
            let context = self.context_of(&uri);
            info!("{} now checked as {} with {} prelude lines", uri, context.chapter.label(), context.prepend);
            let version = match self.documents.get_mut(&uri) {
                Some(mut doc) => {
                    doc.invalidate();
                    doc.debounce_seq = doc.debounce_seq.wrapping_add(1);
                    doc.version
                }
                None => continue,
            };
            self.schedule_diagnostics(uri, version, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///tmp/{name}.js")).unwrap()
    }

    #[test]
    fn test_payload_shape() {
        let params: PublishInfoParams = serde_json::from_value(serde_json::json!({
            "file:///tmp/a.js": { "chapter": 2 },
            "file:///tmp/b.js": { "chapter": 4, "prepend": 3 }
        }))
        .unwrap();
        assert_eq!(params[&uri("a")], ContextInfo { chapter: 2, prepend: 0 });
        assert_eq!(params[&uri("b")], ContextInfo { chapter: 4, prepend: 3 });
    }

    #[test]
    fn test_only_changed_contexts_are_reported() {
        let contexts = DashMap::new();
        let mut params = PublishInfoParams::new();
        params.insert(uri("a"), ContextInfo { chapter: 1, prepend: 0 });
        params.insert(uri("b"), ContextInfo { chapter: 3, prepend: 0 });
        // chapter 1 without prelude is what an unannounced document gets
        assert_eq!(apply_contexts(&contexts, params.clone()), vec![uri("b")]);
        assert!(apply_contexts(&contexts, params).is_empty());

        let mut again = PublishInfoParams::new();
        again.insert(uri("b"), ContextInfo { chapter: 3, prepend: 2 });
        assert_eq!(apply_contexts(&contexts, again), vec![uri("b")]);
        assert_eq!(contexts.get(&uri("b")).map(|c| *c), Some(DocumentContext::new(Chapter::Three, 2)));
    }

    #[test]
    fn test_unknown_chapter_is_ignored() {
        let contexts = DashMap::new();
        let mut params = PublishInfoParams::new();
        params.insert(uri("a"), ContextInfo { chapter: 7, prepend: 0 });
        assert!(apply_contexts(&contexts, params).is_empty());
        assert!(contexts.is_empty());
    }
}

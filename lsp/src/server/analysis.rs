use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Semaphore;
use tokio::task;
use tokio::time::{sleep, Duration};
use tower_lsp::lsp_types::{Diagnostic, Url};
use tower_lsp::Client;
use tracing::{debug, error};

use crate::analyzer::{AnalysisResult, DocumentContext, SourceAnalyzer};

use super::state::{Document, SourceLanguageServer};
use super::utils::rope_hash;

struct Snapshot {
    content: String,
    version: i32,
    seq: u64,
    hash: u64,
}

impl Snapshot {
    fn of(doc: &Document) -> Self {
        Self {
            content: doc.content.to_string(),
            version: doc.version,
            seq: doc.debounce_seq,
            hash: rope_hash(&doc.content),
        }
    }

    /// Whether `doc` still holds the text this snapshot was taken from.
    fn is_current(&self, doc: &Document) -> bool {
        doc.version == self.version && doc.debounce_seq == self.seq
    }
}

/// Analyze `content` on the blocking pool, holding a permit of `limiter`.
async fn compute(limiter: Arc<Semaphore>, content: String, context: DocumentContext) -> Option<AnalysisResult> {
    let _permit = limiter.acquire_owned().await.ok()?;
    match task::spawn_blocking(move || SourceAnalyzer::new().analyze(&content, context)).await {
        Ok(result) => Some(result),
        Err(e) => {
            error!("analysis task failed: {e}");
            None
        }
    }
}

/// Store `result` unless the document changed while it was computed.
fn store(documents: &DashMap<Url, Document>, uri: &Url, snapshot: &Snapshot, result: &Arc<AnalysisResult>) {
    if let Some(mut doc) = documents.get_mut(uri) {
        if snapshot.is_current(&doc) && doc.cached_analysis.is_none() {
            doc.cached_analysis = Some(result.clone());
            doc.analyzed_hash = Some(snapshot.hash);
        }
    }
}

impl SourceLanguageServer {
    pub(crate) async fn get_or_compute_analysis(&self, uri: &Url) -> Option<Arc<AnalysisResult>> {
        let snapshot = {
            let doc = self.documents.get(uri)?;
            if let Some(cached) = doc.cached_analysis.clone() {
                return Some(cached);
            }
            Snapshot::of(&doc)
        };

        let context = self.context_of(uri);
        let computed = Arc::new(compute(self.limiter(), snapshot.content.clone(), context).await?);
        store(&self.documents, uri, &snapshot, &computed);
        Some(computed)
    }

    /// Re-analyze `uri` after `delay_ms` of quiet and publish its
    /// diagnostics. A later call for the same document cancels this one.
    pub(crate) fn schedule_diagnostics(&self, uri: Url, scheduled_version: i32, delay_ms: u64) {
        let documents = self.documents.clone();
        let contexts = self.contexts.clone();
        let client = self.client.clone();
        let limiter = self.limiter();
        let task_uri = uri.clone();

        let handle = tokio::spawn(async move {
            let uri = task_uri;
            sleep(Duration::from_millis(delay_ms)).await;

            let (snapshot, cached) = match documents.get(&uri) {
                Some(doc) if doc.version == scheduled_version => (Snapshot::of(&doc), doc.cached_analysis.clone()),
                _ => return,
            };

            let result = match cached {
                Some(cached) => cached,
                None => {
                    let context = contexts.get(&uri).map(|c| *c).unwrap_or_default();
                    let Some(result) = compute(limiter, snapshot.content.clone(), context).await else {
                        return;
                    };
                    let result = Arc::new(result);
                    store(&documents, &uri, &snapshot, &result);
                    result
                }
            };

            if !documents.get(&uri).is_some_and(|doc| snapshot.is_current(&doc)) {
                debug!("{} changed during analysis; not publishing", uri);
                return;
            }
            publish(&client, uri, result.diagnostics.clone(), Some(snapshot.version)).await;
        });

        match self.documents.get_mut(&uri) {
            Some(mut doc) => doc.set_debounce(handle),
            None => handle.abort(),
        }
    }
}

pub(crate) async fn publish(client: &Client, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
    client.publish_diagnostics(uri, diagnostics, version).await;
}

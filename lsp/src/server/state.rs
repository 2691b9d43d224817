use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use ropey::Rope;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tower_lsp::lsp_types::Url;
use tower_lsp::Client;

use crate::analyzer::{AnalysisResult, DocumentContext};

use super::config::ServerConfig;

/// An open document and its cached analysis.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
    pub(crate) cached_analysis: Option<Arc<AnalysisResult>>,
    /// Hash of the text `cached_analysis` was computed from.
    pub(crate) analyzed_hash: Option<u64>,
    /// Bumped on every edit; a result computed before the latest bump is not cached.
    pub(crate) debounce_seq: u64,
    /// The pending delayed re-analysis, if any.
    pub(crate) debounce: Option<JoinHandle<()>>,
}

impl Document {
    pub(crate) fn new(text: &str, version: i32) -> Self {
        Self {
            content: Rope::from_str(text),
            version,
            ..Default::default()
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.cached_analysis = None;
        self.analyzed_hash = None;
    }

    /// Replace the pending re-analysis, cancelling the previous one.
    pub(crate) fn set_debounce(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.debounce.replace(handle) {
            previous.abort();
        }
    }
}

/// Primary LSP server state shared across handlers.
pub(crate) struct SourceLanguageServer {
    pub(crate) client: Client,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    /// Chapter and prelude length per document, as last announced by the client.
    pub(crate) contexts: Arc<DashMap<Url, DocumentContext>>,
    pub(crate) config: Mutex<ServerConfig>,
    pub(crate) compute_limiter: Mutex<Arc<Semaphore>>,
}

impl SourceLanguageServer {
    pub(crate) fn new(client: Client) -> Self {
        let config = ServerConfig::default();
        let permits = config.max_concurrent;
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            contexts: Arc::new(DashMap::new()),
            config: Mutex::new(config),
            compute_limiter: Mutex::new(Arc::new(Semaphore::new(permits))),
        }
    }

    pub(crate) fn context_of(&self, uri: &Url) -> DocumentContext {
        self.contexts.get(uri).map(|c| *c).unwrap_or_default()
    }

    pub(crate) fn limiter(&self) -> Arc<Semaphore> {
        match self.compute_limiter.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn debounce_ms(&self) -> u64 {
        match self.config.lock() {
            Ok(guard) => guard.debounce_ms,
            Err(poisoned) => poisoned.into_inner().debounce_ms,
        }
    }
}

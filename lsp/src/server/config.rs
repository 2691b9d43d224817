use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tower_lsp::lsp_types::ConfigurationItem;
use tracing::{debug, warn};

use super::state::SourceLanguageServer;

pub(crate) const CONFIG_SECTION: &str = "source.lsp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServerConfig {
    /// Quiet period after an edit before the document is re-analyzed.
    pub(crate) debounce_ms: u64,
    /// Analyses allowed to run at once.
    pub(crate) max_concurrent: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            max_concurrent: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SourceLspConfigSection {
    #[serde(default)]
    debounce_ms: Option<u64>,
    #[serde(default)]
    performance: PerformanceConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PerformanceConfig {
    #[serde(default)]
    max_concurrent: Option<usize>,
}

impl ServerConfig {
    /// Overlay the values present in `section`.
    pub(crate) fn apply(&mut self, section: &SourceLspConfigSection) {
        if let Some(v) = section.debounce_ms {
            self.debounce_ms = v;
        }
        if let Some(v) = section.performance.max_concurrent.filter(|v| *v > 0) {
            self.max_concurrent = v;
        }
    }
}

impl SourceLanguageServer {
    pub(crate) async fn load_config(&self) {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(CONFIG_SECTION.to_string()),
        }];

        let values = match self.client.configuration(items).await {
            Ok(values) => values,
            Err(e) => {
                debug!("client did not provide configuration: {e}");
                return;
            }
        };
        let Some(value) = values.into_iter().next().filter(|v| !v.is_null()) else {
            return;
        };
        let section = match serde_json::from_value::<SourceLspConfigSection>(value) {
            Ok(section) => section,
            Err(e) => {
                warn!("ignoring malformed {CONFIG_SECTION} configuration: {e}");
                return;
            }
        };

        let permits = {
            let Ok(mut guard) = self.config.lock() else {
                return;
            };
            guard.apply(&section);
            debug!("configuration: {:?}", *guard);
            guard.max_concurrent.max(1)
        };
        if let Ok(mut limiter) = self.compute_limiter.lock() {
            *limiter = Arc::new(Semaphore::new(permits));
        }
    }
}

use std::collections::HashMap;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::request::{GotoDeclarationParams, GotoDeclarationResponse};
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::{debug, info};

use crate::analyzer::resolve_completion;

use super::analysis::publish;
use super::state::{Document, SourceLanguageServer};
use super::text::apply_changes;
use super::utils::rope_hash;

#[tower_lsp::async_trait]
impl LanguageServer for SourceLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Source Language Server initializing with params: {:?}", params.root_uri);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(true),
                    trigger_characters: None,
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: Some(CompletionOptionsCompletionItem {
                        label_details_support: Some(true),
                    }),
                }),
                declaration_provider: Some(DeclarationCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                references_provider: Some(OneOf::Left(true)),
                document_highlight_provider: Some(OneOf::Left(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                rename_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "Source Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Source Language Server initialized");
        self.client
            .log_message(MessageType::INFO, "Source Language Server started")
            .await;
        self.load_config().await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Source Language Server shutting down");
        for mut doc in self.documents.iter_mut() {
            if let Some(pending) = doc.debounce.take() {
                pending.abort();
            }
        }
        Ok(())
    }

    async fn did_change_configuration(&self, _params: DidChangeConfigurationParams) {
        self.load_config().await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        debug!("opened {} as {}", uri, self.context_of(&uri).chapter.label());
        self.documents
            .insert(uri.clone(), Document::new(&params.text_document.text, version));
        self.schedule_diagnostics(uri, version, 0);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        {
            let mut entry = self.documents.entry(uri.clone()).or_default();
            entry.version = version;
            apply_changes(&mut entry.content, &params.content_changes);

            // an edit that restores the analyzed text keeps its analysis
            let hash = rope_hash(&entry.content);
            if entry.analyzed_hash != Some(hash) {
                entry.invalidate();
            }
            entry.debounce_seq = entry.debounce_seq.wrapping_add(1);
        }

        self.schedule_diagnostics(uri, version, self.debounce_ms());
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some((_, mut doc)) = self.documents.remove(&uri) {
            if let Some(pending) = doc.debounce.take() {
                pending.abort();
            }
        }
        publish(&self.client, uri, Vec::new(), None).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(analysis) = self.get_or_compute_analysis(uri).await else {
            return Ok(None);
        };
        Ok(Some(CompletionResponse::Array(analysis.completions(position))))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        Ok(resolve_completion(item, source_stdlib::documentation()))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        Ok(self
            .get_or_compute_analysis(uri)
            .await
            .and_then(|analysis| analysis.hover(position)))
    }

    async fn goto_declaration(&self, params: GotoDeclarationParams) -> Result<Option<GotoDeclarationResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(analysis) = self.get_or_compute_analysis(uri).await else {
            return Ok(None);
        };
        Ok(analysis
            .declaration(position)
            .map(|range| GotoDeclarationResponse::Scalar(Location::new(uri.clone(), range))))
    }

    async fn goto_definition(&self, params: GotoDefinitionParams) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(analysis) = self.get_or_compute_analysis(uri).await else {
            return Ok(None);
        };
        Ok(analysis
            .declaration(position)
            .map(|range| GotoDefinitionResponse::Scalar(Location::new(uri.clone(), range))))
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(analysis) = self.get_or_compute_analysis(uri).await else {
            return Ok(None);
        };
        let locations: Vec<Location> = analysis
            .references(position, params.context.include_declaration)
            .into_iter()
            .map(|range| Location::new(uri.clone(), range))
            .collect();
        Ok((!locations.is_empty()).then_some(locations))
    }

    async fn document_highlight(&self, params: DocumentHighlightParams) -> Result<Option<Vec<DocumentHighlight>>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(analysis) = self.get_or_compute_analysis(uri).await else {
            return Ok(None);
        };
        let highlights = analysis.highlights(position);
        Ok((!highlights.is_empty()).then_some(highlights))
    }

    async fn document_symbol(&self, params: DocumentSymbolParams) -> Result<Option<DocumentSymbolResponse>> {
        let uri = &params.text_document.uri;
        if let Some(analysis) = self.get_or_compute_analysis(uri).await {
            if !analysis.symbols.is_empty() {
                return Ok(Some(DocumentSymbolResponse::Nested(analysis.symbols.clone())));
            }
        }
        Ok(None)
    }

    async fn rename(&self, params: RenameParams) -> Result<Option<WorkspaceEdit>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(analysis) = self.get_or_compute_analysis(uri).await else {
            return Ok(None);
        };
        let Some(edits) = analysis.rename(position, &params.new_name) else {
            return Ok(None);
        };
        let mut changes = HashMap::new();
        changes.insert(uri.clone(), edits);
        Ok(Some(WorkspaceEdit {
            changes: Some(changes),
            ..Default::default()
        }))
    }
}

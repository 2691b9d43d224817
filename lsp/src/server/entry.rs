use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

use super::cli::try_cli_analyze;
use super::context::PUBLISH_INFO_METHOD;
use super::state::SourceLanguageServer;

pub async fn run() {
    if let Some(output) = try_cli_analyze().unwrap_or_else(|e| {
        eprintln!("source-lsp analyze error: {e:#}");
        std::process::exit(2);
    }) {
        println!("{}", output);
        return;
    }

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(SourceLanguageServer::new)
        .custom_method(PUBLISH_INFO_METHOD, SourceLanguageServer::publish_info)
        .finish();
    Server::new(stdin, stdout, socket).serve(service).await;
}

use std::path::{Component, Path};

use anyhow::{anyhow, bail, Context};
use source_core::analysis::Chapter;
use tower_lsp::lsp_types::DiagnosticSeverity;

use crate::analyzer::{DocumentContext, SourceAnalyzer};

const USAGE: &str = "Usage: source-lsp --analyze [--chapter N] [--errors-only] <relative-file-path>\n  --analyze <file>     : Full analysis with JSON output\n  --chapter N          : Check against chapter N (1-4, default 1)\n  --errors-only        : Show only errors in simple format";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CliOptions {
    pub(crate) path: String,
    pub(crate) chapter: Chapter,
    pub(crate) errors_only: bool,
}

/// `None` when `--analyze` is absent and the server should start.
pub(crate) fn parse_args(args: &[String]) -> anyhow::Result<Option<CliOptions>> {
    let Some(i) = args.iter().position(|a| a == "--analyze") else {
        return Ok(None);
    };

    let mut path = None;
    let mut chapter = Chapter::default();
    let mut errors_only = false;
    let mut rest = args[i + 1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--errors-only" => errors_only = true,
            "--chapter" => {
                let value = rest.next().ok_or_else(|| anyhow!("--chapter needs a value\n{USAGE}"))?;
                chapter = value
                    .parse::<u64>()
                    .ok()
                    .and_then(Chapter::from_number)
                    .ok_or_else(|| anyhow!("Unknown chapter '{value}'\n{USAGE}"))?;
            }
            flag if flag.starts_with("--") => bail!("Unknown option '{flag}'\n{USAGE}"),
            other if path.is_none() => path = Some(other.to_string()),
            _ => {}
        }
    }

    let path = path.ok_or_else(|| anyhow!("{USAGE}"))?;
    Ok(Some(CliOptions {
        path,
        chapter,
        errors_only,
    }))
}

pub(crate) fn try_cli_analyze() -> anyhow::Result<Option<String>> {
    let args: Vec<String> = std::env::args().collect();
    let Some(options) = parse_args(&args)? else {
        return Ok(None);
    };
    let content = read_file_content(&options.path)?;
    analyze_file(&content, options.chapter, options.errors_only).map(Some)
}

/// Diagnostics and outline of `content` as pretty JSON, or with
/// `errors_only` one `Line L:C: message` per error.
pub fn analyze_file(content: &str, chapter: Chapter, errors_only: bool) -> anyhow::Result<String> {
    let result = SourceAnalyzer::new().analyze(content, DocumentContext::new(chapter, 0));

    if errors_only {
        let errors: Vec<String> = result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Some(DiagnosticSeverity::ERROR))
            .map(|d| {
                format!(
                    "Line {}:{}: {}",
                    d.range.start.line + 1,
                    d.range.start.character + 1,
                    d.message
                )
            })
            .collect();
        if errors.is_empty() {
            return Ok("No errors found".to_string());
        }
        return Ok(errors.join("\n"));
    }

    let output = serde_json::json!({
        "chapter": chapter.number(),
        "diagnostics": result.diagnostics,
        "symbols": result.symbols,
    });
    serde_json::to_string_pretty(&output).context("serializing analysis")
}

pub(crate) fn is_safe_path(path: &str) -> bool {
    let path = Path::new(path);

    if path.as_os_str().is_empty() || path.is_absolute() {
        return false;
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return false;
    }

    let s = path.to_string_lossy();
    if s.chars().any(|c| matches!(c, '\0' | '\n' | '\r' | '\t')) {
        return false;
    }
    // drive letters
    !(s.len() >= 2 && s.as_bytes()[1] == b':')
}

pub(crate) fn read_file_content(path: &str) -> anyhow::Result<String> {
    if !is_safe_path(path) {
        bail!("Unsafe file path: {}", path);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path))
}

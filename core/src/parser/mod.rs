//! Recovering parser.
//!
//! [`parse`] tries a strict parse first. If that fails anywhere, the text is
//! re-tokenized and re-parsed in lenient mode, which never fails: fragments it
//! cannot understand become [`NodeKind::Malformed`] and parsing carries on.
//! While strict-parsing, inserted semicolons and trailing commas are recorded
//! as [`ParseNote`]s instead of being treated as errors.

mod control;
mod declarations;
mod expr;
mod function;
mod helpers;
mod imports;
mod program;

#[cfg(test)]
mod recover_test;

use crate::ast::{Node, NodeKind};
use crate::token::{ParseError, Position, Span, Token, Tokenizer, end_position};

/// Nesting limit for statements and expressions. Deeper input fails the
/// strict parse; the lenient one turns the over-deep fragment into a
/// malformed node and carries on after it.
pub const MAX_DEPTH: usize = 256;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseNoteKind {
    MissingSemicolon,
    TrailingComma,
}

/// A recoverable anomaly noticed during the strict parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNote {
    pub kind: ParseNoteKind,
    pub span: Span,
}

impl ParseNote {
    pub fn message(&self) -> &'static str {
        match self.kind {
            ParseNoteKind::MissingSemicolon => "Missing semicolon",
            ParseNoteKind::TrailingComma => "Trailing comma",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub program: Node,
    pub notes: Vec<ParseNote>,
    /// The strict parse error that forced the lenient fallback, if any.
    pub error: Option<ParseError>,
}

impl ParseOutcome {
    pub fn recovered(&self) -> bool {
        self.error.is_some()
    }
}

/// Parse `source`, numbering its first line `first_line`.
pub fn parse(source: &str, first_line: u32) -> ParseOutcome {
    let start = Position::new(first_line, 0, 0);
    let end = end_position(source, first_line);

    let (notes, error) = match Tokenizer::tokenize(source, first_line) {
        Ok((tokens, spans)) => {
            let mut parser = Parser::new(source, &tokens, &spans, false, start, end);
            match parser.parse_program() {
                Ok(program) => {
                    return ParseOutcome {
                        program,
                        notes: parser.notes,
                        error: None,
                    };
                }
                Err(err) => (parser.notes, err),
            }
        }
        Err(err) => (Vec::new(), err),
    };

    tracing::debug!("strict parse failed ({}), falling back to lenient parse", error);
    let program = parse_lenient(source, first_line);
    ParseOutcome {
        program,
        notes,
        error: Some(error),
    }
}

/// Strict parse only.
pub fn parse_strict(source: &str, first_line: u32) -> ParseResult<(Node, Vec<ParseNote>)> {
    let start = Position::new(first_line, 0, 0);
    let end = end_position(source, first_line);
    let (tokens, spans) = Tokenizer::tokenize(source, first_line)?;
    let mut parser = Parser::new(source, &tokens, &spans, false, start, end);
    let program = parser.parse_program()?;
    Ok((program, parser.notes))
}

/// Lenient parse only. Always produces a program.
pub fn parse_lenient(source: &str, first_line: u32) -> Node {
    let start = Position::new(first_line, 0, 0);
    let end = end_position(source, first_line);
    let (tokens, spans) = Tokenizer::tokenize_lenient(source, first_line);
    let mut parser = Parser::new(source, &tokens, &spans, true, start, end);
    parser
        .parse_program()
        .unwrap_or_else(|_| Node::new(NodeKind::Program { body: Vec::new() }, Span::new(start, end)))
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    spans: &'a [Span],
    pos: usize,
    len: usize,
    lenient: bool,
    depth: usize,
    block_depth: usize,
    /// Disallows the `in` operator while parsing a `for` head.
    no_in: bool,
    input_start: Position,
    input_end: Position,
    pub notes: Vec<ParseNote>,
}

impl<'a> Parser<'a> {
    pub fn new(
        source: &'a str,
        tokens: &'a [Token],
        spans: &'a [Span],
        lenient: bool,
        input_start: Position,
        input_end: Position,
    ) -> Self {
        Self {
            source,
            tokens,
            spans,
            pos: 0,
            len: tokens.len(),
            lenient,
            depth: 0,
            block_depth: 0,
            no_in: false,
            input_start,
            input_end,
            notes: Vec::new(),
        }
    }
}

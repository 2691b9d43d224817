use std::mem;

use super::{MAX_DEPTH, ParseNote, ParseNoteKind, ParseResult, Parser};
use crate::ast::{Node, NodeKind};
use crate::token::{ParseError, Position, Span, Token};

impl<'a> Parser<'a> {
    pub(super) fn eof(&self) -> bool {
        self.pos >= self.len
    }

    pub(super) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(super) fn peek_ahead(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + offset)
    }

    /// Same variant as `expected`, ignoring any payload.
    pub(super) fn check(&self, expected: &Token) -> bool {
        self.peek()
            .is_some_and(|t| mem::discriminant(t) == mem::discriminant(expected))
    }

    pub(super) fn check_word(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token::Id(id)) if id == word)
    }

    pub(super) fn bump(&mut self) -> Span {
        let span = self.current_span();
        if !self.eof() {
            self.pos += 1;
        }
        span
    }

    pub(super) fn eat(&mut self, expected: &Token) -> Option<Span> {
        if self.check(expected) { Some(self.bump()) } else { None }
    }

    pub(super) fn current_span(&self) -> Span {
        self.spans
            .get(self.pos)
            .copied()
            .unwrap_or_else(|| Span::single(self.input_end))
    }

    pub(super) fn cur_start(&self) -> Position {
        self.current_span().start
    }

    /// End of the last consumed token.
    pub(super) fn prev_end(&self) -> Position {
        if self.pos == 0 {
            return self.input_start;
        }
        self.spans
            .get(self.pos - 1)
            .map(|s| s.end)
            .unwrap_or(self.input_end)
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) fn finish(&self, start: Position) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    /// Span from `start` covering both consumed tokens and `last`, which may
    /// be a zero-width placeholder sitting past the last consumed token.
    pub(super) fn finish_with(&self, start: Position, last: &Span) -> Span {
        Span::new(start, self.prev_end().max(last.end).max(start))
    }

    pub(super) fn newline_before(&self) -> bool {
        if self.pos == 0 || self.eof() {
            return false;
        }
        self.spans[self.pos].start.line > self.spans[self.pos - 1].end.line
    }

    pub(super) fn source_text(&self, span: &Span) -> &'a str {
        self.source.get(span.start.offset..span.end.offset).unwrap_or("")
    }

    pub(super) fn error(&self, msg: &str) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::with_span(format!("{} ({:?})", msg, tok), self.current_span()),
            None => ParseError::with_position(format!("{}, found end of input", msg), self.input_end),
        }
    }

    /// Strict mode: fail with `msg`. Lenient mode: recover with `fallback`.
    pub(super) fn reject<T>(&mut self, msg: &str, fallback: impl FnOnce(&mut Self) -> T) -> ParseResult<T> {
        if self.lenient {
            Ok(fallback(self))
        } else {
            Err(self.error(msg))
        }
    }

    /// Zero-width placeholder at the current token.
    pub(super) fn placeholder(&self) -> Node {
        Node::malformed(Span::single(self.cur_start()))
    }

    pub(super) fn expect_token(&mut self, expected: Token) -> ParseResult<Span> {
        if let Some(span) = self.eat(&expected) {
            return Ok(span);
        }
        let msg = format!("Expected {:?}", expected);
        self.reject(&msg, |p| Span::single(p.cur_start()))
    }

    /// Consume a closing bracket. The lenient parser skips stray tokens on the
    /// way to a matching closer, giving up at braces, line breaks or the end
    /// of input.
    pub(super) fn expect_closing(&mut self, close: Token) -> ParseResult<Span> {
        if let Some(span) = self.eat(&close) {
            return Ok(span);
        }
        if !self.lenient {
            return Err(self.error(&format!("Expected {:?}", close)));
        }

        let line = self.prev_end().line;
        let mut depth = 0usize;
        let mut i = self.pos;
        while let Some(tok) = self.tokens.get(i) {
            if self.spans[i].start.line > line {
                break;
            }
            if depth == 0 && mem::discriminant(tok) == mem::discriminant(&close) {
                self.pos = i + 1;
                return Ok(self.spans[i]);
            }
            match tok {
                Token::LParen | Token::LBracket => depth += 1,
                Token::RParen | Token::RBracket if depth > 0 => depth -= 1,
                Token::LBrace | Token::RBrace => break,
                _ => {}
            }
            i += 1;
        }
        Ok(Span::single(self.cur_start()))
    }

    /// Automatic semicolon insertion. An inserted semicolon is noted while
    /// strict-parsing.
    pub(super) fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat(&Token::Semicolon).is_some() {
            return Ok(());
        }
        if self.eof() || self.check(&Token::RBrace) || self.newline_before() {
            if !self.lenient {
                self.notes.push(ParseNote {
                    kind: ParseNoteKind::MissingSemicolon,
                    span: Span::one_char(self.prev_end()),
                });
            }
            return Ok(());
        }
        self.reject("Unexpected token", |_| ())
    }

    /// After a comma, note it as trailing if `close` follows.
    pub(super) fn note_trailing_comma(&mut self, comma: Span, close: &Token) -> bool {
        if !self.check(close) {
            return false;
        }
        if !self.lenient {
            self.notes.push(ParseNote {
                kind: ParseNoteKind::TrailingComma,
                span: Span::one_char(comma.start),
            });
        }
        true
    }

    pub(super) fn identifier(&mut self) -> Option<Node> {
        match self.peek() {
            Some(Token::Id(name)) => {
                let span = self.bump();
                Some(Node::new(NodeKind::Identifier { name: name.clone() }, span))
            }
            _ => None,
        }
    }

    /// Identifier or keyword used as a property/export name.
    pub(super) fn property_name(&mut self) -> Option<Node> {
        let name = match self.peek()? {
            Token::Id(name) => name.clone(),
            tok => tok.keyword_name()?.to_string(),
        };
        let span = self.bump();
        Some(Node::new(NodeKind::Identifier { name }, span))
    }

    pub(super) fn expect_identifier(&mut self) -> ParseResult<Node> {
        if let Some(id) = self.identifier() {
            return Ok(id);
        }
        self.reject("Expected identifier", |p| p.placeholder())
    }

    /// Run `f` one nesting level deeper. Past [`MAX_DEPTH`] the strict parse
    /// fails and the lenient parse replaces the over-deep fragment with a
    /// malformed node.
    pub(super) fn nested(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<Node>) -> ParseResult<Node> {
        if self.depth >= MAX_DEPTH {
            return self.reject("Maximum nesting depth exceeded", |p| p.skip_fragment());
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Skip the fragment starting at the current token: everything up to the
    /// next `,` or `;` outside brackets, or up to a closer it did not open.
    /// The enclosing constructs keep their own delimiters.
    fn skip_fragment(&mut self) -> Node {
        let start = self.cur_start();
        let from = self.pos;
        let mut open = 0usize;
        while let Some(tok) = self.peek() {
            match tok {
                Token::LParen | Token::LBracket | Token::LBrace => open += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    if open == 0 {
                        break;
                    }
                    open -= 1;
                }
                Token::Comma | Token::Semicolon if open == 0 => break,
                _ => {}
            }
            self.bump();
        }
        if self.pos == from {
            return self.placeholder();
        }
        Node::malformed(self.finish(start))
    }

    /// Index of the bracket matching the opener at the current position.
    pub(super) fn matching_close(&self) -> Option<usize> {
        let mut depth = 0usize;
        for (i, tok) in self.tokens.iter().enumerate().skip(self.pos) {
            match tok {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

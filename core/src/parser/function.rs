use super::{ParseResult, Parser};
use crate::ast::{Node, NodeKind};
use crate::token::{Position, Token};

impl<'a> Parser<'a> {
    /// `function name(params) { body }`. As a declaration the name is
    /// required; the lenient parser substitutes a placeholder when missing.
    pub(super) fn parse_function(&mut self, declaration: bool) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();

        let id = match self.identifier() {
            Some(id) => Some(id),
            None if declaration => Some(self.reject("Missing function name", |p| p.placeholder())?),
            None => None,
        };

        self.expect_token(Token::LParen)?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let span = self.finish(start);

        let kind = match id {
            Some(id) if declaration => NodeKind::FunctionDeclaration {
                id: Box::new(id),
                params,
                body: Box::new(body),
            },
            id => NodeKind::FunctionExpression {
                id: id.map(Box::new),
                params,
                body: Box::new(body),
            },
        };
        Ok(Node::new(kind, span))
    }

    /// Parameter list after the opening parenthesis, through the closing one.
    pub(super) fn parse_params(&mut self) -> ParseResult<Vec<Node>> {
        let mut params = Vec::new();
        while !self.eof() && !self.check(&Token::RParen) {
            let before = self.pos;
            params.push(self.parse_param()?);
            match self.eat(&Token::Comma) {
                Some(comma) => {
                    if self.note_trailing_comma(comma, &Token::RParen) {
                        break;
                    }
                }
                None => break,
            }
            if self.lenient && self.pos == before {
                break;
            }
        }
        self.expect_closing(Token::RParen)?;
        self.validate_params(&params)?;
        Ok(params)
    }

    fn parse_param(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        if self.eat(&Token::Ellipsis).is_some() {
            let argument = self.parse_param_target()?;
            return Ok(Node::new(
                NodeKind::Rest {
                    argument: Box::new(argument),
                },
                self.finish(start),
            ));
        }
        let target = self.parse_param_target()?;
        if self.eat(&Token::Assign).is_some() {
            let default = self.parse_assignment()?;
            let span = self.finish_with(start, &default.span);
            return Ok(Node::new(
                NodeKind::Assignment {
                    operator: "=",
                    left: Box::new(target),
                    right: Box::new(default),
                },
                span,
            ));
        }
        Ok(target)
    }

    fn parse_param_target(&mut self) -> ParseResult<Node> {
        if self.lenient && !matches!(self.peek(), Some(Token::Id(_) | Token::LBracket | Token::LBrace)) {
            // keep whatever is there so it can be reported as a bad parameter
            return self.parse_assignment();
        }
        self.parse_binding_target()
    }

    /// A rest parameter must come last.
    fn validate_params(&self, params: &[Node]) -> ParseResult<()> {
        if self.lenient {
            return Ok(());
        }
        let rest_not_last = params
            .iter()
            .rev()
            .skip(1)
            .any(|p| matches!(p.kind, NodeKind::Rest { .. }));
        if rest_not_last {
            return Err(self.error("Rest element must be last element"));
        }
        Ok(())
    }

    /// Whether the `(` at the current position opens an arrow parameter list.
    pub(super) fn at_arrow_params(&self) -> bool {
        match self.matching_close() {
            Some(close) => matches!(self.tokens.get(close + 1), Some(Token::Arrow)),
            None => false,
        }
    }

    /// Arrow function starting at `(`, or at a single bare parameter.
    pub(super) fn parse_arrow(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        let params = if self.eat(&Token::LParen).is_some() {
            self.parse_params()?
        } else {
            vec![self.expect_identifier()?]
        };
        self.expect_token(Token::Arrow)?;
        self.parse_arrow_body(start, params)
    }

    fn parse_arrow_body(&mut self, start: Position, params: Vec<Node>) -> ParseResult<Node> {
        let body = if self.check(&Token::LBrace) {
            self.parse_block()?
        } else {
            let saved = self.no_in;
            self.no_in = false;
            let body = self.parse_assignment();
            self.no_in = saved;
            body?
        };
        let span = self.finish_with(start, &body.span);
        Ok(Node::new(
            NodeKind::Arrow {
                params,
                body: Box::new(body),
            },
            span,
        ))
    }
}

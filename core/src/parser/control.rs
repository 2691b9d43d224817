use super::{ParseResult, Parser};
use crate::ast::{CatchClause, Node, NodeKind, SwitchCase};
use crate::token::Token;

impl<'a> Parser<'a> {
    /// `(` expression `)` as used by if/while/switch/with heads.
    fn parse_paren_head(&mut self) -> ParseResult<Node> {
        self.expect_token(Token::LParen)?;
        let expr = self.parse_expression()?;
        self.expect_closing(Token::RParen)?;
        Ok(expr)
    }

    pub(super) fn parse_if(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let test = self.parse_paren_head()?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat(&Token::Else).is_some() {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Node::new(
            NodeKind::If {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate,
            },
            self.finish(start),
        ))
    }

    pub(super) fn parse_while(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let test = self.parse_paren_head()?;
        let body = self.parse_statement()?;
        Ok(Node::new(
            NodeKind::While {
                test: Box::new(test),
                body: Box::new(body),
            },
            self.finish(start),
        ))
    }

    pub(super) fn parse_do_while(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let body = self.parse_statement()?;
        self.expect_token(Token::While)?;
        let test = self.parse_paren_head()?;
        self.eat(&Token::Semicolon);
        Ok(Node::new(
            NodeKind::DoWhile {
                body: Box::new(body),
                test: Box::new(test),
            },
            self.finish(start),
        ))
    }

    /// `for (init; test; update) body`, or a `for-in`/`for-of` loop.
    pub(super) fn parse_for(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        self.expect_token(Token::LParen)?;

        let init = if self.check(&Token::Semicolon) {
            None
        } else {
            self.no_in = true;
            let init = if matches!(self.peek(), Some(Token::Const | Token::Let | Token::Var)) {
                self.parse_var_declaration(true)
            } else {
                self.parse_expression()
            };
            self.no_in = false;
            Some(init?)
        };

        if let Some(left) = &init {
            let of = self.check_word("of");
            if of || self.check(&Token::In) {
                self.bump();
                let right = self.parse_expression()?;
                self.expect_closing(Token::RParen)?;
                let body = self.parse_statement()?;
                return Ok(Node::new(
                    NodeKind::ForIn {
                        left: Box::new(left.clone()),
                        right: Box::new(right),
                        body: Box::new(body),
                        of,
                    },
                    self.finish(start),
                ));
            }
        }

        self.expect_token(Token::Semicolon)?;
        let test = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect_token(Token::Semicolon)?;
        let update = if self.check(&Token::RParen) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect_closing(Token::RParen)?;
        let body = self.parse_statement()?;
        Ok(Node::new(
            NodeKind::For {
                init: init.map(Box::new),
                test,
                update,
                body: Box::new(body),
            },
            self.finish(start),
        ))
    }

    pub(super) fn parse_return(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let argument = if self.eof()
            || self.newline_before()
            || self.check(&Token::Semicolon)
            || self.check(&Token::RBrace)
        {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.consume_semicolon()?;
        Ok(Node::new(NodeKind::Return { argument }, self.finish(start)))
    }

    /// `break` and `continue`. Labels are not part of the language.
    pub(super) fn parse_jump(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        let kind = match self.peek() {
            Some(Token::Break) => NodeKind::Break,
            _ => NodeKind::Continue,
        };
        self.bump();
        if matches!(self.peek(), Some(Token::Id(_))) && !self.newline_before() {
            self.reject("Labels are not supported", |p| {
                p.bump();
            })?;
        }
        self.consume_semicolon()?;
        Ok(Node::new(kind, self.finish(start)))
    }

    pub(super) fn parse_throw(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Node::new(
            NodeKind::Throw {
                argument: Box::new(argument),
            },
            self.finish(start),
        ))
    }

    pub(super) fn parse_try(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let block = self.parse_block()?;

        let handler = if self.eat(&Token::Catch).is_some() {
            let param = if self.eat(&Token::LParen).is_some() {
                let param = self.expect_identifier()?;
                self.expect_closing(Token::RParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(Box::new(CatchClause { param, body }))
        } else {
            None
        };

        let finalizer = if self.eat(&Token::Finally).is_some() {
            Some(Box::new(self.parse_block()?))
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            self.reject("Missing catch or finally after try", |_| ())?;
        }

        Ok(Node::new(
            NodeKind::Try {
                block: Box::new(block),
                handler,
                finalizer,
            },
            self.finish(start),
        ))
    }

    pub(super) fn parse_switch(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let discriminant = self.parse_paren_head()?;
        self.expect_token(Token::LBrace)?;

        let mut cases = Vec::new();
        while !self.eof() && !self.check(&Token::RBrace) {
            let test = if self.eat(&Token::Case).is_some() {
                Some(self.parse_expression()?)
            } else if self.eat(&Token::Default).is_some() {
                None
            } else {
                self.reject("Expected case or default", |p| {
                    p.bump();
                })?;
                continue;
            };
            self.expect_token(Token::Colon)?;

            let mut consequent = Vec::new();
            while !self.eof() && !matches!(self.peek(), Some(Token::Case | Token::Default | Token::RBrace)) {
                let before = self.pos;
                consequent.push(self.parse_statement()?);
                if self.pos == before {
                    self.bump();
                }
            }
            cases.push(SwitchCase { test, consequent });
        }
        self.expect_closing(Token::RBrace)?;

        Ok(Node::new(
            NodeKind::Switch {
                discriminant: Box::new(discriminant),
                cases,
            },
            self.finish(start),
        ))
    }

    pub(super) fn parse_with(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let object = self.parse_paren_head()?;
        let body = self.parse_statement()?;
        Ok(Node::new(
            NodeKind::With {
                object: Box::new(object),
                body: Box::new(body),
            },
            self.finish(start),
        ))
    }
}

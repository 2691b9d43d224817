use super::{ParseResult, Parser};
use crate::ast::{Declarator, Node, NodeKind, VarKind};
use crate::token::Token;

impl<'a> Parser<'a> {
    /// `const`/`let`/`var` declarators, without the trailing semicolon.
    /// Inside a `for` head a `const` may omit its initializer when the loop
    /// turns out to be `for-in`/`for-of`.
    pub(super) fn parse_var_declaration(&mut self, in_for: bool) -> ParseResult<Node> {
        let start = self.cur_start();
        let kind = match self.peek() {
            Some(Token::Let) => VarKind::Let,
            Some(Token::Var) => VarKind::Var,
            _ => VarKind::Const,
        };
        self.bump();

        let mut declarations = Vec::new();
        loop {
            let d_start = self.cur_start();
            let id = self.parse_binding_target()?;
            let init = if self.eat(&Token::Assign).is_some() {
                Some(self.parse_assignment()?)
            } else {
                None
            };

            let loop_head = in_for && (self.check(&Token::In) || self.check_word("of"));
            if init.is_none() && kind == VarKind::Const && !loop_head {
                self.reject("Missing initializer in const declaration", |_| ())?;
            }

            let span = match &init {
                Some(init) => self.finish_with(d_start, &init.span),
                None => self.finish_with(d_start, &id.span),
            };
            declarations.push(Declarator { id, init, span });

            if self.eat(&Token::Comma).is_none() {
                break;
            }
        }

        Ok(Node::new(
            NodeKind::VariableDeclaration { kind, declarations },
            self.finish(start),
        ))
    }

    /// A declared name: an identifier, or an array/object pattern.
    pub(super) fn parse_binding_target(&mut self) -> ParseResult<Node> {
        if let Some(id) = self.identifier() {
            return Ok(id);
        }
        if matches!(self.peek(), Some(Token::LBracket | Token::LBrace)) {
            return self.parse_primary();
        }
        self.reject("Expected identifier", |p| p.placeholder())
    }

    /// Class bodies are skipped wholesale; classes are rejected later anyway.
    pub(super) fn parse_class(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let id = self.identifier().map(Box::new);
        if self.eat(&Token::Extends).is_some() {
            self.parse_postfix()?;
        }
        if !self.check(&Token::LBrace) {
            self.reject("Expected class body", |_| ())?;
            return Ok(Node::new(NodeKind::Class { id }, self.finish(start)));
        }
        match self.matching_close() {
            Some(close) => self.pos = close + 1,
            None => {
                self.reject("Unterminated class body", |p| p.pos = p.len)?;
            }
        }
        Ok(Node::new(NodeKind::Class { id }, self.finish(start)))
    }

    pub(super) fn parse_export(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();

        if self.eat(&Token::Default).is_some() {
            let declaration = match self.peek() {
                Some(Token::Function) => self.parse_function(false)?,
                Some(Token::Class) => self.parse_class()?,
                _ => {
                    let expr = self.parse_assignment()?;
                    self.consume_semicolon()?;
                    expr
                }
            };
            return Ok(Node::new(
                NodeKind::ExportDefault {
                    declaration: Box::new(declaration),
                },
                self.finish(start),
            ));
        }

        let declaration = match self.peek() {
            Some(Token::Const | Token::Let | Token::Var | Token::Function | Token::Class) => {
                Some(Box::new(self.parse_statement()?))
            }
            Some(Token::LBrace) => {
                match self.matching_close() {
                    Some(close) => self.pos = close + 1,
                    None => self.reject("Expected }", |p| p.pos = p.len)?,
                }
                if self.check_word("from") {
                    self.bump();
                    self.bump();
                }
                self.consume_semicolon()?;
                None
            }
            _ => {
                self.reject("Unexpected token after export", |_| ())?;
                None
            }
        };
        Ok(Node::new(NodeKind::ExportNamed { declaration }, self.finish(start)))
    }
}

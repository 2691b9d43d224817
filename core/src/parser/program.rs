use super::{ParseResult, Parser};
use crate::ast::{Node, NodeKind};
use crate::token::{Span, Token};

impl<'a> Parser<'a> {
    pub fn parse_program(&mut self) -> ParseResult<Node> {
        let body = self.parse_statement_list(false)?;
        Ok(Node::new(
            NodeKind::Program { body },
            Span::new(self.input_start, self.input_end),
        ))
    }

    /// Statements up to the end of input, or up to `}` inside a block.
    pub(super) fn parse_statement_list(&mut self, in_block: bool) -> ParseResult<Vec<Node>> {
        let mut body = Vec::new();
        while !self.eof() {
            if in_block && self.check(&Token::RBrace) {
                break;
            }
            if self.lenient && self.cannot_start_statement() {
                self.bump();
                continue;
            }
            let before = self.pos;
            let stmt = self.parse_statement()?;
            body.push(stmt);
            if self.lenient && self.pos == before {
                self.bump();
            }
        }
        Ok(body)
    }

    /// Tokens the lenient parser skips at statement position.
    fn cannot_start_statement(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::RParen
                    | Token::RBracket
                    | Token::RBrace
                    | Token::Else
                    | Token::Catch
                    | Token::Finally
                    | Token::Case
                    | Token::Extends
                    | Token::Colon
                    | Token::Comma
                    | Token::Arrow
                    | Token::Invalid(_)
            )
        )
    }

    pub(super) fn parse_statement(&mut self) -> ParseResult<Node> {
        self.nested(|p| p.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Node> {
        let Some(tok) = self.peek() else {
            return self.reject("Unexpected end of input", |p| p.placeholder());
        };
        match tok {
            Token::LBrace => self.parse_block(),
            Token::Semicolon => {
                let span = self.bump();
                Ok(Node::new(NodeKind::Empty, span))
            }
            Token::Const | Token::Let | Token::Var => {
                let start = self.cur_start();
                let node = self.parse_var_declaration(false)?;
                self.consume_semicolon()?;
                Ok(Node::new(node.kind, self.finish(start)))
            }
            Token::Function => self.parse_function(true),
            Token::If => self.parse_if(),
            Token::While => self.parse_while(),
            Token::Do => self.parse_do_while(),
            Token::For => self.parse_for(),
            Token::Return => self.parse_return(),
            Token::Break | Token::Continue => self.parse_jump(),
            Token::Throw => self.parse_throw(),
            Token::Try => self.parse_try(),
            Token::Switch => self.parse_switch(),
            Token::With => self.parse_with(),
            Token::Class => self.parse_class(),
            Token::Import => self.parse_import(),
            Token::Export => self.parse_export(),
            Token::Debugger => {
                let start = self.cur_start();
                self.bump();
                self.consume_semicolon()?;
                Ok(Node::new(NodeKind::Debugger, self.finish(start)))
            }
            _ => self.parse_expression_statement(),
        }
    }

    pub(super) fn parse_block(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.expect_token(Token::LBrace)?;
        self.block_depth += 1;
        let body = self.parse_statement_list(true);
        self.block_depth -= 1;
        let body = body?;
        self.expect_closing(Token::RBrace)?;
        Ok(Node::new(NodeKind::Block { body }, self.finish(start)))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;
        let span = self.finish_with(start, &expression.span);
        Ok(Node::new(
            NodeKind::Expression {
                expression: Box::new(expression),
            },
            span,
        ))
    }
}

use super::{ParseResult, Parser};
use crate::ast::{ImportSpecifier, LiteralValue, Node, NodeKind, SpecifierKind};
use crate::token::Token;

impl<'a> Parser<'a> {
    /// Import statement
    /// - `import { a, b as c } from "module";`
    /// - `import d from "module";`, `import * as ns from "module";`
    /// - `import "module";`
    pub(super) fn parse_import(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        if self.block_depth > 0 {
            self.reject("'import' may only appear at the top level", |_| ())?;
        }
        self.bump();

        let mut specifiers = Vec::new();
        if !matches!(self.peek(), Some(Token::Str { .. })) {
            if let Some(local) = self.identifier() {
                specifiers.push(ImportSpecifier {
                    kind: SpecifierKind::Default,
                    imported: None,
                    span: local.span,
                    local,
                });
                if self.eat(&Token::Comma).is_none() && !self.check_word("from") {
                    self.reject("Expected from", |_| ())?;
                }
            }
            if self.check(&Token::Mul) {
                specifiers.push(self.parse_namespace_specifier()?);
            } else if self.eat(&Token::LBrace).is_some() {
                self.parse_named_specifiers(&mut specifiers)?;
            }

            if self.check_word("from") {
                self.bump();
            } else {
                self.reject("Expected from", |_| ())?;
            }
        }

        let source = match self.peek() {
            Some(Token::Str { value, raw, .. }) => {
                let span = self.bump();
                Node::new(
                    NodeKind::Literal {
                        value: LiteralValue::Str(value.clone()),
                        raw: raw.clone(),
                    },
                    span,
                )
            }
            _ => self.reject("Expected module name", |p| p.placeholder())?,
        };
        self.consume_semicolon()?;

        Ok(Node::new(
            NodeKind::Import {
                specifiers,
                source: Box::new(source),
            },
            self.finish(start),
        ))
    }

    fn parse_namespace_specifier(&mut self) -> ParseResult<ImportSpecifier> {
        let start = self.cur_start();
        self.bump();
        if self.check_word("as") {
            self.bump();
        } else {
            self.reject("Expected as", |_| ())?;
        }
        let local = self.expect_identifier()?;
        Ok(ImportSpecifier {
            kind: SpecifierKind::Namespace,
            imported: None,
            local,
            span: self.finish(start),
        })
    }

    fn parse_named_specifiers(&mut self, specifiers: &mut Vec<ImportSpecifier>) -> ParseResult<()> {
        while !self.eof() && !self.check(&Token::RBrace) {
            let start = self.cur_start();
            let imported = match self.property_name() {
                Some(name) => name,
                None => {
                    self.reject("Expected identifier", |_| ())?;
                    break;
                }
            };
            let local = if self.check_word("as") {
                self.bump();
                self.expect_identifier()?
            } else {
                imported.clone()
            };
            specifiers.push(ImportSpecifier {
                kind: SpecifierKind::Named,
                imported: Some(imported),
                local,
                span: self.finish(start),
            });

            match self.eat(&Token::Comma) {
                Some(comma) => {
                    if self.note_trailing_comma(comma, &Token::RBrace) {
                        break;
                    }
                }
                None => break,
            }
        }
        self.expect_closing(Token::RBrace)?;
        Ok(())
    }
}

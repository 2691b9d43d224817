use super::{ParseResult, Parser};
use crate::ast::{LiteralValue, Node, NodeKind};
use crate::token::{Span, Token};

impl<'a> Parser<'a> {
    /// Comma-separated expressions, folded into a sequence when more than one.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Node> {
        let first = self.parse_assignment()?;
        if !self.check(&Token::Comma) {
            return Ok(first);
        }
        let start = first.span.start;
        let mut expressions = vec![first];
        while self.eat(&Token::Comma).is_some() {
            expressions.push(self.parse_assignment()?);
        }
        let last = expressions.last().map(|e| e.span).unwrap_or_default();
        Ok(Node::new(NodeKind::Sequence { expressions }, self.finish_with(start, &last)))
    }

    /// Assignment
    /// - `target = value`, `target op= value` (right associative)
    /// - falls through to conditional expressions
    pub(super) fn parse_assignment(&mut self) -> ParseResult<Node> {
        self.nested(|p| p.parse_assignment_inner())
    }

    fn parse_assignment_inner(&mut self) -> ParseResult<Node> {
        let left = self.parse_conditional()?;
        let operator = match self.peek() {
            Some(tok) if tok.is_assignment() => tok.as_operator().unwrap_or("="),
            _ => return Ok(left),
        };

        let valid_target = matches!(
            left.kind,
            NodeKind::Identifier { .. } | NodeKind::Member { .. } | NodeKind::Array { .. } | NodeKind::Object { .. }
        );
        if !valid_target {
            self.reject("Invalid assignment target", |_| ())?;
        }
        self.bump();

        let right = self.parse_assignment()?;
        let span = self.finish_with(left.span.start, &right.span);
        Ok(Node::new(
            NodeKind::Assignment {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        ))
    }

    /// Conditional
    /// - `test ? consequent : alternate`
    fn parse_conditional(&mut self) -> ParseResult<Node> {
        let test = self.parse_binary(0)?;
        if self.eat(&Token::Question).is_none() {
            return Ok(test);
        }

        let saved = self.no_in;
        self.no_in = false;
        let consequent = self.parse_assignment();
        self.no_in = saved;
        let consequent = consequent?;

        self.expect_token(Token::Colon)?;
        let alternate = self.parse_assignment()?;
        let span = self.finish_with(test.span.start, &alternate.span);
        Ok(Node::new(
            NodeKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        ))
    }

    /// Binary and logical operators by precedence climbing
    /// - `||` `??`, `&&`, `|`, `^`, `&`
    /// - `==` `!=` `===` `!==`, `<` `>` `<=` `>=` `in` `instanceof`
    /// - `<<` `>>` `>>>`, `+` `-`, `*` `/` `%`, `**` (right associative)
    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Node> {
        let mut left = self.parse_unary()?;
        loop {
            let Some(tok) = self.peek() else {
                break;
            };
            let Some(prec) = tok.binary_precedence() else {
                break;
            };
            if prec <= min_prec || (self.no_in && matches!(tok, Token::In)) {
                break;
            }
            let operator = tok.as_operator().unwrap_or("?");
            let logical = matches!(tok, Token::And | Token::Or | Token::Nullish);
            self.bump();

            let right = if operator == "**" {
                self.parse_binary(prec - 1)?
            } else {
                self.parse_binary(prec)?
            };
            let span = self.finish_with(left.span.start, &right.span);
            let (left_box, right_box) = (Box::new(left), Box::new(right));
            let kind = if logical {
                NodeKind::Logical {
                    operator,
                    left: left_box,
                    right: right_box,
                }
            } else {
                NodeKind::Binary {
                    operator,
                    left: left_box,
                    right: right_box,
                }
            };
            left = Node::new(kind, span);
        }
        Ok(left)
    }

    /// Unary
    /// - `!x`, `-x`, `+x`, `~x`, `typeof x`, `void x`, `delete x`
    /// - `++x`, `--x`, and postfix `x++`, `x--`
    fn parse_unary(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        match self.peek() {
            Some(
                tok @ (Token::Not
                | Token::Sub
                | Token::Add
                | Token::BitNot
                | Token::Typeof
                | Token::Void
                | Token::Delete),
            ) => {
                let operator = tok.as_operator().unwrap_or("?");
                self.bump();
                let argument = self.nested(|p| p.parse_unary())?;
                let span = self.finish_with(start, &argument.span);
                Ok(Node::new(
                    NodeKind::Unary {
                        operator,
                        argument: Box::new(argument),
                    },
                    span,
                ))
            }
            Some(tok @ (Token::Inc | Token::Dec)) => {
                let operator = tok.as_operator().unwrap_or("?");
                self.bump();
                let argument = self.nested(|p| p.parse_unary())?;
                let span = self.finish_with(start, &argument.span);
                Ok(Node::new(
                    NodeKind::Update {
                        operator,
                        prefix: true,
                        argument: Box::new(argument),
                    },
                    span,
                ))
            }
            _ => {
                let expr = self.parse_postfix()?;
                match self.peek() {
                    Some(tok @ (Token::Inc | Token::Dec)) if !self.newline_before() => {
                        let operator = tok.as_operator().unwrap_or("?");
                        self.bump();
                        let span = self.finish(start);
                        Ok(Node::new(
                            NodeKind::Update {
                                operator,
                                prefix: false,
                                argument: Box::new(expr),
                            },
                            span,
                        ))
                    }
                    _ => Ok(expr),
                }
            }
        }
    }

    /// Member access and calls
    /// - `a.b`, `a[b]`, `f(x, ...ys)`, `new C(x)`
    pub(super) fn parse_postfix(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        let mut expr = if self.check(&Token::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            match self.peek() {
                Some(Token::Dot) => expr = self.parse_dot_member(expr)?,
                Some(Token::LBracket) => expr = self.parse_index_member(expr)?,
                Some(Token::LParen) => {
                    self.bump();
                    let arguments = self.parse_arguments()?;
                    expr = Node::new(
                        NodeKind::Call {
                            callee: Box::new(expr),
                            arguments,
                        },
                        self.finish(start),
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_dot_member(&mut self, object: Node) -> ParseResult<Node> {
        self.bump();
        let property = match self.property_name() {
            Some(name) => name,
            None => self.reject("Expected property name", |p| p.placeholder())?,
        };
        let span = self.finish_with(object.span.start, &property.span);
        Ok(Node::new(
            NodeKind::Member {
                object: Box::new(object),
                property: Box::new(property),
                computed: false,
            },
            span,
        ))
    }

    fn parse_index_member(&mut self, object: Node) -> ParseResult<Node> {
        self.bump();
        let property = self.parse_expression()?;
        self.expect_closing(Token::RBracket)?;
        let span = self.finish_with(object.span.start, &property.span);
        Ok(Node::new(
            NodeKind::Member {
                object: Box::new(object),
                property: Box::new(property),
                computed: true,
            },
            span,
        ))
    }

    fn parse_new(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let mut callee = if self.check(&Token::New) {
            self.nested(|p| p.parse_new())?
        } else {
            self.parse_primary()?
        };
        loop {
            match self.peek() {
                Some(Token::Dot) => callee = self.parse_dot_member(callee)?,
                Some(Token::LBracket) => callee = self.parse_index_member(callee)?,
                _ => break,
            }
        }
        let arguments = if self.eat(&Token::LParen).is_some() {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(Node::new(
            NodeKind::New {
                callee: Box::new(callee),
                arguments,
            },
            self.finish(start),
        ))
    }

    /// Call arguments after `(`, through the closing `)`.
    fn parse_arguments(&mut self) -> ParseResult<Vec<Node>> {
        let mut arguments = Vec::new();
        while !self.eof() && !self.check(&Token::RParen) {
            let before = self.pos;
            arguments.push(self.parse_spread_or_assignment()?);
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
        Ok(arguments)
    }

    fn parse_spread_or_assignment(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        if self.eat(&Token::Ellipsis).is_some() {
            let argument = self.parse_assignment()?;
            let span = self.finish_with(start, &argument.span);
            return Ok(Node::new(
                NodeKind::Spread {
                    argument: Box::new(argument),
                },
                span,
            ));
        }
        self.parse_assignment()
    }

    pub(super) fn parse_primary(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        let Some(tok) = self.peek() else {
            return self.reject("Unexpected end of input", |p| p.placeholder());
        };
        match tok {
            Token::Id(name) => {
                if matches!(self.peek_ahead(1), Some(Token::Arrow)) {
                    return self.parse_arrow();
                }
                let span = self.bump();
                Ok(Node::new(NodeKind::Identifier { name: name.clone() }, span))
            }
            Token::Num(value) => {
                let span = self.bump();
                let raw = self.source_text(&span).to_string();
                Ok(Node::new(
                    NodeKind::Literal {
                        value: LiteralValue::Num(*value),
                        raw,
                    },
                    span,
                ))
            }
            Token::Str { value, raw, .. } => {
                let span = self.bump();
                Ok(Node::new(
                    NodeKind::Literal {
                        value: LiteralValue::Str(value.clone()),
                        raw: raw.clone(),
                    },
                    span,
                ))
            }
            Token::Bool(value) => {
                let span = self.bump();
                let raw = value.to_string();
                Ok(Node::new(
                    NodeKind::Literal {
                        value: LiteralValue::Bool(*value),
                        raw,
                    },
                    span,
                ))
            }
            Token::Null => {
                let span = self.bump();
                Ok(Node::new(
                    NodeKind::Literal {
                        value: LiteralValue::Null,
                        raw: "null".to_string(),
                    },
                    span,
                ))
            }
            Token::Template { interpolations, .. } => {
                let span = self.bump();
                Ok(Node::new(
                    NodeKind::Template {
                        interpolations: interpolations.clone(),
                    },
                    span,
                ))
            }
            Token::This => {
                let span = self.bump();
                Ok(Node::new(NodeKind::This, span))
            }
            Token::LParen => {
                if self.at_arrow_params() {
                    return self.parse_arrow();
                }
                self.bump();
                if self.check(&Token::RParen) {
                    return self.reject("Unexpected token", |p| {
                        p.bump();
                        Node::malformed(Span::single(start))
                    });
                }
                let saved = self.no_in;
                self.no_in = false;
                let inner = self.parse_expression();
                self.no_in = saved;
                let inner = inner?;
                self.expect_closing(Token::RParen)?;
                Ok(inner)
            }
            Token::LBracket => self.parse_array(),
            Token::LBrace => self.parse_object(),
            Token::Function => self.parse_function(false),
            Token::Invalid(_) => self.reject("Unexpected character", |p| {
                let span = p.bump();
                Node::malformed(span)
            }),
            _ => self.reject("Unexpected token", |p| p.placeholder()),
        }
    }

    /// Array literal, elisions kept as `None`.
    fn parse_array(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let mut elements = Vec::new();
        while !self.eof() && !self.check(&Token::RBracket) {
            if self.eat(&Token::Comma).is_some() {
                elements.push(None);
                continue;
            }
            let before = self.pos;
            elements.push(Some(self.parse_spread_or_assignment()?));
            match self.eat(&Token::Comma) {
                Some(comma) => {
                    if self.note_trailing_comma(comma, &Token::RBracket) {
                        break;
                    }
                }
                None => break,
            }
            if self.lenient && self.pos == before {
                break;
            }
        }
        self.expect_closing(Token::RBracket)?;
        Ok(Node::new(NodeKind::Array { elements }, self.finish(start)))
    }

    fn parse_object(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        self.bump();
        let mut properties = Vec::new();
        while !self.eof() && !self.check(&Token::RBrace) {
            let before = self.pos;
            properties.push(self.parse_property()?);
            match self.eat(&Token::Comma) {
                Some(comma) => {
                    if self.note_trailing_comma(comma, &Token::RBrace) {
                        break;
                    }
                }
                None => break,
            }
            if self.lenient && self.pos == before {
                break;
            }
        }
        self.expect_closing(Token::RBrace)?;
        Ok(Node::new(NodeKind::Object { properties }, self.finish(start)))
    }

    fn parse_property(&mut self) -> ParseResult<Node> {
        let start = self.cur_start();
        if self.check(&Token::Ellipsis) {
            self.reject("Unexpected token", |_| ())?;
            return self.parse_spread_or_assignment();
        }

        let (key, computed) = if self.eat(&Token::LBracket).is_some() {
            let key = self.parse_assignment()?;
            self.expect_closing(Token::RBracket)?;
            (key, true)
        } else if matches!(self.peek(), Some(Token::Str { .. } | Token::Num(_))) {
            (self.parse_primary()?, false)
        } else {
            match self.property_name() {
                Some(name) => (name, false),
                None => (self.reject("Expected property name", |p| p.placeholder())?, false),
            }
        };

        let (value, shorthand) = if self.eat(&Token::Colon).is_some() {
            (self.parse_assignment()?, false)
        } else if self.check(&Token::LParen) {
            let fn_start = self.cur_start();
            self.bump();
            let params = self.parse_params()?;
            let body = self.parse_block()?;
            let method = Node::new(
                NodeKind::FunctionExpression {
                    id: None,
                    params,
                    body: Box::new(body),
                },
                self.finish(fn_start),
            );
            (method, false)
        } else if matches!(key.kind, NodeKind::Identifier { .. })
            && !computed
            && matches!(self.peek(), Some(Token::Comma | Token::RBrace))
        {
            (key.clone(), true)
        } else {
            (self.reject("Expected ':'", |p| p.placeholder())?, false)
        };

        let span = self.finish_with(start, &value.span);
        Ok(Node::new(
            NodeKind::Property {
                key: Box::new(key),
                value: Box::new(value),
                computed,
                shorthand,
            },
            span,
        ))
    }
}

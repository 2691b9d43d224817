use crate::token::{ParseError, Position, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,                      // (
    RParen,                      // )
    LBrace,                      // {
    RBrace,                      // }
    LBracket,                    // [
    RBracket,                    // ]
    Dot,                         // .
    Ellipsis,                    // ...
    Colon,                       // :
    Comma,                       // ,
    Semicolon,                   // ;
    Question,                    // ?
    Arrow,                       // =>
    Assign,                      // =
    CompoundAssign(&'static str), // += -= *= /= %= **= <<= >>= >>>= &= |= ^= &&= ||= ??=
    Eq,                          // ==
    StrictEq,                    // ===
    Ne,                          // !=
    StrictNe,                    // !==
    Gt,                          // >
    Lt,                          // <
    Ge,                          // >=
    Le,                          // <=
    And,                         // &&
    Or,                          // ||
    Nullish,                     // ??
    Not,                         // !
    Add,                         // +
    Sub,                         // -
    Mul,                         // *
    Div,                         // /
    Mod,                         // %
    Exp,                         // **
    BitAnd,                      // &
    BitOr,                       // |
    BitXor,                      // ^
    BitNot,                      // ~
    Shl,                         // <<
    Shr,                         // >>
    UShr,                        // >>>
    Inc,                         // ++
    Dec,                         // --
    // Declarations
    Const,    // const
    Let,      // let
    Var,      // var
    Function, // function
    Class,    // class
    Extends,  // extends
    // Control flow
    Return,   // return
    If,       // if
    Else,     // else
    While,    // while
    For,      // for
    Do,       // do
    Break,    // break
    Continue, // continue
    Switch,   // switch
    Case,     // case
    Default,  // default
    Try,      // try
    Catch,    // catch
    Finally,  // finally
    Throw,    // throw
    With,     // with
    Debugger, // debugger
    // Modules
    Import, // import
    Export, // export
    // Expression keywords
    New,        // new
    This,       // this
    Typeof,     // typeof
    Void,       // void
    Delete,     // delete
    In,         // in
    Instanceof, // instanceof
    Null,       // null
    Bool(bool), // true, false
    Num(f64),   // 1, 1.5, 0x1f
    Str {
        value: String,
        raw: String,
        terminated: bool,
    }, // "abc", 'abc'
    Template {
        raw: String,
        interpolations: Vec<Span>,
        terminated: bool,
    }, // `a ${b} c`
    Id(String),    // identifier
    Invalid(char), // only produced in lenient mode
}

impl Token {
    /// Source text of operator and punctuation tokens.
    pub fn as_operator(&self) -> Option<&'static str> {
        let s = match self {
            Token::Assign => "=",
            Token::CompoundAssign(op) => op,
            Token::Eq => "==",
            Token::StrictEq => "===",
            Token::Ne => "!=",
            Token::StrictNe => "!==",
            Token::Gt => ">",
            Token::Lt => "<",
            Token::Ge => ">=",
            Token::Le => "<=",
            Token::And => "&&",
            Token::Or => "||",
            Token::Nullish => "??",
            Token::Not => "!",
            Token::Add => "+",
            Token::Sub => "-",
            Token::Mul => "*",
            Token::Div => "/",
            Token::Mod => "%",
            Token::Exp => "**",
            Token::BitAnd => "&",
            Token::BitOr => "|",
            Token::BitXor => "^",
            Token::BitNot => "~",
            Token::Shl => "<<",
            Token::Shr => ">>",
            Token::UShr => ">>>",
            Token::Inc => "++",
            Token::Dec => "--",
            Token::In => "in",
            Token::Instanceof => "instanceof",
            Token::Typeof => "typeof",
            Token::Void => "void",
            Token::Delete => "delete",
            _ => return None,
        };
        Some(s)
    }

    /// Binary operator precedence, higher binds tighter.
    pub fn binary_precedence(&self) -> Option<u8> {
        let prec = match self {
            Token::Or | Token::Nullish => 1,
            Token::And => 2,
            Token::BitOr => 3,
            Token::BitXor => 4,
            Token::BitAnd => 5,
            Token::Eq | Token::Ne | Token::StrictEq | Token::StrictNe => 6,
            Token::Lt | Token::Gt | Token::Le | Token::Ge | Token::In | Token::Instanceof => 7,
            Token::Shl | Token::Shr | Token::UShr => 8,
            Token::Add | Token::Sub => 9,
            Token::Mul | Token::Div | Token::Mod => 10,
            Token::Exp => 11,
            _ => return None,
        };
        Some(prec)
    }

    /// Source text of a keyword token, for keywords used as property names.
    pub fn keyword_name(&self) -> Option<&'static str> {
        KEYWORDS.iter().find(|(_, t)| t == self).map(|(w, _)| *w)
    }

    pub fn is_assignment(&self) -> bool {
        matches!(self, Token::Assign | Token::CompoundAssign(_))
    }
}

const KEYWORDS: &[(&str, Token)] = &[
    ("const", Token::Const),
    ("let", Token::Let),
    ("var", Token::Var),
    ("function", Token::Function),
    ("class", Token::Class),
    ("extends", Token::Extends),
    ("return", Token::Return),
    ("if", Token::If),
    ("else", Token::Else),
    ("while", Token::While),
    ("for", Token::For),
    ("do", Token::Do),
    ("break", Token::Break),
    ("continue", Token::Continue),
    ("switch", Token::Switch),
    ("case", Token::Case),
    ("default", Token::Default),
    ("try", Token::Try),
    ("catch", Token::Catch),
    ("finally", Token::Finally),
    ("throw", Token::Throw),
    ("with", Token::With),
    ("debugger", Token::Debugger),
    ("import", Token::Import),
    ("export", Token::Export),
    ("new", Token::New),
    ("this", Token::This),
    ("typeof", Token::Typeof),
    ("void", Token::Void),
    ("delete", Token::Delete),
    ("in", Token::In),
    ("instanceof", Token::Instanceof),
    ("null", Token::Null),
    ("true", Token::Bool(true)),
    ("false", Token::Bool(false)),
];

fn keyword(word: &str) -> Option<Token> {
    KEYWORDS.iter().find(|(w, _)| *w == word).map(|(_, t)| t.clone())
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

/// Punctuators, longest first so that greedy matching works.
const PUNCTUATORS: &[(&str, Token)] = &[
    (">>>=", Token::CompoundAssign(">>>=")),
    ("...", Token::Ellipsis),
    ("===", Token::StrictEq),
    ("!==", Token::StrictNe),
    ("**=", Token::CompoundAssign("**=")),
    ("<<=", Token::CompoundAssign("<<=")),
    (">>=", Token::CompoundAssign(">>=")),
    (">>>", Token::UShr),
    ("&&=", Token::CompoundAssign("&&=")),
    ("||=", Token::CompoundAssign("||=")),
    ("??=", Token::CompoundAssign("??=")),
    ("=>", Token::Arrow),
    ("==", Token::Eq),
    ("!=", Token::Ne),
    (">=", Token::Ge),
    ("<=", Token::Le),
    ("&&", Token::And),
    ("||", Token::Or),
    ("??", Token::Nullish),
    ("**", Token::Exp),
    ("<<", Token::Shl),
    (">>", Token::Shr),
    ("++", Token::Inc),
    ("--", Token::Dec),
    ("+=", Token::CompoundAssign("+=")),
    ("-=", Token::CompoundAssign("-=")),
    ("*=", Token::CompoundAssign("*=")),
    ("/=", Token::CompoundAssign("/=")),
    ("%=", Token::CompoundAssign("%=")),
    ("&=", Token::CompoundAssign("&=")),
    ("|=", Token::CompoundAssign("|=")),
    ("^=", Token::CompoundAssign("^=")),
    ("(", Token::LParen),
    (")", Token::RParen),
    ("{", Token::LBrace),
    ("}", Token::RBrace),
    ("[", Token::LBracket),
    ("]", Token::RBracket),
    (".", Token::Dot),
    (":", Token::Colon),
    (",", Token::Comma),
    (";", Token::Semicolon),
    ("?", Token::Question),
    ("=", Token::Assign),
    (">", Token::Gt),
    ("<", Token::Lt),
    ("!", Token::Not),
    ("+", Token::Add),
    ("-", Token::Sub),
    ("*", Token::Mul),
    ("/", Token::Div),
    ("%", Token::Mod),
    ("&", Token::BitAnd),
    ("|", Token::BitOr),
    ("^", Token::BitXor),
    ("~", Token::BitNot),
];

/// Tokens with spans aligned by index.
pub type SpannedTokens = (Vec<Token>, Vec<Span>);

/// [chars] and [idx] can be used for syntax error reporting.
pub struct Tokenizer<'a> {
    input: &'a str,
    chars: Vec<char>,
    idx: usize,
    len: usize,
    line: u32,
    column: u32,
    offset: usize,
    lenient: bool,
    pub tokens: Vec<Token>,
    pub token_spans: Vec<Span>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str, first_line: u32, lenient: bool) -> Self {
        let chars: Vec<char> = input.chars().collect();
        Self {
            input,
            len: chars.len(),
            chars,
            idx: 0,
            line: first_line,
            column: 0,
            offset: 0,
            lenient,
            tokens: Vec::with_capacity(input.len() / 4),
            token_spans: Vec::with_capacity(input.len() / 4),
        }
    }

    /// Tokenize, failing on the first lexical error.
    pub fn tokenize(s: &str, first_line: u32) -> Result<SpannedTokens, ParseError> {
        let mut t = Tokenizer::new(s, first_line, false);
        t.run()?;
        Ok((t.tokens, t.token_spans))
    }

    /// Tokenize without ever failing: unterminated literals are flagged on the
    /// token and unknown characters become [`Token::Invalid`].
    pub fn tokenize_lenient(s: &str, first_line: u32) -> SpannedTokens {
        let mut t = Tokenizer::new(s, first_line, true);
        // lenient mode never produces an error
        let _ = t.run();
        (t.tokens, t.token_spans)
    }

    pub fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    fn error(&self, msg: &str) -> ParseError {
        ParseError::with_position(msg.to_string(), self.current_position())
    }

    fn eof(&self) -> bool {
        self.idx >= self.len
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.idx + n).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn advance_char(&mut self) {
        let Some(c) = self.peek() else {
            return;
        };
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += c.len_utf16() as u32;
        }
        self.offset += c.len_utf8();
        self.idx += 1;
    }

    fn push_with_span(&mut self, token: Token, start: Position) {
        let end = self.current_position();
        self.tokens.push(token);
        self.token_spans.push(Span::new(start, end));
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while !self.eof() {
            let c = self.chars[self.idx];
            if c.is_whitespace() || c == '\u{feff}' {
                self.advance_char();
                continue;
            }
            if self.starts_with("//") {
                self.skip_line_comment();
                continue;
            }
            if self.starts_with("/*") {
                self.skip_block_comment()?;
                continue;
            }

            let start = self.current_position();
            if c == '"' || c == '\'' {
                self.parse_str(c)?;
            } else if c == '`' {
                self.parse_template()?;
            } else if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit())) {
                self.parse_number()?;
            } else if is_ident_start(c) {
                let mut word = String::new();
                while let Some(ch) = self.peek() {
                    if !is_ident_continue(ch) {
                        break;
                    }
                    word.push(ch);
                    self.advance_char();
                }
                let token = keyword(&word).unwrap_or(Token::Id(word));
                self.push_with_span(token, start);
            } else if let Some((text, token)) = PUNCTUATORS.iter().find(|(p, _)| self.starts_with(p)) {
                for _ in 0..text.chars().count() {
                    self.advance_char();
                }
                self.push_with_span(token.clone(), start);
            } else if self.lenient {
                self.advance_char();
                self.push_with_span(Token::Invalid(c), start);
            } else {
                return Err(self.error(&format!("Unexpected character '{}'", c)));
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance_char();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.current_position();
        self.advance_char();
        self.advance_char();
        while !self.eof() {
            if self.starts_with("*/") {
                self.advance_char();
                self.advance_char();
                return Ok(());
            }
            self.advance_char();
        }
        if self.lenient {
            return Ok(());
        }
        Err(ParseError::with_position("Unterminated comment".to_string(), start))
    }

    fn parse_str(&mut self, quote: char) -> Result<(), ParseError> {
        let start = self.current_position();
        let start_offset = self.offset;
        let mut value = String::new();
        self.advance_char(); // opening quote

        let mut terminated = false;
        while let Some(c) = self.peek() {
            if c == quote {
                self.advance_char();
                terminated = true;
                break;
            }
            if c == '\n' {
                break;
            }
            if c == '\\' {
                self.advance_char();
                let Some(escaped) = self.peek() else {
                    break;
                };
                match escaped {
                    'n' => value.push('\n'),
                    'r' => value.push('\r'),
                    't' => value.push('\t'),
                    'b' => value.push('\u{8}'),
                    'f' => value.push('\u{c}'),
                    'v' => value.push('\u{b}'),
                    '0' => value.push('\0'),
                    '\n' => {}
                    other => value.push(other),
                }
                self.advance_char();
                continue;
            }
            value.push(c);
            self.advance_char();
        }

        if !terminated && !self.lenient {
            return Err(ParseError::with_position("Unterminated string constant".to_string(), start));
        }
        let raw = self.input[start_offset..self.offset].to_string();
        self.push_with_span(Token::Str { value, raw, terminated }, start);
        Ok(())
    }

    fn parse_template(&mut self) -> Result<(), ParseError> {
        let start = self.current_position();
        let start_offset = self.offset;
        self.advance_char(); // opening backtick

        let mut interpolations = Vec::new();
        let mut terminated = false;
        while let Some(c) = self.peek() {
            if c == '`' {
                self.advance_char();
                terminated = true;
                break;
            }
            if c == '\\' {
                self.advance_char();
                self.advance_char();
                continue;
            }
            if c == '$' && self.peek_at(1) == Some('{') {
                self.advance_char();
                self.advance_char();
                if let Some(span) = self.scan_interpolation() {
                    interpolations.push(span);
                }
                continue;
            }
            self.advance_char();
        }

        if !terminated && !self.lenient {
            return Err(ParseError::with_position("Unterminated template".to_string(), start));
        }
        let raw = self.input[start_offset..self.offset].to_string();
        self.push_with_span(
            Token::Template {
                raw,
                interpolations,
                terminated,
            },
            start,
        );
        Ok(())
    }

    /// Consume the body of `${ ... }` up to and including the closing brace,
    /// returning the span of its trimmed contents.
    fn scan_interpolation(&mut self) -> Option<Span> {
        let mut depth = 1usize;
        let mut first: Option<Position> = None;
        let mut last_end: Option<Position> = None;
        while let Some(c) = self.peek() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance_char();
                        break;
                    }
                }
                _ => {}
            }
            if c.is_whitespace() {
                self.advance_char();
                continue;
            }
            if first.is_none() {
                first = Some(self.current_position());
            }
            self.advance_char();
            last_end = Some(self.current_position());
        }
        match (first, last_end) {
            (Some(s), Some(e)) => Some(Span::new(s, e)),
            _ => None,
        }
    }

    fn parse_number(&mut self) -> Result<(), ParseError> {
        let start = self.current_position();
        let start_offset = self.offset;

        let radix = match (self.peek(), self.peek_at(1)) {
            (Some('0'), Some('x' | 'X')) => 16,
            (Some('0'), Some('o' | 'O')) => 8,
            (Some('0'), Some('b' | 'B')) => 2,
            _ => 10,
        };

        let value = if radix != 10 {
            self.advance_char();
            self.advance_char();
            let digits_start = self.offset;
            while self.peek().is_some_and(|c| c.is_digit(radix) || c == '_') {
                self.advance_char();
            }
            let digits: String = self.input[digits_start..self.offset].chars().filter(|c| *c != '_').collect();
            u64::from_str_radix(&digits, radix).ok().map(|v| v as f64)
        } else {
            while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                self.advance_char();
            }
            if self.peek() == Some('.') {
                self.advance_char();
                while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                    self.advance_char();
                }
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let sign = matches!(self.peek_at(1), Some('+' | '-'));
                let digit_at = if sign { 2 } else { 1 };
                if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    for _ in 0..=digit_at {
                        self.advance_char();
                    }
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.advance_char();
                    }
                }
            }
            let text: String = self.input[start_offset..self.offset].chars().filter(|c| *c != '_').collect();
            text.parse::<f64>().ok()
        };

        if self.peek().is_some_and(is_ident_start) && !self.lenient {
            return Err(self.error("Identifier directly after number"));
        }

        match value {
            Some(v) => {
                self.push_with_span(Token::Num(v), start);
                Ok(())
            }
            None if self.lenient => {
                self.push_with_span(Token::Num(f64::NAN), start);
                Ok(())
            }
            None => Err(ParseError::with_position("Invalid number".to_string(), start)),
        }
    }
}

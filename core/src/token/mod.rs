mod error;
mod lexer;

pub use error::{ParseError, Position, Span, end_position, offset_to_position};
pub use lexer::{SpannedTokens, Token, Tokenizer};

use std::fmt;

use serde::Serialize;

/// Language level a document is checked against. Later chapters unlock
/// more syntax and more builtins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Chapter {
    #[default]
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Chapter {
    pub const ALL: [Chapter; 4] = [Chapter::One, Chapter::Two, Chapter::Three, Chapter::Four];

    pub fn from_number(n: u64) -> Option<Self> {
        match n {
            1 => Some(Chapter::One),
            2 => Some(Chapter::Two),
            3 => Some(Chapter::Three),
            4 => Some(Chapter::Four),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based position, for per-chapter tables.
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Label attached to every diagnostic as its source.
    pub fn label(self) -> String {
        format!("Source {}", self.number())
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

//! Coordinate conversion at the protocol boundary.
//!
//! The analysis numbers lines from `1 + prepend` and counts columns in
//! UTF-16 units; the protocol numbers lines from 0 and counts columns the
//! same way. Only lines need shifting.

use source_core::token::{Position as CorePosition, Span};
use tower_lsp::lsp_types::{Position, Range};

pub fn to_core_position(pos: Position, prepend: u32) -> CorePosition {
    CorePosition::at(pos.line + 1 + prepend, pos.character)
}

pub fn to_lsp_position(pos: CorePosition, prepend: u32) -> Position {
    Position::new(pos.line.saturating_sub(1 + prepend), pos.column)
}

pub fn to_lsp_range(span: &Span, prepend: u32) -> Range {
    Range::new(to_lsp_position(span.start, prepend), to_lsp_position(span.end, prepend))
}

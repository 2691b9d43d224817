//! Incremental text synchronization over a rope.

use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};

/// Char index of a protocol position (UTF-16 columns), clamped to the end
/// of its line and of the text.
pub(crate) fn position_to_char_idx(text: &Rope, pos: Position) -> usize {
    let line_idx = pos.line as usize;
    if line_idx >= text.len_lines() {
        return text.len_chars();
    }
    let line_start = text.line_to_char(line_idx);
    let line = text.line(line_idx);
    let target = pos.character as usize;

    let mut seen_utf16 = 0usize;
    let mut chars = 0usize;
    for ch in line.chars() {
        if ch == '\n' || ch == '\r' {
            break;
        }
        let width = ch.len_utf16();
        if seen_utf16 + width > target {
            break;
        }
        seen_utf16 += width;
        chars += 1;
    }
    line_start + chars
}

/// Apply one change event: a ranged replacement, or the whole text when
/// no range is given.
pub(crate) fn apply_change(text: &mut Rope, change: &TextDocumentContentChangeEvent) {
    let Some(range) = &change.range else {
        *text = Rope::from_str(&change.text);
        return;
    };
    let a = position_to_char_idx(text, range.start);
    let b = position_to_char_idx(text, range.end);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    if start != end {
        text.remove(start..end);
    }
    if !change.text.is_empty() {
        text.insert(start, &change.text);
    }
}

/// Apply change events in the order the client sent them.
pub(crate) fn apply_changes(text: &mut Rope, changes: &[TextDocumentContentChangeEvent]) {
    for change in changes {
        apply_change(text, change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp::lsp_types::Range;

    fn edit(l1: u32, c1: u32, l2: u32, c2: u32, text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: Some(Range::new(Position::new(l1, c1), Position::new(l2, c2))),
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_position_counts_utf16_units() {
        let rope = Rope::from_str("const s = \"😀x\";\nnext");
        // the emoji is two UTF-16 units but one char
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 11)), 11);
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 13)), 12);
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 99)), 15);
        assert_eq!(position_to_char_idx(&rope, Position::new(1, 2)), 18);
        assert_eq!(position_to_char_idx(&rope, Position::new(5, 0)), rope.len_chars());
    }

    #[test]
    fn test_incremental_edits() {
        let mut rope = Rope::from_str("const x = 1;\ndisplay(x);");
        apply_changes(
            &mut rope,
            &[edit(0, 6, 0, 7, "value"), edit(1, 8, 1, 9, "value"), edit(1, 15, 1, 15, "\n")],
        );
        assert_eq!(rope.to_string(), "const value = 1;\ndisplay(value);\n");
    }

    #[test]
    fn test_full_replacement() {
        let mut rope = Rope::from_str("old");
        apply_change(
            &mut rope,
            &TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "new text".to_string(),
            },
        );
        assert_eq!(rope.to_string(), "new text");
    }
}

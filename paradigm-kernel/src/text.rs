//! Character-offset helpers.
//!
//! Every position in this crate is a character offset, not a byte offset.
//! Documents are small enough that the linear walks here are a non-issue;
//! the payoff is that splice and caret arithmetic never land inside a
//! multi-byte sequence.

/// Byte index of the character at `char_offset`, clamped to the end of the
/// string when the offset runs past it.
pub fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Substring spanning `[start, end)` in character offsets, clamped to the
/// document bounds.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }

    let from = byte_offset(text, start);
    let to = byte_offset(text, end);
    &text[from..to]
}

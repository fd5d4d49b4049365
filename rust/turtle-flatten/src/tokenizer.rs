//! Quote-aware splitting and tokenization.
//!
//! Three cuts are made on normalized text, all of which ignore delimiters
//! inside `"..."` literals and `<...>` IRIs:
//!
//! - clauses, split on a `.` that is followed by whitespace or end of input
//! - statements, split on `;`
//! - tokens, split on whitespace; a literal keeps its adjacent suffix
//!   (`"chat"@fr`, `"5"^^xsd:int`, `"a",`) as part of the same token

use crate::scan::{ScanState, structural_chars};

/// Split `text` on `delimiter` outside literals and IRIs, trimming each piece.
///
/// A `.` only splits when it terminates a clause, i.e. when the next
/// character is whitespace or there is none. Pieces are never dropped, so
/// `"a;;b"` splits into `["a", "", "b"]`.
pub fn split(text: &str, delimiter: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = structural_chars(text).peekable();

    while let Some((offset, ch, structural)) = chars.next() {
        if !structural || ch != delimiter {
            continue;
        }
        if delimiter == '.'
            && !chars
                .peek()
                .is_none_or(|&(_, next, _)| next.is_whitespace())
        {
            continue;
        }
        pieces.push(text[start..offset].trim());
        start = offset + ch.len_utf8();
    }
    pieces.push(text[start..].trim());
    pieces
}

/// Split a statement into whitespace-separated tokens.
///
/// Whitespace inside a literal does not end the token.
pub fn tokenize(statement: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut state = ScanState::Normal;
    let mut start: Option<usize> = None;

    for (offset, ch) in statement.char_indices() {
        let in_literal = matches!(state, ScanState::InString | ScanState::InStringEscape);
        let boundary = ch.is_whitespace() && !in_literal;
        state = state.step(ch);
        match (boundary, start) {
            (true, Some(from)) => {
                tokens.push(&statement[from..offset]);
                start = None;
            }
            (false, None) => start = Some(offset),
            _ => {}
        }
    }
    if let Some(from) = start {
        tokens.push(&statement[from..]);
    }
    tokens
}

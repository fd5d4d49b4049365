//! Lexical context tracking shared by the normalizer, the splitter and the
//! bracket resolver.
//!
//! Every pass over the text only cares about one question: is this character
//! structural, or is it inside a `"..."` literal or a `<...>` IRI where `.`,
//! `;`, `,` and `[` carry no meaning. [`ScanState`] answers that one
//! character at a time.

/// Context of the character about to be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ScanState {
    /// Outside any literal or IRI.
    #[default]
    Normal,
    /// Inside `"..."`.
    InString,
    /// After `\` inside a string.
    InStringEscape,
    /// Inside `<...>`.
    InIri,
}

impl ScanState {
    /// Returns `true` if `ch`, seen in this state, is structural.
    pub(crate) fn is_structural(self, ch: char) -> bool {
        match self {
            ScanState::Normal => true,
            ScanState::InIri => ch.is_whitespace(),
            _ => false,
        }
    }

    /// State after consuming `ch`.
    ///
    /// IRIs cannot contain whitespace, so whitespace also closes an IRI. That
    /// keeps a stray `<` from swallowing the rest of the document.
    pub(crate) fn step(self, ch: char) -> ScanState {
        match self {
            ScanState::Normal => match ch {
                '"' => ScanState::InString,
                '<' => ScanState::InIri,
                _ => ScanState::Normal,
            },
            ScanState::InString => match ch {
                '\\' => ScanState::InStringEscape,
                '"' => ScanState::Normal,
                _ => ScanState::InString,
            },
            ScanState::InStringEscape => ScanState::InString,
            ScanState::InIri => match ch {
                '>' => ScanState::Normal,
                c if c.is_whitespace() => ScanState::Normal,
                _ => ScanState::InIri,
            },
        }
    }
}

/// Iterate `text` yielding `(byte_offset, char, is_structural)`.
pub(crate) fn structural_chars(text: &str) -> impl Iterator<Item = (usize, char, bool)> + '_ {
    let mut state = ScanState::Normal;
    text.char_indices().map(move |(offset, ch)| {
        let structural = state.is_structural(ch);
        state = state.step(ch);
        (offset, ch, structural)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn structural(text: &str) -> String {
        structural_chars(text)
            .map(|(_, ch, s)| if s { ch } else { '_' })
            .collect()
    }

    #[test]
    fn test_string_contents_are_opaque() {
        assert_eq!(structural(r#"a "b;c" d"#), r#"a "____ d"#);
    }

    #[test]
    fn test_escaped_quote_does_not_close_string() {
        assert_eq!(structural(r#""a\"b" c"#), r#""_____ c"#);
    }

    #[test]
    fn test_iri_contents_are_opaque() {
        assert_eq!(structural("<http://a.b/c;d> ."), "<_______________ .");
    }

    #[test]
    fn test_whitespace_closes_unterminated_iri() {
        assert_eq!(structural("<abc def"), "<___ def");
    }
}

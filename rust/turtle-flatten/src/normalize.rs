//! Whitespace and punctuation normalization.
//!
//! Brings a document into the canonical shape the splitter expects:
//!
//! - every run of whitespace becomes a single space
//! - `;` and `,` lose any whitespace before them and are followed by exactly one space
//! - a clause-terminating `.` sits directly after the last token: `<s> <p> "o". <t> ...`
//! - trailing whitespace and periods at the end of the document are dropped
//!
//! None of these rules apply inside `"..."` literals or `<...>` IRIs.

use crate::scan::structural_chars;

/// Normalize `text`. Pure; never fails.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = structural_chars(text).peekable();

    while let Some((_, ch, structural)) = chars.next() {
        if !structural {
            out.push(ch);
            continue;
        }

        let next = chars.peek().map(|&(_, next, _)| next);
        match ch {
            c if c.is_whitespace() => {
                while chars
                    .next_if(|&(_, next, s)| s && next.is_whitespace())
                    .is_some()
                {}
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            ',' | ';' => {
                trim_trailing_spaces(&mut out);
                out.push(ch);
                if !next.is_some_and(char::is_whitespace) {
                    out.push(' ');
                }
            }
            '.' if ends_clause(next) => {
                trim_trailing_spaces(&mut out);
                out.push('.');
            }
            _ => out.push(ch),
        }
    }

    let kept = out.trim_end_matches([' ', '.']).len();
    out.truncate(kept);
    out
}

/// A `.` ends a clause when followed by whitespace or the end of input.
fn ends_clause(next: Option<char>) -> bool {
    next.is_none_or(char::is_whitespace)
}

fn trim_trailing_spaces(out: &mut String) {
    let kept = out.trim_end_matches(' ').len();
    out.truncate(kept);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            normalize("  <s1>   <p1>\n\t\"v1\" .\n"),
            r#"<s1> <p1> "v1""#
        );
    }

    #[test]
    fn test_spaces_after_separators() {
        assert_eq!(normalize("<s> <p> a,b;<q> c"), "<s> <p> a, b; <q> c");
    }

    #[test]
    fn test_detached_comma_is_pulled_in() {
        assert_eq!(
            normalize(r#"<s> <p> "x" , "y" ; <q> "z" ."#),
            r#"<s> <p> "x", "y"; <q> "z""#
        );
    }

    #[test]
    fn test_clause_periods() {
        assert_eq!(
            normalize("<s> <p> \"v\" .\n\n<t> <p> \"w\" .\n"),
            r#"<s> <p> "v". <t> <p> "w""#
        );
    }

    #[test]
    fn test_literal_contents_untouched() {
        assert_eq!(
            normalize(r#"<s> <p> "a,b;c.  d" ."#),
            r#"<s> <p> "a,b;c.  d""#
        );
    }

    #[test]
    fn test_iri_and_decimal_periods_untouched() {
        assert_eq!(
            normalize("<http://a.org/x;y> ex:p 1.5 ;\n ex:q ex:o.\n"),
            "<http://a.org/x;y> ex:p 1.5; ex:q ex:o"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(" \n . "), "");
    }
}

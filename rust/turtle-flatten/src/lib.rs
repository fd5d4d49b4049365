//! # turtle-flatten
//!
//! Flattens nested Turtle-like statements into one line per leaf value,
//! keyed by the predicate path that leads to it.
//!
//! ## Input
//!
//! ```text
//! @prefix ex: <http://example.org/> .
//! <s1> <p1> "a", [ <p2> "b" ; <p3> s:st1 ] .
//! s:st1 <p4> "c" .
//! ```
//!
//! Clauses end with `.`, statements about one subject are separated by `;`
//! and objects of one predicate by `,`. A `[...]` span is an anonymous
//! (blank) node. Objects that start with a statement prefix (`s:`, `v:`,
//! `ref:` by default) point to the section of that statement node.
//!
//! ## Output
//!
//! ```text
//! @prefix ex: <http://example.org/> .
//! <s1> <<p1>>[1] "a"
//! <s1> <<p1>|<p2>>[2,1] "b"
//! <s1> <<p1>|<p3>|<p4>>[2,1,1] "c"
//! ```
//!
//! Each line carries the real subject, the chain of predicates followed from
//! it, the 1-based position of the object at every hop, and the leaf object.
//! Blank nodes and statement nodes never appear as subjects of their own.
//!
//! ## Example
//!
//! ```
//! use turtle_flatten::{convert, FlattenConfig};
//!
//! let conversion = convert(r#"<s1> <p1> [ <p2> "v1" ] ."#, &FlattenConfig::default()).unwrap();
//!
//! assert!(conversion.diagnostics.is_empty());
//! assert_eq!(conversion.to_string(), "<s1> <<p1>|<p2>>[1,1] \"v1\"\n");
//! ```

use std::fmt;
use std::time::Instant;

use tracing::{debug, instrument};

pub mod ast;
pub mod bracket;
pub mod config;
pub mod error;
pub mod flatten;
pub mod line;
pub mod normalize;
pub mod parser;
mod scan;
pub mod tokenizer;

pub use config::FlattenConfig;
pub use error::{ConvertError, LineParseError, Result};
pub use flatten::{Flattened, flatten, flatten_until};
pub use line::{ConvertedDocument, FlatLine, read_converted};
pub use parser::{ParsedDocument, parse_document, parse_document_until};

/// The result of converting one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    /// `@prefix` and `@base` directives, in document order.
    pub prefixes: Vec<String>,
    pub lines: Vec<FlatLine>,
    /// Problems that were skipped over. Each one cost at most a clause, a
    /// statement, a branch or a subject.
    pub diagnostics: Vec<ConvertError>,
}

impl fmt::Display for Conversion {
    /// Directives first, then the flattened lines, each newline terminated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prefix in &self.prefixes {
            writeln!(f, "{prefix}")?;
        }
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl Conversion {
    /// Combine an assembled document with its flattened lines.
    pub fn assemble(parsed: ParsedDocument, flattened: Flattened) -> Self {
        let ParsedDocument {
            prefixes,
            mut diagnostics,
            ..
        } = parsed;
        diagnostics.extend(flattened.diagnostics);
        Self {
            prefixes,
            lines: flattened.lines,
            diagnostics,
        }
    }
}

/// Convert a complete document.
///
/// Fails only when `config` is invalid. Structural problems in the document
/// are collected in [`Conversion::diagnostics`].
#[instrument(level = "debug", skip_all, fields(bytes = input.len()))]
pub fn convert(input: &str, config: &FlattenConfig) -> Result<Conversion> {
    config.validate()?;

    let parsed = parse_document(input, config);
    let flattened = flatten(&parsed.table, config);
    Ok(finish(Conversion::assemble(parsed, flattened)))
}

/// Convert a complete document, giving up once `deadline` has passed.
///
/// Work stops between clauses and between subjects, so a passed deadline
/// returns [`ConvertError::DeadlineExceeded`] promptly instead of running the
/// conversion to its end.
#[instrument(level = "debug", skip_all, fields(bytes = input.len()))]
pub fn convert_until(
    input: &str,
    config: &FlattenConfig,
    deadline: Instant,
) -> Result<Conversion> {
    config.validate()?;

    let parsed = parse_document_until(input, config, deadline)?;
    let flattened = flatten_until(&parsed.table, config, deadline)?;
    Ok(finish(Conversion::assemble(parsed, flattened)))
}

fn finish(conversion: Conversion) -> Conversion {
    debug!(
        lines = conversion.lines.len(),
        diagnostics = conversion.diagnostics.len(),
        "converted document"
    );
    conversion
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_renders_prefixes_first() -> anyhow::Result<()> {
        let conversion = convert(
            "@prefix ex: <http://example.org/> .\nex:s ex:p \"v\" .\n",
            &FlattenConfig::default(),
        )?;
        assert_eq!(
            conversion.to_string(),
            "@prefix ex: <http://example.org/> .\nex:s <ex:p>[1] \"v\"\n"
        );
        Ok(())
    }

    #[test]
    fn test_convert_rejects_invalid_config() {
        let config = FlattenConfig {
            max_depth: 0,
            ..FlattenConfig::default()
        };
        assert!(matches!(
            convert("<s> <p> \"v\" .", &config),
            Err(ConvertError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_statement_chain_from_crate_docs() -> anyhow::Result<()> {
        let conversion = convert(
            r#"<s1> <p1> "a", [ <p2> "b" ; <p3> s:st1 ] . s:st1 <p4> "c" ."#,
            &FlattenConfig::default(),
        )?;
        assert!(conversion.diagnostics.is_empty());
        assert_eq!(
            conversion.to_string(),
            concat!(
                "<s1> <<p1>>[1] \"a\"\n",
                "<s1> <<p1>|<p2>>[2,1] \"b\"\n",
                "<s1> <<p1>|<p3>|<p4>>[2,1,1] \"c\"\n",
            )
        );
        Ok(())
    }
}

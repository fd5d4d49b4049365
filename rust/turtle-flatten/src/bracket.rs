//! Blank node extraction.
//!
//! Each balanced `[...]` span in a clause is replaced by a synthetic
//! identifier, and its content becomes a [`Section`] of its own. Spans close
//! innermost first, so by the time a span's statements are assembled they
//! only contain identifiers.
//!
//! ```text
//! <s1> <p1> [ <p2> [ <p3> "v" ] ]
//!   => <s1> <p1> blank-node:B        blank-node:A  <p3> "v"
//!                                    blank-node:B  <p2> blank-node:A
//! ```
//!
//! The clause is scanned once. Open spans live on an explicit stack that is
//! never deeper than `max_depth`.

use tracing::trace;
use ulid::Ulid;

use crate::ast::{Section, Term};
use crate::config::FlattenConfig;
use crate::error::{ConvertError, Result};
use crate::parser::assemble_statements;
use crate::scan::structural_chars;
use crate::tokenizer::split;

/// Resolves the brackets of one clause.
///
/// Sections and diagnostics accumulate in the resolver and are only handed
/// out by [`BracketResolver::finish`], so a clause that fails half way leaves
/// nothing behind.
pub struct BracketResolver<'a> {
    config: &'a FlattenConfig,
    sections: Vec<Section>,
    diagnostics: Vec<ConvertError>,
}

/// A `[` that has not been closed yet.
struct OpenSpan {
    /// Byte offset of the `[` in the clause.
    offset: usize,
    /// Resolved content so far.
    text: String,
}

impl<'a> BracketResolver<'a> {
    pub fn new(config: &'a FlattenConfig) -> Self {
        Self {
            config,
            sections: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Replace every top-level `[...]` span of `clause` with a synthetic identifier.
    ///
    /// Spans nested more than `max_depth` levels deep fail the clause with
    /// [`ConvertError::NestingTooDeep`].
    pub fn resolve(&mut self, clause: &str) -> Result<String> {
        let subject = clause.split_whitespace().next().unwrap_or(clause);
        let mut out = String::with_capacity(clause.len());
        let mut open: Vec<OpenSpan> = Vec::new();
        let mut cursor = 0;

        for (offset, ch, structural) in structural_chars(clause) {
            if !structural || (ch != '[' && ch != ']') {
                continue;
            }
            let current = open.last_mut().map_or(&mut out, |span| &mut span.text);
            current.push_str(&clause[cursor..offset]);
            cursor = offset + 1;

            if ch == '[' {
                if open.len() >= self.config.max_depth {
                    return Err(ConvertError::NestingTooDeep {
                        subject: subject.to_owned(),
                        limit: self.config.max_depth,
                    });
                }
                open.push(OpenSpan {
                    offset,
                    text: String::new(),
                });
                continue;
            }

            let Some(span) = open.pop() else {
                return Err(ConvertError::UnexpectedClose {
                    clause: clause.to_owned(),
                    offset,
                });
            };
            let identifier = self.close(subject, &span.text);

            let current = open.last_mut().map_or(&mut out, |span| &mut span.text);
            if !current.is_empty() && !current.ends_with(' ') {
                current.push(' ');
            }
            current.push_str(&identifier);
            if clause[cursor..].starts_with(|c: char| !c.is_whitespace() && c != ',' && c != ';') {
                current.push(' ');
            }
        }

        if let Some(outermost) = open.first() {
            return Err(ConvertError::MalformedBracket {
                clause: clause.to_owned(),
                offset: outermost.offset,
            });
        }
        out.push_str(&clause[cursor..]);
        Ok(out)
    }

    /// The synthetic sections and the diagnostics raised while assembling them.
    pub fn finish(self) -> (Vec<Section>, Vec<ConvertError>) {
        (self.sections, self.diagnostics)
    }

    /// Turn the resolved content of a span into a section and return its identifier.
    ///
    /// Diagnostics are reported against the clause subject.
    fn close(&mut self, subject: &str, content: &str) -> String {
        let identifier = format!("{}{}", self.config.blank_node_prefix, Ulid::new());
        let triples = assemble_statements(
            &split(content.trim(), ';'),
            self.config,
            subject,
            &mut self.diagnostics,
        );
        trace!(%identifier, triples = triples.len(), "resolved blank node");

        self.sections.push(Section {
            subject: Term::BlankNode(identifier.clone()),
            triples,
        });
        identifier
    }
}

//! Predicate-chain flattening.
//!
//! Every real subject in the [`SectionTable`] is expanded depth first. A
//! triple is followed into another section when its first object is a
//! reference (a blank node or a statement node) or when its predicate carries
//! a qualifier prefix. Each hop adds the predicate to the chain and the
//! object's 1-based position within its triple to the index chain:
//!
//! ```text
//! <s1> <p1> "a", [ <p2> "b", "c" ] .
//!
//! <s1> <<p1>>[1] "a"
//! <s1> <<p1>|<p2>>[2,1] "b"
//! <s1> <<p1>|<p2>>[2,2] "c"
//! ```
//!
//! Subjects are independent of each other. Each one produces its own
//! [`Flattened`] buffer and the buffers are concatenated in table order, which
//! is what lets the `parallel` feature fan subjects out without changing the
//! output.

use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::ast::{Section, SectionTable, Term};
use crate::config::FlattenConfig;
use crate::error::{ConvertError, Result, check_deadline};
use crate::line::FlatLine;

/// Lines produced by flattening, with the problems that were skipped over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    pub lines: Vec<FlatLine>,
    pub diagnostics: Vec<ConvertError>,
}

impl Flattened {
    fn append(&mut self, other: Flattened) {
        self.lines.extend(other.lines);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Flatten every real subject of `table`.
///
/// A subject whose expansion fails (a cycle, or nesting past
/// `config.max_depth`) contributes no lines; its error is recorded and the
/// remaining subjects are still flattened.
pub fn flatten(table: &SectionTable, config: &FlattenConfig) -> Flattened {
    flatten_before(table, config, None).unwrap_or_default()
}

/// Like [`flatten`], but gives up with [`ConvertError::DeadlineExceeded`]
/// once `deadline` has passed.
///
/// The deadline is checked before each subject is expanded.
pub fn flatten_until(
    table: &SectionTable,
    config: &FlattenConfig,
    deadline: Instant,
) -> Result<Flattened> {
    flatten_before(table, config, Some(deadline))
}

#[instrument(level = "debug", skip_all, fields(sections = table.len()))]
fn flatten_before(
    table: &SectionTable,
    config: &FlattenConfig,
    deadline: Option<Instant>,
) -> Result<Flattened> {
    let flattener = Flattener {
        table,
        config,
        deadline,
    };
    let subjects: Vec<&Section> = table.subjects().collect();

    let mut out = Flattened::default();
    for (section, result) in subjects.iter().zip(flattener.flatten_all(&subjects)) {
        match result {
            Ok(flattened) => out.append(flattened),
            Err(error) if error.is_deadline() => return Err(error),
            Err(error) => {
                warn!(subject = %section.subject, %error, "dropping subject");
                out.diagnostics.push(error);
            }
        }
    }

    debug!(
        subjects = subjects.len(),
        lines = out.lines.len(),
        "flattened section table"
    );
    Ok(out)
}

/// Flatten a single section of `table` as if it were a real subject.
pub fn flatten_subject(
    table: &SectionTable,
    config: &FlattenConfig,
    section: &Section,
) -> Result<Flattened> {
    Flattener {
        table,
        config,
        deadline: None,
    }
    .flatten_subject(section)
}

struct Flattener<'a> {
    table: &'a SectionTable,
    config: &'a FlattenConfig,
    deadline: Option<Instant>,
}

/// Traversal state for one subject.
struct Expansion<'a> {
    subject: &'a str,
    /// Identifiers currently being expanded, the subject included.
    path: Vec<&'a str>,
    predicates: Vec<&'a str>,
    indices: Vec<usize>,
    out: Flattened,
}

impl<'a> Flattener<'a> {
    #[cfg(feature = "parallel")]
    fn flatten_all(&self, subjects: &[&'a Section]) -> Vec<Result<Flattened>> {
        use rayon::prelude::*;

        if self.config.parallel {
            subjects
                .par_iter()
                .map(|section| self.flatten_subject(section))
                .collect()
        } else {
            self.flatten_sequential(subjects)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn flatten_all(&self, subjects: &[&'a Section]) -> Vec<Result<Flattened>> {
        if self.config.parallel {
            debug!("parallel flattening requested without the `parallel` feature");
        }
        self.flatten_sequential(subjects)
    }

    fn flatten_sequential(&self, subjects: &[&'a Section]) -> Vec<Result<Flattened>> {
        subjects
            .iter()
            .map(|section| self.flatten_subject(section))
            .collect()
    }

    fn flatten_subject(&self, section: &'a Section) -> Result<Flattened> {
        check_deadline(self.deadline, "flattening")?;
        let subject = section.subject.as_str();
        let mut expansion = Expansion {
            subject,
            path: vec![subject],
            predicates: Vec::new(),
            indices: Vec::new(),
            out: Flattened::default(),
        };
        self.expand_section(&mut expansion, section)?;
        Ok(expansion.out)
    }

    fn expand_section(&self, cx: &mut Expansion<'a>, section: &'a Section) -> Result<()> {
        for triple in &section.triples {
            let follows = triple.objects.first().is_some_and(Term::is_reference)
                || self.config.is_qualifier(&triple.predicate);

            cx.predicates.push(&triple.predicate);
            for (position, object) in triple.objects.iter().enumerate() {
                cx.indices.push(position + 1);
                self.expand_object(cx, object, follows)?;
                cx.indices.pop();
            }
            cx.predicates.pop();
        }
        Ok(())
    }

    /// Emit `object` as a leaf, or descend into its section.
    ///
    /// Blank nodes are always descended into so that synthetic identifiers
    /// never reach the output.
    fn expand_object(
        &self,
        cx: &mut Expansion<'a>,
        object: &'a Term,
        follows: bool,
    ) -> Result<()> {
        if follows || object.is_blank_node() {
            if let Some(section) = self.table.get(object.as_str()) {
                return self.descend(cx, object.as_str(), section);
            }
            if object.is_reference() {
                let error = ConvertError::UnresolvedReference {
                    subject: cx.subject.to_owned(),
                    identifier: object.as_str().to_owned(),
                };
                warn!(%error, "skipping branch");
                cx.out.diagnostics.push(error);
                return Ok(());
            }
        }

        cx.out.lines.push(FlatLine {
            subject: cx.subject.to_owned(),
            predicates: cx.predicates.iter().map(|p| (*p).to_owned()).collect(),
            indices: cx.indices.clone(),
            object: object.as_str().to_owned(),
        });
        Ok(())
    }

    fn descend(
        &self,
        cx: &mut Expansion<'a>,
        identifier: &'a str,
        section: &'a Section,
    ) -> Result<()> {
        if cx.path.contains(&identifier) {
            return Err(ConvertError::CyclicReference {
                subject: cx.subject.to_owned(),
                identifier: identifier.to_owned(),
            });
        }
        if cx.predicates.len() >= self.config.max_depth {
            return Err(ConvertError::NestingTooDeep {
                subject: cx.subject.to_owned(),
                limit: self.config.max_depth,
            });
        }

        cx.path.push(identifier);
        self.expand_section(cx, section)?;
        cx.path.pop();
        Ok(())
    }
}

//! Section table types.
//!
//! A document is assembled into a [`SectionTable`]: one [`Section`] per
//! subject, real or synthetic, each holding the [`Triple`]s stated about it
//! in document order. Object tokens are classified once, when they are
//! tokenized, into a [`Term`].

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;

/// A classified token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// An IRI, prefixed name or other bare token naming a resource.
    RealSubject(String),
    /// A synthetic identifier minted for a `[...]` span.
    BlankNode(String),
    /// A token carrying one of the configured statement prefixes (`s:`, `v:`, ...).
    StatementRef(String),
    /// A quoted literal (with any `@lang` / `^^type` suffix), number or boolean.
    Literal(String),
}

impl Term {
    /// The token text, exactly as written (minus a trailing value separator).
    pub fn as_str(&self) -> &str {
        match self {
            Term::RealSubject(s)
            | Term::BlankNode(s)
            | Term::StatementRef(s)
            | Term::Literal(s) => s.as_str(),
        }
    }

    /// Returns `true` if this term points at another section.
    pub fn is_reference(&self) -> bool {
        matches!(self, Term::BlankNode(_) | Term::StatementRef(_))
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predicate and the values stated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub predicate: String,
    pub objects: Vec<Term>,
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.predicate)?;
        for (i, object) in self.objects.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{object}")?;
        }
        Ok(())
    }
}

/// Everything stated about one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub subject: Term,
    pub triples: Vec<Triple>,
}

/// Identifier to section map, in document order.
#[derive(Debug, Clone, Default)]
pub struct SectionTable {
    sections: IndexMap<String, Section>,
}

impl SectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `section`. A second section for the same subject is merged into
    /// the first, keeping document order.
    pub fn insert(&mut self, section: Section) {
        match self.sections.entry(section.subject.as_str().to_owned()) {
            Entry::Occupied(mut existing) => existing.get_mut().triples.extend(section.triples),
            Entry::Vacant(slot) => {
                slot.insert(section);
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&Section> {
        self.sections.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.sections.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// All sections, synthetic ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Sections whose subject is a real subject, i.e. the roots of flattening.
    pub fn subjects(&self) -> impl Iterator<Item = &Section> {
        self.iter().filter(|section| !section.subject.is_reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(subject: Term, predicate: &str, object: &str) -> Section {
        Section {
            subject,
            triples: vec![Triple {
                predicate: predicate.into(),
                objects: vec![Term::Literal(object.into())],
            }],
        }
    }

    #[test]
    fn test_repeated_subject_merges_in_order() {
        let mut table = SectionTable::new();
        table.insert(section(Term::RealSubject("<s>".into()), "<p>", "\"a\""));
        table.insert(section(Term::RealSubject("<s>".into()), "<q>", "\"b\""));

        assert_eq!(table.len(), 1);
        let merged = table.get("<s>").map(|s| {
            s.triples
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
        });
        assert_eq!(
            merged,
            Some(vec!["<p> \"a\"".to_string(), "<q> \"b\"".to_string()])
        );
    }

    #[test]
    fn test_subjects_skip_references() {
        let mut table = SectionTable::new();
        table.insert(section(Term::RealSubject("<s>".into()), "<p>", "\"a\""));
        table.insert(section(Term::BlankNode("blank-node:1".into()), "<p>", "\"b\""));
        table.insert(section(Term::StatementRef("s:1".into()), "<p>", "\"c\""));

        let roots: Vec<&str> = table.subjects().map(|s| s.subject.as_str()).collect();
        assert_eq!(roots, vec!["<s>"]);
        assert!(table.contains("s:1"));
    }
}

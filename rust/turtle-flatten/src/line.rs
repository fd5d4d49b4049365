//! The flattened line format.
//!
//! ```text
//! <s1> <<p1>|<p2>>[1,2] "v"
//! ^^^^ ^^^^^^^^^^^^ ^^^^^ ^^^
//! subject  predicates  indices  object
//! ```
//!
//! Predicates are written exactly as tokenized and joined with `|` inside one
//! pair of angle brackets; indices are 1-based and joined with `,`.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConvertError, LineParseError, Result};

/// One leaf value reached from a real subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlatLine {
    pub subject: String,
    pub predicates: Vec<String>,
    pub indices: Vec<usize>,
    pub object: String,
}

impl FlatLine {
    /// The predicate chain as written between the angle brackets.
    pub fn predicate_path(&self) -> String {
        self.predicates.join("|")
    }

    /// The index chain as written between the square brackets.
    pub fn index_path(&self) -> String {
        let indices: Vec<String> = self.indices.iter().map(usize::to_string).collect();
        indices.join(",")
    }

    /// Number of nesting levels traversed to reach the object.
    pub fn depth(&self) -> usize {
        self.predicates.len()
    }
}

impl fmt::Display for FlatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}>[{}] {}",
            self.subject,
            self.predicate_path(),
            self.index_path(),
            self.object
        )
    }
}

impl FromStr for FlatLine {
    type Err = LineParseError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let (subject, rest) = line
            .split_once(' ')
            .ok_or(LineParseError::new("missing predicate chain"))?;
        let rest = rest
            .strip_prefix('<')
            .ok_or(LineParseError::new("predicate chain must start with '<'"))?;

        // Predicates may contain `>[` themselves, so take the first `>[` that
        // is followed by a well-formed index chain.
        let (chain, indices, object) = rest
            .match_indices(">[")
            .find_map(|(at, _)| {
                let after = &rest[at + 2..];
                let close = after.find(']')?;
                let indices = &after[..close];
                let well_formed = !indices.is_empty()
                    && indices.bytes().all(|b| b.is_ascii_digit() || b == b',');
                let object = after[close + 1..].strip_prefix(' ')?;
                well_formed.then_some((&rest[..at], indices, object))
            })
            .ok_or(LineParseError::new("missing index chain"))?;

        let indices = indices
            .split(',')
            .map(|index| match index.parse::<usize>() {
                Ok(0) | Err(_) => Err(LineParseError::new("index must be a positive integer")),
                Ok(index) => Ok(index),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let predicates: Vec<String> = chain.split('|').map(str::to_owned).collect();

        if predicates.iter().any(String::is_empty) {
            return Err(LineParseError::new("empty predicate"));
        }
        if predicates.len() != indices.len() {
            return Err(LineParseError::new(
                "predicate and index chains differ in length",
            ));
        }
        if subject.is_empty() || object.is_empty() {
            return Err(LineParseError::new("missing subject or object"));
        }

        Ok(FlatLine {
            subject: subject.to_owned(),
            predicates,
            indices,
            object: object.to_owned(),
        })
    }
}

/// A previously converted document, read back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertedDocument {
    pub prefixes: Vec<String>,
    pub lines: Vec<FlatLine>,
}

/// Read converted output: directive lines, then flattened lines. Blank lines
/// are ignored.
pub fn read_converted(text: &str) -> Result<ConvertedDocument> {
    let mut document = ConvertedDocument::default();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('@') {
            document.prefixes.push(line.to_owned());
            continue;
        }
        let parsed = line.parse().map_err(|source| ConvertError::MalformedLine {
            line: number + 1,
            source,
        })?;
        document.lines.push(parsed);
    }
    Ok(document)
}

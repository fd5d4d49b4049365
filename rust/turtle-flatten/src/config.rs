//! Conversion settings.
//!
//! Which prefixes mark a token as a pointer into the section table is a
//! property of the dataset (Wikidata dumps use `s:`/`v:` statement nodes and
//! `p:`/`psv:` qualifier predicates), so they are configuration rather than
//! constants. Every field has a default; a JSON document with any subset of
//! fields deserializes into a complete config.

use serde::{Deserialize, Serialize};

use crate::ast::Term;
use crate::error::{ConvertError, Result};

/// Prefix of the synthetic identifiers minted for `[...]` spans.
pub const DEFAULT_BLANK_NODE_PREFIX: &str = "blank-node:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Object prefixes that mark a statement reference.
    pub statement_prefixes: Vec<String>,
    /// Predicate prefixes whose objects are always followed into their sections.
    pub qualifier_prefixes: Vec<String>,
    pub blank_node_prefix: String,
    /// Longest predicate chain a single line may carry.
    pub max_depth: usize,
    /// Flatten subjects concurrently. Needs the `parallel` feature; ignored otherwise.
    pub parallel: bool,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            statement_prefixes: vec!["s:".into(), "v:".into(), "ref:".into()],
            qualifier_prefixes: vec!["p:".into(), "psv:".into()],
            blank_node_prefix: DEFAULT_BLANK_NODE_PREFIX.into(),
            max_depth: 64,
            parallel: false,
        }
    }
}

impl FlattenConfig {
    pub fn validate(&self) -> Result<()> {
        if self.blank_node_prefix.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "blank node prefix must not be empty".into(),
            ));
        }
        if self.max_depth == 0 {
            return Err(ConvertError::InvalidConfig(
                "max_depth must be at least 1".into(),
            ));
        }
        let mut prefixes = self.statement_prefixes.iter().chain(&self.qualifier_prefixes);
        if prefixes.any(String::is_empty) {
            return Err(ConvertError::InvalidConfig(
                "statement and qualifier prefixes must not be empty".into(),
            ));
        }
        if self
            .statement_prefixes
            .iter()
            .any(|p| {
                self.blank_node_prefix.starts_with(p.as_str())
                    || p.starts_with(self.blank_node_prefix.as_str())
            })
        {
            return Err(ConvertError::InvalidConfig(format!(
                "blank node prefix '{}' overlaps a statement prefix",
                self.blank_node_prefix
            )));
        }
        Ok(())
    }

    /// Classify an object token. A trailing `,` value separator is dropped.
    pub fn classify(&self, token: &str) -> Term {
        let token = token.strip_suffix(',').unwrap_or(token);
        let owned = token.to_owned();

        if token.starts_with('"') || is_bare_literal(token) {
            Term::Literal(owned)
        } else if token.starts_with(self.blank_node_prefix.as_str()) {
            Term::BlankNode(owned)
        } else if self.statement_prefixes.iter().any(|p| token.starts_with(p.as_str())) {
            Term::StatementRef(owned)
        } else {
            Term::RealSubject(owned)
        }
    }

    /// Returns `true` if `predicate` carries a qualifier prefix.
    pub fn is_qualifier(&self, predicate: &str) -> bool {
        self.qualifier_prefixes
            .iter()
            .any(|p| predicate.starts_with(p.as_str()))
    }
}

/// Numbers and booleans written without quotes.
fn is_bare_literal(token: &str) -> bool {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    unsigned.starts_with(|c: char| c.is_ascii_digit()) || matches!(token, "true" | "false")
}

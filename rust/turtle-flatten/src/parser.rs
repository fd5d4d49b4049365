//! Section assembly.
//!
//! Turns normalized text into a [`SectionTable`]:
//!
//! ```text
//! document  = clause ('. ' clause)*
//! clause    = directive | subject statement ('; ' statement)*
//! directive = '@prefix' ... | '@base' ...      → passed through
//! statement = predicate object (', ' object)*
//! object    = literal | name | '[' statement ('; ' statement)* ']'
//! ```
//!
//! Bracketed objects are handed to the [`BracketResolver`] before a clause is
//! assembled. Problems local to one clause or statement are recorded as
//! diagnostics and the rest of the document is still assembled.

use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::ast::{Section, SectionTable, Triple};
use crate::bracket::BracketResolver;
use crate::config::FlattenConfig;
use crate::error::{ConvertError, Result, check_deadline};
use crate::normalize::normalize;
use crate::tokenizer::{split, tokenize};

const DIRECTIVES: [&str; 2] = ["@prefix", "@base"];

/// The assembled form of a document, ready for flattening.
#[derive(Debug, Default)]
pub struct ParsedDocument {
    /// Directive clauses, each re-terminated with ` .`.
    pub prefixes: Vec<String>,
    pub table: SectionTable,
    pub diagnostics: Vec<ConvertError>,
}

/// Normalize, split and assemble a whole document.
pub fn parse_document(text: &str, config: &FlattenConfig) -> ParsedDocument {
    parse_before(text, config, None).unwrap_or_default()
}

/// Like [`parse_document`], but gives up with
/// [`ConvertError::DeadlineExceeded`] once `deadline` has passed.
///
/// The deadline is checked between clauses.
pub fn parse_document_until(
    text: &str,
    config: &FlattenConfig,
    deadline: Instant,
) -> Result<ParsedDocument> {
    parse_before(text, config, Some(deadline))
}

#[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
fn parse_before(
    text: &str,
    config: &FlattenConfig,
    deadline: Option<Instant>,
) -> Result<ParsedDocument> {
    check_deadline(deadline, "assembly")?;
    let normalized = normalize(text);
    let mut document = ParsedDocument::default();
    let mut synthetic = Vec::new();

    for clause in split(&normalized, '.') {
        check_deadline(deadline, "assembly")?;
        if clause.is_empty() {
            continue;
        }
        if is_directive(clause) {
            document.prefixes.push(format!("{clause} ."));
            continue;
        }

        let mut resolver = BracketResolver::new(config);
        let resolved = match resolver.resolve(clause) {
            Ok(resolved) => resolved,
            Err(error) => {
                warn!(%error, "skipping clause");
                document.diagnostics.push(error);
                continue;
            }
        };
        let (blank_nodes, blank_diagnostics) = resolver.finish();
        document.diagnostics.extend(blank_diagnostics);
        synthetic.extend(blank_nodes);

        if let Some(section) = assemble_clause(&resolved, config, &mut document.diagnostics) {
            document.table.insert(section);
        }
    }

    for section in synthetic {
        document.table.insert(section);
    }

    debug!(
        sections = document.table.len(),
        prefixes = document.prefixes.len(),
        diagnostics = document.diagnostics.len(),
        "assembled section table"
    );
    Ok(document)
}

fn is_directive(clause: &str) -> bool {
    DIRECTIVES.iter().any(|directive| {
        clause
            .strip_prefix(directive)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
    })
}

/// Assemble a bracket-free clause into its subject's section.
///
/// Returns `None` when the clause has no subject token.
pub fn assemble_clause(
    clause: &str,
    config: &FlattenConfig,
    diagnostics: &mut Vec<ConvertError>,
) -> Option<Section> {
    let mut statements = split(clause, ';');
    let first = statements[0];
    let Some(&subject) = tokenize(first).first() else {
        report(
            diagnostics,
            ConvertError::empty_statement(clause, "clause has no subject"),
        );
        return None;
    };
    statements[0] = first[subject.len()..].trim_start();

    if statements.iter().all(|statement| statement.is_empty()) {
        report(
            diagnostics,
            ConvertError::empty_statement(subject, "subject has no statements"),
        );
    }
    let triples = assemble_statements(&statements, config, subject, diagnostics);

    Some(Section {
        subject: config.classify(subject),
        triples,
    })
}

/// Assemble `;`-separated statements into triples.
///
/// A trailing empty statement (`<p> "o" ;`) is tolerated. Any other empty
/// statement, or a predicate without objects, is reported against `context`
/// and skipped.
pub fn assemble_statements(
    statements: &[&str],
    config: &FlattenConfig,
    context: &str,
    diagnostics: &mut Vec<ConvertError>,
) -> Vec<Triple> {
    let mut triples = Vec::with_capacity(statements.len());
    let last = statements.len().saturating_sub(1);

    for (position, statement) in statements.iter().enumerate() {
        let tokens = tokenize(statement);
        let Some((predicate, objects)) = tokens.split_first() else {
            if position != last {
                report(
                    diagnostics,
                    ConvertError::empty_statement(context, "statement has no tokens"),
                );
            }
            continue;
        };
        if objects.is_empty() {
            report(
                diagnostics,
                ConvertError::empty_statement(context, "predicate has no object"),
            );
            continue;
        }
        triples.push(Triple {
            predicate: (*predicate).to_owned(),
            objects: objects.iter().map(|object| config.classify(object)).collect(),
        });
    }
    triples
}

fn report(diagnostics: &mut Vec<ConvertError>, error: ConvertError) {
    warn!(%error, "skipping statement");
    diagnostics.push(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Term;
    use pretty_assertions::assert_eq;

    fn triples(section: &Section) -> Vec<String> {
        section.triples.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_parse_simple_clause() {
        let doc = parse_document(
            r#"<s1> <p1> "v1", "v2" ; <p2> <o> ."#,
            &FlattenConfig::default(),
        );
        assert!(doc.diagnostics.is_empty());
        assert_eq!(doc.table.len(), 1);

        let section = doc.table.get("<s1>").expect("section for <s1>");
        assert_eq!(section.subject, Term::RealSubject("<s1>".into()));
        assert_eq!(triples(section), vec![r#"<p1> "v1", "v2""#, "<p2> <o>"]);
    }

    #[test]
    fn test_prefixes_pass_through() {
        let doc = parse_document(
            "@prefix ex: <http://example.org/> .\n@base <http://b/> .\nex:a ex:p \"x\" .",
            &FlattenConfig::default(),
        );
        assert_eq!(
            doc.prefixes,
            vec!["@prefix ex: <http://example.org/> .", "@base <http://b/> ."]
        );
        assert!(doc.table.contains("ex:a"));
    }

    #[test]
    fn test_blank_nodes_are_merged_into_the_table() {
        let doc = parse_document(
            r#"<s> <p> [ <q> "v" ] . <t> <p> "w" ."#,
            &FlattenConfig::default(),
        );
        assert_eq!(doc.table.len(), 3);
        let roots: Vec<&str> = doc.table.subjects().map(|s| s.subject.as_str()).collect();
        assert_eq!(roots, vec!["<s>", "<t>"]);
    }

    #[test]
    fn test_doubled_semicolon_is_reported_and_skipped() {
        let doc = parse_document(
            r#"<s> <p> "a" ;; <q> "b" ."#,
            &FlattenConfig::default(),
        );
        assert_eq!(
            doc.diagnostics,
            vec![ConvertError::empty_statement("<s>", "statement has no tokens")]
        );
        let section = doc.table.get("<s>").expect("section for <s>");
        assert_eq!(triples(section), vec![r#"<p> "a""#, r#"<q> "b""#]);
    }

    #[test]
    fn test_trailing_semicolon_is_tolerated() {
        let doc = parse_document(r#"<s> <p> "a" ; ."#, &FlattenConfig::default());
        assert!(doc.diagnostics.is_empty());
        assert_eq!(doc.table.len(), 1);
    }

    #[test]
    fn test_predicate_without_object() {
        let mut diagnostics = Vec::new();
        let section = assemble_clause(
            "<s> <p>; <q> \"b\"",
            &FlattenConfig::default(),
            &mut diagnostics,
        );
        assert_eq!(
            diagnostics,
            vec![ConvertError::empty_statement("<s>", "predicate has no object")]
        );
        assert_eq!(section.map(|s| triples(&s)), Some(vec![r#"<q> "b""#.to_string()]));
    }

    #[test]
    fn test_subject_only_clause() {
        let mut diagnostics = Vec::new();
        let section = assemble_clause("<s>", &FlattenConfig::default(), &mut diagnostics);
        assert_eq!(
            diagnostics,
            vec![ConvertError::empty_statement("<s>", "subject has no statements")]
        );
        assert!(section.is_some_and(|s| s.triples.is_empty()));
    }

    #[test]
    fn test_malformed_clause_does_not_stop_the_document() {
        let doc = parse_document(
            r#"<s1> <p1> [ <p2> "v1" . <s2> <p> "ok" ."#,
            &FlattenConfig::default(),
        );
        assert!(matches!(
            doc.diagnostics.as_slice(),
            [ConvertError::MalformedBracket { .. }]
        ));
        assert!(!doc.table.contains("<s1>"));
        assert!(doc.table.contains("<s2>"));
    }

    #[test]
    fn test_passed_deadline_stops_assembly() {
        let result = parse_document_until(
            r#"<s> <p> "v" ."#,
            &FlattenConfig::default(),
            Instant::now(),
        );
        assert!(matches!(
            result,
            Err(ConvertError::DeadlineExceeded { stage: "assembly" })
        ));
    }
}

//! Error types for the flattening pipeline.
//!
//! Most of these are recovered locally: a malformed clause or a cyclic
//! subject is skipped and the error is kept in
//! [`Conversion::diagnostics`](crate::Conversion::diagnostics). Only
//! configuration problems and a passed deadline abort a conversion.

use std::time::Instant;

use thiserror::Error;

/// Errors raised while normalizing, assembling or flattening a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A `[` with no matching `]` before the end of its clause.
    #[error("unmatched '[' at byte {offset} of clause '{clause}'")]
    MalformedBracket { clause: String, offset: usize },

    /// A `]` that closes nothing.
    #[error("unexpected ']' at byte {offset} of clause '{clause}'")]
    UnexpectedClose { clause: String, offset: usize },

    /// A clause or statement that produced no usable tokens.
    #[error("empty statement in '{context}': {reason}")]
    EmptyStatement { context: String, reason: &'static str },

    /// Expansion of `subject` reached `identifier` a second time on the same path.
    #[error("cyclic reference through '{identifier}' while expanding '{subject}'")]
    CyclicReference { subject: String, identifier: String },

    /// Expansion of `subject` nested deeper than the configured limit.
    #[error("nesting deeper than {limit} levels while expanding '{subject}'")]
    NestingTooDeep { subject: String, limit: usize },

    /// An object that points into the section table, but has no section.
    #[error("'{identifier}' referenced from '{subject}' has no section")]
    UnresolvedReference { subject: String, identifier: String },

    /// The conversion was still running when its deadline passed.
    #[error("deadline passed during {stage}")]
    DeadlineExceeded { stage: &'static str },

    /// Rejected [`FlattenConfig`](crate::FlattenConfig).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A line of previously converted output that could not be read back.
    #[error("line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: LineParseError,
    },
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Why a converted line failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed converted line: {reason}")]
pub struct LineParseError {
    pub reason: &'static str,
}

impl LineParseError {
    pub(crate) fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

impl ConvertError {
    /// Create an empty-statement diagnostic
    pub fn empty_statement(context: impl Into<String>, reason: &'static str) -> Self {
        Self::EmptyStatement {
            context: context.into(),
            reason,
        }
    }

    /// Whether this error ended the whole conversion rather than one subject.
    pub fn is_deadline(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }
}

pub(crate) fn check_deadline(deadline: Option<Instant>, stage: &'static str) -> Result<()> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => {
            Err(ConvertError::DeadlineExceeded { stage })
        }
        _ => Ok(()),
    }
}

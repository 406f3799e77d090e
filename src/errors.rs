//! Error types for parsing and transformation.
//!
//! Two kinds of failure exist. Syntax errors are collected into a session's
//! append-only log and surfaced together as one aggregated error when the
//! caller asks. Translation/shape errors abort a transformation immediately
//! and carry the offending rule name and source span.

use std::fmt;

use miette::{Diagnostic, NamedSource, SourceSpan};
use pest::iterators::Pair;
use pest::RuleType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpliceError>;

/// One syntax error reported by the grammar front-end.
///
/// Records are appended to the owning session's error log during parsing and
/// never mutated afterwards; one session means one parse and one immutable log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub(crate) fn from_pest<R: RuleType>(error: &pest::error::Error<R>) -> Self {
        let (line, column) = match error.line_col {
            pest::error::LineColLocation::Pos((line, column)) => (line, column),
            pest::error::LineColLocation::Span((line, column), _) => (line, column),
        };
        Self {
            message: error.variant.message().into_owned(),
            line,
            column,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.line, self.column, self.message)
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum SpliceError {
    /// Aggregated parse failure: one `line:column message` pair per line,
    /// covering every error collected during the session's parse.
    #[error("{}", render_syntax_errors(.0))]
    #[diagnostic(code(querysplice::syntax))]
    Syntax(Vec<SyntaxError>),

    /// The CST contains a node shape no dispatch rule recognizes.
    // Field is named `src`, not `source`: thiserror treats a `source` field
    // as the error's cause, and `NamedSource` is not an `Error`.
    #[error("unsupported {rule} node: `{text}`")]
    #[diagnostic(code(querysplice::unsupported_node))]
    UnsupportedNode {
        rule: String,
        text: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("no reduction rule for this construct")]
        span: SourceSpan,
    },

    #[error("invalid numeric literal `{value}`")]
    #[diagnostic(code(querysplice::invalid_number))]
    InvalidNumber {
        value: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a valid number")]
        span: SourceSpan,
    },

    #[error("unterminated string literal opened at {line}:{column}")]
    #[diagnostic(code(querysplice::unterminated_string))]
    UnterminatedString { line: usize, column: usize },
}

fn render_syntax_errors(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fatal translation error naming the offending rule and its source text,
/// so the unsupported construct is locatable in the input.
pub(crate) fn unsupported_node<R: RuleType>(
    source_name: &str,
    source: &str,
    pair: &Pair<R>,
) -> SpliceError {
    let span = pair.as_span();
    SpliceError::UnsupportedNode {
        rule: format!("{:?}", pair.as_rule()),
        text: pair.as_str().to_string(),
        src: NamedSource::new(source_name, source.to_string()),
        span: (span.start()..span.end()).into(),
    }
}

pub(crate) fn invalid_number<R: RuleType>(
    source_name: &str,
    source: &str,
    pair: &Pair<R>,
) -> SpliceError {
    let span = pair.as_span();
    SpliceError::InvalidNumber {
        value: pair.as_str().to_string(),
        src: NamedSource::new(source_name, source.to_string()),
        span: (span.start()..span.end()).into(),
    }
}

/// 1-based line/column of a byte offset, for errors raised outside pest.
pub(crate) fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (i, c) in text.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

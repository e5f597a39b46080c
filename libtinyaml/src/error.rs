//! Error types for tinyaml parsing.

use thiserror::Error;

/// Result type for tinyaml parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages. `line` is one-based.
    pub fn loc_suffix(&self, line: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at line {} of <{}>", line, name),
            None => format!(" at line {}", line),
        }
    }

    /// Build a located error of the given kind.
    pub(crate) fn fail(&self, kind: fn(usize, String) -> ParseError, line: usize) -> ParseError {
        kind(line, self.loc_suffix(line))
    }
}

/// Error type for tinyaml parsing.
///
/// Every variant carries the one-based number of the offending line followed
/// by the rendered location suffix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The marker column of a line lies past its end (empty line, bare `-`,
    /// or a key with nothing after the colon at end of input).
    #[error("Unexpected end of line{1}")]
    UnexpectedEndOfLine(usize, String),

    /// Odd number of quote characters in an inline fragment.
    #[error("Unterminated quote{1}")]
    UnterminatedQuote(usize, String),

    /// Inline object field without a colon.
    #[error("Malformed inline field{1}")]
    MalformedInlineField(usize, String),

    /// A nested block does not start deeper than its parent.
    #[error("Inconsistent indentation{1}")]
    InconsistentIndentation(usize, String),

    /// A line inside a list block does not start with `-`.
    #[error("Expected list item{1}")]
    ExpectedListItem(usize, String),

    /// A line inside an object block has no `name:` boundary.
    #[error("Expected key{1}")]
    ExpectedKey(usize, String),

    /// Inline array missing its closing `]`.
    #[error("Unmatched bracket{1}")]
    UnmatchedBracket(usize, String),

    /// Inline object missing its closing `}`.
    #[error("Unmatched brace{1}")]
    UnmatchedBrace(usize, String),

    /// Document nests deeper than the configured limit.
    #[error("Nesting deeper than {1} levels{2}")]
    NestingTooDeep(usize, usize, String),

    /// Lines remain after the root value (strict mode only).
    #[error("Unexpected trailing content{1}")]
    TrailingContent(usize, String),
}

impl ParseError {
    /// One-based line number the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedEndOfLine(line, _)
            | ParseError::UnterminatedQuote(line, _)
            | ParseError::MalformedInlineField(line, _)
            | ParseError::InconsistentIndentation(line, _)
            | ParseError::ExpectedListItem(line, _)
            | ParseError::ExpectedKey(line, _)
            | ParseError::UnmatchedBracket(line, _)
            | ParseError::UnmatchedBrace(line, _)
            | ParseError::NestingTooDeep(line, _, _)
            | ParseError::TrailingContent(line, _) => *line,
        }
    }
}

/// Error type for encoding values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The value has no spelling in the target notation.
    #[error("Cannot represent {0} in tinyaml")]
    Unrepresentable(String),
}

//! Error types for command body processing and argument coercion.
//!
//! Processing failures are split the same way the dispatch pipeline reports
//! them: malformed input ([`SyntaxError`]) versus well-formed input that names
//! an option the command does not accept ([`UnknownOptionError`]).

use thiserror::Error;

/// Convenience type alias for processing results.
pub type Result<T, E = ProcessingError> = std::result::Result<T, E>;

/// Malformed quoting or option syntax in a command body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// A quoted span was opened but never closed.
    #[error("unterminated {quote} quote starting at byte {position}")]
    UnterminatedQuote {
        /// The quote character that opened the span.
        quote: char,
        /// Byte offset of the opening quote in the body.
        position: usize,
    },

    /// An option token that does not follow the option grammar (e.g. `--=x`).
    #[error("malformed option: {0}")]
    MalformedOption(String),

    /// A valued shorthand appeared in the middle of a shorthand group (`-nf`).
    #[error("option -{0} takes a value and must be last in its group")]
    ValuedShorthandNotLast(char),
}

impl SyntaxError {
    /// Static error code for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnterminatedQuote { .. } => "unterminated_quote",
            Self::MalformedOption(_) => "malformed_option",
            Self::ValuedShorthandNotLast(_) => "valued_shorthand_not_last",
        }
    }
}

/// An option that is not declared for the command being processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown option: {name}")]
pub struct UnknownOptionError {
    /// The option name as typed, without leading dashes.
    pub name: String,
}

impl UnknownOptionError {
    /// Create an error for the given option name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Any failure produced while turning a body into [`ProcessedContent`](crate::ProcessedContent).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// The body could not be tokenized.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The body used an option outside the allowed set.
    #[error(transparent)]
    UnknownOption(#[from] UnknownOptionError),
}

impl ProcessingError {
    /// Static error code for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Syntax(e) => e.error_code(),
            Self::UnknownOption(_) => "unknown_option",
        }
    }
}

/// A token that could not be converted to the requested argument type.
///
/// Coercion is speculative during overload resolution, so this error is
/// cheap to build and carries only what a diagnostic needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{token}' is not a valid {expected}")]
pub struct CoercionFailure {
    /// Name of the type that was attempted.
    pub expected: String,
    /// The raw token.
    pub token: String,
}

impl CoercionFailure {
    /// Build a failure for `token` against type `expected`.
    pub fn new(expected: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            token: token.into(),
        }
    }
}

//! Unified error handling for chatcmd.
//!
//! Registration errors are the only errors allowed to stop startup. Everything
//! that can go wrong while handling a message is converted into a
//! [`DispatchOutcome`](crate::dispatch::DispatchOutcome) instead.

use thiserror::Error;

// ============================================================================
// Registration Errors (startup)
// ============================================================================

/// A pattern descriptor that cannot describe a valid handler shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unknown argument type '{0}'")]
    UnknownType(String),

    #[error("unterminated literal {0}")]
    UnterminatedLiteral(String),

    #[error("empty literal")]
    EmptyLiteral,

    #[error("literal {0} cannot be variadic")]
    VariadicLiteral(String),

    #[error("only the last argument may be variadic")]
    VariadicNotLast,

    /// Arguments and options are only delivered alongside the event.
    #[error("a pattern that takes arguments or options must also take the event")]
    MissingEvent,
}

/// Errors raised while building the command registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("command name must not be empty or contain whitespace: '{0}'")]
    InvalidName(String),

    #[error("alias '{alias}' is already used by command '{command}'")]
    DuplicateAlias { alias: String, command: String },

    #[error("command '{command}' declares unknown option '{option}'")]
    UnknownOption { command: String, option: String },

    #[error("command '{command}' has an invalid pattern [{pattern}]: {reason}")]
    InvalidPattern {
        command: String,
        pattern: String,
        reason: PatternError,
    },

    /// The new pattern can never be selected because an earlier one accepts
    /// everything it accepts.
    #[error("command '{command}': pattern [{new}] is shadowed by earlier pattern [{existing}]")]
    AmbiguousPattern {
        command: String,
        existing: String,
        new: String,
    },

    #[error("argument type '{0}' is already registered")]
    DuplicateType(String),
}

impl RegistrationError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "invalid_name",
            Self::DuplicateAlias { .. } => "duplicate_alias",
            Self::UnknownOption { .. } => "unknown_option",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::AmbiguousPattern { .. } => "ambiguous_pattern",
            Self::DuplicateType(_) => "duplicate_type",
        }
    }
}

// ============================================================================
// Execution Errors (handler failures)
// ============================================================================

/// Error returned by a pattern handler.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The handler rejected the invocation with a message.
    #[error("{0}")]
    Failed(String),

    /// The handler panicked; the payload message is preserved when it is a string.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// Any other error raised by handler code.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ExecutionError {
    /// Build a [`ExecutionError::Failed`] from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Wrap an arbitrary error.
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Box::new(error))
    }

    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Failed(_) => "failed",
            Self::Panicked(_) => "panicked",
            Self::Other(_) => "other",
        }
    }
}

/// Result type for pattern handlers.
pub type HandlerResult = Result<(), ExecutionError>;

// ============================================================================
// Prefix Errors
// ============================================================================

/// A command prefix that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefixError {
    #[error("prefix must not be empty")]
    Empty,

    #[error("prefix must not contain whitespace: '{0}'")]
    Whitespace(String),
}

/// Check that `prefix` can start a command.
pub fn validate_prefix(prefix: &str) -> Result<(), PrefixError> {
    if prefix.is_empty() {
        return Err(PrefixError::Empty);
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err(PrefixError::Whitespace(prefix.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_error_codes() {
        let err = RegistrationError::AmbiguousPattern {
            command: "test".into(),
            existing: "STRING".into(),
            new: "WORD".into(),
        };
        assert_eq!(err.error_code(), "ambiguous_pattern");
        assert_eq!(
            err.to_string(),
            "command 'test': pattern [WORD] is shadowed by earlier pattern [STRING]"
        );
    }

    #[test]
    fn test_execution_error_wraps_std_errors() {
        let io = std::io::Error::other("disk full");
        let err = ExecutionError::other(io);
        assert_eq!(err.error_code(), "other");
        assert_eq!(err.to_string(), "disk full");

        assert_eq!(ExecutionError::msg("nope").to_string(), "nope");
    }

    #[test]
    fn test_validate_prefix() {
        assert!(validate_prefix("!").is_ok());
        assert!(validate_prefix("bot.").is_ok());
        assert_eq!(validate_prefix(""), Err(PrefixError::Empty));
        assert_eq!(
            validate_prefix("a b"),
            Err(PrefixError::Whitespace("a b".into()))
        );
    }
}

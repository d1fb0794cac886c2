//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::dispatch::{ScopeId, UserId};
use crate::error::{PrefixError, validate_prefix};
use std::collections::HashSet;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("commands.prefix is invalid: {0}")]
    InvalidPrefix(PrefixError),
    #[error("commands.guild_prefix for guild {guild}: {error}")]
    InvalidScopePrefix { guild: ScopeId, error: PrefixError },
    #[error("commands.guild_prefix lists guild {0} more than once")]
    DuplicateScope(ScopeId),
    #[error("commands.grant lists user {0} more than once")]
    DuplicateGrant(UserId),
    #[error("logging.filter is not a valid filter directive: {0}")]
    InvalidLogFilter(String),
}

impl ValidationError {
    /// Get a static error code string for metrics labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPrefix(_) => "invalid_prefix",
            Self::InvalidScopePrefix { .. } => "invalid_scope_prefix",
            Self::DuplicateScope(_) => "duplicate_scope",
            Self::DuplicateGrant(_) => "duplicate_grant",
            Self::InvalidLogFilter(_) => "invalid_log_filter",
        }
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let commands = &config.commands;

    if let Err(e) = validate_prefix(&commands.prefix) {
        errors.push(ValidationError::InvalidPrefix(e));
    }

    let mut scopes = HashSet::new();
    for entry in &commands.guild_prefix {
        if let Err(error) = validate_prefix(&entry.prefix) {
            errors.push(ValidationError::InvalidScopePrefix {
                guild: entry.guild_id,
                error,
            });
        }
        if !scopes.insert(entry.guild_id) {
            errors.push(ValidationError::DuplicateScope(entry.guild_id));
        }
    }

    let mut users = HashSet::new();
    for grant in &commands.grant {
        if !users.insert(grant.user_id) {
            errors.push(ValidationError::DuplicateGrant(grant.user_id));
        }
    }

    if tracing_subscriber::EnvFilter::try_new(&config.logging.filter).is_err() {
        errors.push(ValidationError::InvalidLogFilter(config.logging.filter.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let config = Config::parse(
            r#"
            [commands]
            prefix = ""

            [[commands.guild_prefix]]
            guild_id = 1
            prefix = "a b"

            [[commands.guild_prefix]]
            guild_id = 1
            prefix = "?"

            [[commands.grant]]
            user_id = 5
            level = "admin"

            [[commands.grant]]
            user_id = 5
            level = "member"
            "#,
        )
        .unwrap();

        let errors = validate(&config).unwrap_err();
        let codes: Vec<_> = errors.iter().map(ValidationError::error_code).collect();
        assert_eq!(
            codes,
            [
                "invalid_prefix",
                "invalid_scope_prefix",
                "duplicate_scope",
                "duplicate_grant"
            ]
        );
    }
}

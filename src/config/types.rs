//! Core configuration types and loading.

use super::defaults::{default_log_filter, default_prefix, default_true};
use crate::caps::AccessLevel;
use crate::dispatch::{ScopeId, UserId};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Get a static error code string for metrics labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "config_io",
            Self::Parse(_) => "config_parse",
        }
    }
}

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Prefixes, owner and grants.
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Command dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandsConfig {
    /// Default command prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Platform id of the bot owner; granted the creator level.
    pub creator_id: Option<UserId>,
    /// Per-guild prefix overrides.
    #[serde(default)]
    pub guild_prefix: Vec<ScopePrefixConfig>,
    /// Static capability grants.
    #[serde(default)]
    pub grant: Vec<GrantConfig>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            creator_id: None,
            guild_prefix: Vec::new(),
            grant: Vec::new(),
        }
    }
}

/// `[[commands.guild_prefix]]`
#[derive(Debug, Clone, Deserialize)]
pub struct ScopePrefixConfig {
    pub guild_id: ScopeId,
    pub prefix: String,
}

/// `[[commands.grant]]`
#[derive(Debug, Clone, Deserialize)]
pub struct GrantConfig {
    pub user_id: UserId,
    pub level: AccessLevel,
}

/// Prometheus metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

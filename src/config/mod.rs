//! Configuration loading and management.
//!
//! - [`types`]: the TOML schema and [`Config::load`]
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks that report every problem at once
//! - [`settings`]: the [`SettingsSource`] seam the engine reads from

pub mod defaults;
mod settings;
mod types;
mod validation;

pub use settings::SettingsSource;
pub use types::{
    CommandsConfig, Config, ConfigError, GrantConfig, LogFormat, LoggingConfig, MetricsConfig,
    ScopePrefixConfig,
};
pub use validation::{ValidationError, validate};

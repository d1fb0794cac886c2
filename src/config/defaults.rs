//! Default value functions for configuration.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

/// Prefix used when neither the config nor a scope override sets one.
pub fn default_prefix() -> String {
    "!".to_string()
}

pub fn default_log_filter() -> String {
    "info".to_string()
}

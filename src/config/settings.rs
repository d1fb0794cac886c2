//! Settings consumed by the engine at startup.

use super::Config;
use crate::caps::AccessLevel;
use crate::dispatch::{ScopeId, UserId};

/// Where the engine reads its prefixes and owner from.
///
/// Implemented by [`Config`]; a bot backed by a database can implement it
/// over its own storage.
pub trait SettingsSource {
    /// Default command prefix, if the source defines one.
    fn default_prefix(&self) -> Option<String>;

    /// Platform id of the bot creator.
    fn creator_id(&self) -> Option<UserId>;

    /// Per-scope prefix overrides.
    fn scope_prefixes(&self) -> Vec<(ScopeId, String)>;

    /// Explicit capability grants.
    fn grants(&self) -> Vec<(UserId, AccessLevel)> {
        Vec::new()
    }
}

impl SettingsSource for Config {
    fn default_prefix(&self) -> Option<String> {
        Some(self.commands.prefix.clone())
    }

    fn creator_id(&self) -> Option<UserId> {
        self.commands.creator_id
    }

    fn scope_prefixes(&self) -> Vec<(ScopeId, String)> {
        self.commands
            .guild_prefix
            .iter()
            .map(|entry| (entry.guild_id, entry.prefix.clone()))
            .collect()
    }

    fn grants(&self) -> Vec<(UserId, AccessLevel)> {
        self.commands
            .grant
            .iter()
            .map(|grant| (grant.user_id, grant.level))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_as_settings() {
        let config = Config::parse(
            r#"
            [commands]
            prefix = ">"
            creator_id = 3

            [[commands.guild_prefix]]
            guild_id = 11
            prefix = "%"

            [[commands.grant]]
            user_id = 4
            level = "admin"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_prefix().as_deref(), Some(">"));
        assert_eq!(config.creator_id(), Some(UserId(3)));
        assert_eq!(config.scope_prefixes(), vec![(ScopeId(11), "%".to_string())]);
        assert_eq!(config.grants(), vec![(UserId(4), AccessLevel::Admin)]);
    }
}

//! Command prefix resolution.

use super::DashMapExt;
use crate::dispatch::ScopeId;
use crate::error::{PrefixError, validate_prefix};
use dashmap::DashMap;

/// Default prefix plus per-scope overrides.
///
/// Lookups always succeed: a scope without an override, or a message with no
/// scope at all, uses the default.
#[derive(Debug)]
pub struct PrefixStore {
    default: String,
    scopes: DashMap<ScopeId, String>,
}

impl PrefixStore {
    pub fn new(default: impl Into<String>) -> Result<Self, PrefixError> {
        let default = default.into();
        validate_prefix(&default)?;
        Ok(Self {
            default,
            scopes: DashMap::new(),
        })
    }

    pub fn default_prefix(&self) -> &str {
        &self.default
    }

    /// Replace the default prefix. Only possible before the store is shared.
    pub fn set_default_prefix(&mut self, prefix: impl Into<String>) -> Result<(), PrefixError> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        self.default = prefix;
        Ok(())
    }

    /// Prefix in effect for a message from `scope`.
    pub fn effective_prefix(&self, scope: Option<ScopeId>) -> String {
        scope
            .and_then(|scope| self.scopes.get_cloned(&scope))
            .unwrap_or_else(|| self.default.clone())
    }

    /// Override the prefix for `scope`, returning the previous override.
    pub fn set_scope_prefix(
        &self,
        scope: ScopeId,
        prefix: impl Into<String>,
    ) -> Result<Option<String>, PrefixError> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(self.scopes.insert(scope, prefix))
    }

    pub fn remove_scope_prefix(&self, scope: ScopeId) -> Option<String> {
        self.scopes.remove(&scope).map(|(_, prefix)| prefix)
    }

    pub fn scope_prefix(&self, scope: ScopeId) -> Option<String> {
        self.scopes.get_cloned(&scope)
    }

    /// All overrides, ordered by scope.
    pub fn overrides(&self) -> Vec<(ScopeId, String)> {
        self.scopes.snapshot()
    }
}

impl Default for PrefixStore {
    fn default() -> Self {
        Self {
            default: crate::config::defaults::default_prefix(),
            scopes: DashMap::new(),
        }
    }
}

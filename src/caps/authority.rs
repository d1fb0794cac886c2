//! Access Authority - decides what a sender may run.
//!
//! The pipeline consults exactly one [`AccessAuthority`] per command
//! invocation. Denials are logged at debug, grants at trace.

use super::AccessLevel;
use crate::dispatch::{CommandEvent, UserId};
use crate::state::DashMapExt;
use dashmap::DashMap;
use tracing::{debug, trace};

/// Source of truth for a sender's capability level.
pub trait AccessAuthority: Send + Sync {
    /// The level `event`'s sender holds in the event's context.
    fn level_of(&self, event: &CommandEvent) -> AccessLevel;

    /// Whether the sender may run a command requiring `required`.
    fn permits(&self, event: &CommandEvent, required: AccessLevel) -> bool {
        let held = self.level_of(event);
        if held.satisfies(required) {
            trace!(
                sender = %event.sender(),
                command = %event.command().name(),
                held = %held,
                required = %required,
                "access granted"
            );
            true
        } else {
            debug!(
                sender = %event.sender(),
                command = %event.command().name(),
                held = %held,
                required = %required,
                "access denied"
            );
            false
        }
    }
}

/// Authority backed by explicit per-user grants.
///
/// The bot creator is an ordinary grant at [`AccessLevel::Creator`]. Users
/// without a grant hold [`AccessLevel::Everyone`].
#[derive(Debug, Default)]
pub struct StaticAuthority {
    grants: DashMap<UserId, AccessLevel>,
}

impl StaticAuthority {
    pub fn new(creator: Option<UserId>) -> Self {
        let authority = Self::default();
        if let Some(creator) = creator {
            authority.grant(creator, AccessLevel::Creator);
        }
        authority
    }

    /// Grant `level` to `user`, returning the previous grant.
    pub fn grant(&self, user: UserId, level: AccessLevel) -> Option<AccessLevel> {
        self.grants.insert(user, level)
    }

    pub fn revoke(&self, user: UserId) -> Option<AccessLevel> {
        self.grants.remove(&user).map(|(_, level)| level)
    }

    /// Level held by `user` regardless of context.
    pub fn level_for(&self, user: UserId) -> AccessLevel {
        self.grants.get_cloned(&user).unwrap_or_default()
    }

    /// Every explicit grant, ordered by user.
    pub fn grants(&self) -> Vec<(UserId, AccessLevel)> {
        self.grants.snapshot()
    }
}

impl AccessAuthority for StaticAuthority {
    fn level_of(&self, event: &CommandEvent) -> AccessLevel {
        self.level_for(event.sender())
    }
}

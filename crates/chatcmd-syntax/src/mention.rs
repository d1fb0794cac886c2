//! Syntactic user and channel references.
//!
//! Only the shape of a mention is validated here; whether the id belongs to a
//! live user or channel is for the platform adapter to decide.
//!
//! ```text
//! user     <@123456789>  or  <@!123456789>
//! channel  <#123456789>
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static USER_MENTION: OnceLock<Regex> = OnceLock::new();
static CHANNEL_MENTION: OnceLock<Regex> = OnceLock::new();

fn user_mention() -> &'static Regex {
    USER_MENTION.get_or_init(|| Regex::new(r"^<@!?(\d{1,20})>$").expect("static user mention regex"))
}

fn channel_mention() -> &'static Regex {
    CHANNEL_MENTION.get_or_init(|| Regex::new(r"^<#(\d{1,20})>$").expect("static channel mention regex"))
}

fn capture_id(regex: &Regex, token: &str) -> Option<u64> {
    regex.captures(token)?.get(1)?.as_str().parse().ok()
}

/// A user referenced by mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserRef(pub u64);

impl UserRef {
    /// Parse `<@id>` or `<@!id>`.
    pub fn parse(token: &str) -> Option<Self> {
        capture_id(user_mention(), token).map(Self)
    }

    /// The raw platform id.
    #[inline]
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<@{}>", self.0)
    }
}

/// A channel referenced by mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelRef(pub u64);

impl ChannelRef {
    /// Parse `<#id>`.
    pub fn parse(token: &str) -> Option<Self> {
        capture_id(channel_mention(), token).map(Self)
    }

    /// The raw platform id.
    #[inline]
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<#{}>", self.0)
    }
}

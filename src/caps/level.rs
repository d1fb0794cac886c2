use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Totally ordered capability level.
///
/// `Everyone < Member < Moderator < Admin < Creator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    Everyone,
    Member,
    Moderator,
    Admin,
    /// The bot owner, identified by the configured creator id.
    Creator,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 5] = [
        Self::Everyone,
        Self::Member,
        Self::Moderator,
        Self::Admin,
        Self::Creator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Everyone => "everyone",
            Self::Member => "member",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
            Self::Creator => "creator",
        }
    }

    /// Whether a holder of `self` may run something that requires `required`.
    #[inline]
    pub fn satisfies(self, required: AccessLevel) -> bool {
        self >= required
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown access level '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        for pair in AccessLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(AccessLevel::Creator.satisfies(AccessLevel::Admin));
        assert!(AccessLevel::Member.satisfies(AccessLevel::Member));
        assert!(!AccessLevel::Everyone.satisfies(AccessLevel::Member));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Admin".parse::<AccessLevel>(), Ok(AccessLevel::Admin));
        assert!("root".parse::<AccessLevel>().is_err());
    }
}

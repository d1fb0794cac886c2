//! Argument types and the coercion of raw tokens into typed values.
//!
//! Every coercion is a pure function of the token: failure has no side effect,
//! which lets the resolver try a token against many pattern slots.

use crate::error::CoercionFailure;
use crate::mention::{ChannelRef, UserRef};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// A caller-defined argument type.
///
/// Implementations decide which tokens they accept and how they relate to the
/// built-in types for ambiguity checks at registration time.
pub trait CustomArgument: fmt::Debug + Send + Sync {
    /// Type name used in pattern descriptors (matched case-insensitively).
    fn name(&self) -> &str;

    /// Convert `token`, returning the normalized value on success.
    fn coerce(&self, token: &str) -> Option<String>;

    /// Whether every accepted token is a single whitespace-free word.
    fn is_single_word(&self) -> bool {
        true
    }

    /// Whether this type accepts every token `other` accepts.
    ///
    /// Never consulted for `STRING`. Defaults to `false`.
    fn covers(&self, _other: &ArgumentType) -> bool {
        false
    }

    /// Whether every token this type accepts is also accepted by `other`.
    ///
    /// Consulted for built-ins narrower than `WORD` and for other custom
    /// types. Defaults to `false`.
    fn is_within(&self, _other: &ArgumentType) -> bool {
        false
    }
}

/// The semantic type of a typed pattern slot.
#[derive(Debug, Clone)]
pub enum ArgumentType {
    /// Any token.
    String,
    /// A single token without whitespace.
    Word,
    /// A base-10 signed 64-bit integer.
    Integer,
    /// An absolute URL with a host.
    Url,
    /// A user mention.
    User,
    /// A channel mention.
    Channel,
    /// A caller-defined type.
    Custom(Arc<dyn CustomArgument>),
}

impl ArgumentType {
    /// Built-in types in the order descriptors list them.
    pub const BUILTIN_NAMES: [&'static str; 6] =
        ["string", "word", "integer", "url", "user", "channel"];

    /// Resolve a built-in type by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "word" => Self::Word,
            "integer" | "int" => Self::Integer,
            "url" => Self::Url,
            "user" | "user-ref" => Self::User,
            "channel" | "channel-ref" => Self::Channel,
            _ => return None,
        };
        Some(ty)
    }

    /// Lowercase type name.
    pub fn name(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Word => "word",
            Self::Integer => "integer",
            Self::Url => "url",
            Self::User => "user",
            Self::Channel => "channel",
            Self::Custom(custom) => custom.name(),
        }
    }

    /// Whether every token this type accepts is whitespace-free.
    pub fn is_single_word(&self) -> bool {
        match self {
            Self::String => false,
            Self::Custom(custom) => custom.is_single_word(),
            _ => true,
        }
    }

    /// Whether this is a caller-defined type.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Attempt to convert `token` into a value of this type.
    pub fn coerce(&self, token: &str) -> Result<Argument, CoercionFailure> {
        let fail = || CoercionFailure::new(self.name(), token);
        match self {
            Self::String => Ok(Argument::String(token.to_string())),
            Self::Word => {
                if is_word(token) {
                    Ok(Argument::Word(token.to_string()))
                } else {
                    Err(fail())
                }
            }
            Self::Integer => token.parse().map(Argument::Integer).map_err(|_| fail()),
            Self::Url => parse_url(token).map(Argument::Url).ok_or_else(fail),
            Self::User => UserRef::parse(token).map(Argument::User).ok_or_else(fail),
            Self::Channel => ChannelRef::parse(token)
                .map(Argument::Channel)
                .ok_or_else(fail),
            Self::Custom(custom) => custom
                .coerce(token)
                .map(|value| Argument::Custom {
                    type_name: custom.name().to_string(),
                    value,
                })
                .ok_or_else(fail),
        }
    }

    /// Whether `token` coerces to this type.
    #[inline]
    pub fn accepts(&self, token: &str) -> bool {
        self.coerce(token).is_ok()
    }
}

impl PartialEq for ArgumentType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => a.name().eq_ignore_ascii_case(b.name()),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl Eq for ArgumentType {}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_word(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

fn parse_url(token: &str) -> Option<Url> {
    if !is_word(token) {
        return None;
    }
    Url::parse(token).ok().filter(|url| url.has_host())
}

/// A token converted to its slot's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A matched literal, in the casing the pattern declares.
    Literal(String),
    /// Any text.
    String(String),
    /// A single word.
    Word(String),
    /// An integer.
    Integer(i64),
    /// An absolute URL.
    Url(Url),
    /// A user mention.
    User(UserRef),
    /// A channel mention.
    Channel(ChannelRef),
    /// A value of a caller-defined type.
    Custom {
        /// Name of the custom type.
        type_name: String,
        /// Normalized value returned by the type.
        value: String,
    },
    /// Values absorbed by a variadic slot.
    List(Vec<Argument>),
}

impl Argument {
    /// Text of literal, string, word and custom values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Literal(s) | Self::String(s) | Self::Word(s) => Some(s),
            Self::Custom { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The URL value.
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Self::Url(url) => Some(url),
            _ => None,
        }
    }

    /// The referenced user.
    pub fn as_user(&self) -> Option<UserRef> {
        match self {
            Self::User(user) => Some(*user),
            _ => None,
        }
    }

    /// The referenced channel.
    pub fn as_channel(&self) -> Option<ChannelRef> {
        match self {
            Self::Channel(channel) => Some(*channel),
            _ => None,
        }
    }

    /// Elements absorbed by a variadic slot.
    pub fn as_list(&self) -> Option<&[Argument]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) | Self::String(s) | Self::Word(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Url(url) => write!(f, "{}", url),
            Self::User(user) => write!(f, "{}", user),
            Self::Channel(channel) => write!(f, "{}", channel),
            Self::Custom { value, .. } => f.write_str(value),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Duration;

    impl CustomArgument for Duration {
        fn name(&self) -> &str {
            "duration"
        }

        fn coerce(&self, token: &str) -> Option<String> {
            let lower = token.to_ascii_lowercase();
            let digits = lower.strip_suffix(&['s', 'm', 'h'][..])?;
            digits.parse::<u32>().ok().map(|_| lower.clone())
        }
    }

    #[test]
    fn test_string_accepts_everything() {
        assert_eq!(
            ArgumentType::String.coerce("two words"),
            Ok(Argument::String("two words".into()))
        );
        assert!(ArgumentType::String.accepts(""));
    }

    #[test]
    fn test_word() {
        assert!(ArgumentType::Word.accepts("single"));
        assert!(!ArgumentType::Word.accepts("two words"));
        assert!(!ArgumentType::Word.accepts(""));
    }

    #[test]
    fn test_integer() {
        assert_eq!(ArgumentType::Integer.coerce("-12").unwrap().as_integer(), Some(-12));
        assert_eq!(ArgumentType::Integer.coerce("+7").unwrap().as_integer(), Some(7));
        assert!(!ArgumentType::Integer.accepts("1.5"));
        assert!(!ArgumentType::Integer.accepts("99999999999999999999"));
        assert_eq!(
            ArgumentType::Integer.coerce("x"),
            Err(CoercionFailure::new("integer", "x"))
        );
    }

    #[test]
    fn test_url() {
        let arg = ArgumentType::Url.coerce("https://example.com/a?b=c").unwrap();
        assert_eq!(arg.as_url().and_then(|u| u.host_str()), Some("example.com"));
        assert!(!ArgumentType::Url.accepts("example.com"));
        assert!(!ArgumentType::Url.accepts("add:5"));
        assert!(!ArgumentType::Url.accepts("https://exa mple.com"));
        assert!(!ArgumentType::Url.accepts("42"));
    }

    #[test]
    fn test_mentions() {
        assert_eq!(ArgumentType::User.coerce("<@1>").unwrap().as_user(), Some(UserRef(1)));
        assert_eq!(
            ArgumentType::Channel.coerce("<#2>").unwrap().as_channel(),
            Some(ChannelRef(2))
        );
        assert!(!ArgumentType::User.accepts("<#2>"));
        assert!(!ArgumentType::Channel.accepts("<@1>"));
    }

    #[test]
    fn test_custom_type() {
        let ty = ArgumentType::Custom(Arc::new(Duration));
        assert_eq!(
            ty.coerce("10M"),
            Ok(Argument::Custom {
                type_name: "duration".into(),
                value: "10m".into()
            })
        );
        assert!(!ty.accepts("10"));
        assert_eq!(ty, ArgumentType::Custom(Arc::new(Duration)));
        assert_ne!(ty, ArgumentType::Word);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ArgumentType::from_name("STRING"), Some(ArgumentType::String));
        assert_eq!(ArgumentType::from_name("User"), Some(ArgumentType::User));
        assert_eq!(ArgumentType::from_name("CHANNEL"), Some(ArgumentType::Channel));
        assert_eq!(ArgumentType::from_name("float"), None);
    }

    #[test]
    fn test_list_display() {
        let list = Argument::List(vec![Argument::Word("a".into()), Argument::Integer(3)]);
        assert_eq!(list.to_string(), "a 3");
        assert_eq!(list.as_list().map(<[Argument]>::len), Some(2));
    }
}

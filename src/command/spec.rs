//! Pattern slots and the descriptor syntax used to declare them.
//!
//! ```text
//! 'add'       literal, matched case-insensitively
//! STRING      typed slot (type names are case-insensitive)
//! WORD*       variadic, zero or more words (also WORD...)
//! WORD+       variadic, at least one word
//! ```

use crate::error::PatternError;
use chatcmd_syntax::{Argument, ArgumentType, CoercionFailure};
use std::fmt;

/// One slot of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentSpec {
    /// Fixed text that must appear verbatim (ignoring case).
    Literal(String),
    /// A single token of the given type.
    Typed(ArgumentType),
    /// Every remaining token, each of the given type.
    Variadic {
        ty: ArgumentType,
        at_least_one: bool,
    },
}

impl ArgumentSpec {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn typed(ty: ArgumentType) -> Self {
        Self::Typed(ty)
    }

    /// Zero or more trailing tokens.
    pub fn variadic(ty: ArgumentType) -> Self {
        Self::Variadic {
            ty,
            at_least_one: false,
        }
    }

    /// One or more trailing tokens.
    pub fn variadic_non_empty(ty: ArgumentType) -> Self {
        Self::Variadic {
            ty,
            at_least_one: true,
        }
    }

    /// Parse a single descriptor, resolving type names against the built-in
    /// types first and then against `custom`.
    pub fn parse(descriptor: &str, custom: &[ArgumentType]) -> Result<Self, PatternError> {
        let descriptor = descriptor.trim();

        if let Some(body) = descriptor.strip_prefix('\'') {
            let Some(end) = body.find('\'') else {
                return Err(PatternError::UnterminatedLiteral(descriptor.to_string()));
            };
            let (text, suffix) = (&body[..end], &body[end + 1..]);
            if text.is_empty() {
                return Err(PatternError::EmptyLiteral);
            }
            return match suffix {
                "" => Ok(Self::Literal(text.to_string())),
                "*" | "+" | "..." => Err(PatternError::VariadicLiteral(descriptor.to_string())),
                _ => Err(PatternError::UnterminatedLiteral(descriptor.to_string())),
            };
        }

        let (name, variadic) = if let Some(name) = descriptor.strip_suffix("...") {
            (name, Some(false))
        } else if let Some(name) = descriptor.strip_suffix('*') {
            (name, Some(false))
        } else if let Some(name) = descriptor.strip_suffix('+') {
            (name, Some(true))
        } else {
            (descriptor, None)
        };

        let ty = lookup_type(name, custom)
            .ok_or_else(|| PatternError::UnknownType(name.to_string()))?;

        Ok(match variadic {
            None => Self::Typed(ty),
            Some(at_least_one) => Self::Variadic { ty, at_least_one },
        })
    }

    #[inline]
    pub fn is_variadic(&self) -> bool {
        matches!(self, Self::Variadic { .. })
    }

    /// Match a single token against a fixed slot.
    ///
    /// Literals are compared first; typed slots coerce. A variadic slot is
    /// matched element by element by the resolver, so here it coerces one
    /// element.
    pub fn claim(&self, token: &str) -> Result<Argument, CoercionFailure> {
        match self {
            Self::Literal(text) => {
                if eq_caseless(text, token) {
                    Ok(Argument::Literal(text.clone()))
                } else {
                    Err(CoercionFailure::new(format!("'{}'", text), token))
                }
            }
            Self::Typed(ty) | Self::Variadic { ty, .. } => ty.coerce(token),
        }
    }
}

impl fmt::Display for ArgumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "'{}'", text),
            Self::Typed(ty) => f.write_str(&ty.name().to_uppercase()),
            Self::Variadic { ty, at_least_one } => {
                let marker = if *at_least_one { "+" } else { "*" };
                write!(f, "{}{}", ty.name().to_uppercase(), marker)
            }
        }
    }
}

fn lookup_type(name: &str, custom: &[ArgumentType]) -> Option<ArgumentType> {
    if name.is_empty() {
        return None;
    }
    ArgumentType::from_name(name).or_else(|| {
        custom
            .iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(name))
            .cloned()
    })
}

/// Unicode-aware case-insensitive comparison.
pub(crate) fn eq_caseless(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatcmd_syntax::CustomArgument;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Color;

    impl CustomArgument for Color {
        fn name(&self) -> &str {
            "color"
        }

        fn coerce(&self, token: &str) -> Option<String> {
            ["red", "green", "blue"]
                .contains(&token)
                .then(|| token.to_string())
        }
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(
            ArgumentSpec::parse("'add'", &[]),
            Ok(ArgumentSpec::literal("add"))
        );
        assert_eq!(
            ArgumentSpec::parse("'add", &[]),
            Err(PatternError::UnterminatedLiteral("'add".into()))
        );
        assert_eq!(ArgumentSpec::parse("''", &[]), Err(PatternError::EmptyLiteral));
        assert_eq!(
            ArgumentSpec::parse("'add'*", &[]),
            Err(PatternError::VariadicLiteral("'add'*".into()))
        );
    }

    #[test]
    fn test_parse_types_case_insensitively() {
        assert_eq!(
            ArgumentSpec::parse("string", &[]),
            Ok(ArgumentSpec::typed(ArgumentType::String))
        );
        assert_eq!(
            ArgumentSpec::parse("User", &[]),
            Ok(ArgumentSpec::typed(ArgumentType::User))
        );
        assert_eq!(
            ArgumentSpec::parse("FLOAT", &[]),
            Err(PatternError::UnknownType("FLOAT".into()))
        );
    }

    #[test]
    fn test_parse_variadic_markers() {
        assert_eq!(
            ArgumentSpec::parse("WORD...", &[]),
            Ok(ArgumentSpec::variadic(ArgumentType::Word))
        );
        assert_eq!(
            ArgumentSpec::parse("WORD*", &[]),
            Ok(ArgumentSpec::variadic(ArgumentType::Word))
        );
        assert_eq!(
            ArgumentSpec::parse("INTEGER+", &[]),
            Ok(ArgumentSpec::variadic_non_empty(ArgumentType::Integer))
        );
        assert_eq!(
            ArgumentSpec::parse("*", &[]),
            Err(PatternError::UnknownType(String::new()))
        );
    }

    #[test]
    fn test_parse_custom_type() {
        let custom = [ArgumentType::Custom(Arc::new(Color))];
        let spec = ArgumentSpec::parse("COLOR", &custom).unwrap();
        assert_eq!(spec, ArgumentSpec::typed(custom[0].clone()));
        assert!(spec.claim("red").is_ok());
        assert!(spec.claim("pink").is_err());
    }

    #[test]
    fn test_literal_claim_ignores_case() {
        let spec = ArgumentSpec::literal("add");
        assert_eq!(spec.claim("ADD"), Ok(Argument::Literal("add".into())));
        assert!(spec.claim("adder").is_err());
    }

    #[test]
    fn test_display_uses_descriptor_syntax() {
        assert_eq!(ArgumentSpec::literal("add").to_string(), "'add'");
        assert_eq!(ArgumentSpec::typed(ArgumentType::Url).to_string(), "URL");
        assert_eq!(ArgumentSpec::variadic(ArgumentType::Word).to_string(), "WORD*");
        assert_eq!(
            ArgumentSpec::variadic_non_empty(ArgumentType::Word).to_string(),
            "WORD+"
        );
    }
}

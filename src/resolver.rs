//! Pattern resolution.
//!
//! Patterns are tried strictly in registration order and the first one whose
//! every slot accepts its token wins. Coercion is side-effect free, so a
//! failed attempt leaves nothing behind for the next pattern.

use crate::command::{ArgumentSpec, Command, Pattern};
use chatcmd_syntax::{Argument, Options, ProcessedContent};
use thiserror::Error;

/// The pattern selected for an invocation and its converted arguments.
#[derive(Debug)]
pub struct Resolution<'a> {
    pub index: usize,
    pub pattern: &'a Pattern,
    pub arguments: Vec<Argument>,
}

/// No pattern of the command accepted the positional arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no pattern of '{command}' accepts {arguments:?}")]
pub struct NoPatternMatch {
    pub command: String,
    pub options: Options,
    pub arguments: Vec<String>,
}

/// Select the first pattern of `command` that accepts `content.arguments`.
pub fn resolve<'a>(
    command: &'a Command,
    content: &ProcessedContent,
) -> Result<Resolution<'a>, NoPatternMatch> {
    command
        .patterns()
        .iter()
        .enumerate()
        .find_map(|(index, pattern)| {
            align(pattern.args(), &content.arguments).map(|arguments| Resolution {
                index,
                pattern,
                arguments,
            })
        })
        .ok_or_else(|| NoPatternMatch {
            command: command.name().to_string(),
            options: content.options.clone(),
            arguments: content.arguments.clone(),
        })
}

/// Convert `tokens` slot by slot, or `None` if any slot rejects its token.
///
/// A trailing variadic slot yields one [`Argument::List`] holding the
/// remaining tokens.
pub fn align(specs: &[ArgumentSpec], tokens: &[String]) -> Option<Vec<Argument>> {
    let (fixed, tail) = match specs.split_last() {
        Some((ArgumentSpec::Variadic { ty, at_least_one }, fixed)) => {
            (fixed, Some((ty, *at_least_one)))
        }
        _ => (specs, None),
    };

    let arity_ok = match tail {
        None => tokens.len() == fixed.len(),
        Some((_, at_least_one)) => tokens.len() >= fixed.len() + usize::from(at_least_one),
    };
    if !arity_ok {
        return None;
    }

    let mut out = Vec::with_capacity(specs.len());
    for (spec, token) in fixed.iter().zip(tokens) {
        out.push(spec.claim(token).ok()?);
    }
    if let Some((ty, _)) = tail {
        let rest = tokens[fixed.len()..]
            .iter()
            .map(|token| ty.coerce(token).ok())
            .collect::<Option<Vec<_>>>()?;
        out.push(Argument::List(rest));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatcmd_syntax::{ArgumentType, UserRef};

    fn specs(descriptors: &[&str]) -> Vec<ArgumentSpec> {
        descriptors
            .iter()
            .map(|d| ArgumentSpec::parse(d, &[]).unwrap())
            .collect()
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_fixed_arity_must_match() {
        assert!(align(&specs(&["STRING"]), &tokens(&[])).is_none());
        assert!(align(&specs(&["STRING"]), &tokens(&["a", "b"])).is_none());
        assert_eq!(align(&specs(&[]), &tokens(&[])), Some(vec![]));
    }

    #[test]
    fn test_literal_then_typed() {
        let args = align(&specs(&["'add'", "USER"]), &tokens(&["ADD", "<@9>"])).unwrap();
        assert_eq!(
            args,
            vec![Argument::Literal("add".into()), Argument::User(UserRef(9))]
        );
        assert!(align(&specs(&["'add'", "USER"]), &tokens(&["remove", "<@9>"])).is_none());
    }

    #[test]
    fn test_variadic_zero_or_more() {
        let args = align(&specs(&["WORD*"]), &tokens(&[])).unwrap();
        assert_eq!(args, vec![Argument::List(vec![])]);

        let args = align(&specs(&["'say'", "WORD*"]), &tokens(&["say", "a", "b"])).unwrap();
        assert_eq!(args[1].as_list().map(<[Argument]>::len), Some(2));
    }

    #[test]
    fn test_variadic_one_or_more() {
        assert!(align(&specs(&["WORD+"]), &tokens(&[])).is_none());
        assert!(align(&specs(&["WORD+"]), &tokens(&["x"])).is_some());
    }

    #[test]
    fn test_variadic_elements_must_coerce() {
        assert!(align(&specs(&["INTEGER*"]), &tokens(&["1", "2", "x"])).is_none());
        let args = align(&specs(&["INTEGER*"]), &tokens(&["1", "2"])).unwrap();
        assert_eq!(
            args,
            vec![Argument::List(vec![
                Argument::Integer(1),
                Argument::Integer(2)
            ])]
        );
    }

    #[test]
    fn test_string_slot_takes_quoted_span() {
        let args = align(
            &[ArgumentSpec::typed(ArgumentType::String)],
            &tokens(&["hello world"]),
        )
        .unwrap();
        assert_eq!(args[0].as_str(), Some("hello world"));
    }
}

//! Option extraction on top of the lexer.
//!
//! Every unquoted lexeme that starts with `-` is matched against the option
//! grammar:
//!
//! ```text
//! --name            boolean option (or valued option, value taken from the next lexeme)
//! --name=value      option with an inline value
//! -x                shorthand
//! -xyz              group of shorthands
//! --                end of options, everything after is positional
//! ```
//!
//! A lone `-`, negative numbers such as `-5` and anything else outside this
//! grammar (`-_-`, `---`) are positional. Only an empty long name (`--=x`) is
//! rejected.

use crate::error::{ProcessingError, SyntaxError, UnknownOptionError};
use crate::lexer::{lex, Lexeme};
use crate::option::{OptionKind, Options};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, satisfy},
    combinator::{all_consuming, opt, recognize, rest},
    sequence::{pair, preceded},
    IResult,
};
use std::iter::Peekable;

/// The tokenizer output: options plus positional arguments in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedContent {
    /// Options supplied with the invocation.
    pub options: Options,
    /// Positional arguments, quotes removed.
    pub arguments: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum OptionToken<'a> {
    Long { name: &'a str, value: Option<&'a str> },
    Short(&'a str),
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn long_option(input: &str) -> IResult<&str, OptionToken<'_>> {
    let (input, _) = tag("--")(input)?;
    let (input, name) = recognize(pair(
        satisfy(|c: char| c.is_alphanumeric()),
        take_while(is_name_char),
    ))(input)?;
    let (input, value) = opt(preceded(char('='), rest))(input)?;
    Ok((input, OptionToken::Long { name, value }))
}

fn short_group(input: &str) -> IResult<&str, OptionToken<'_>> {
    let (input, group) = preceded(char('-'), take_while1(|c: char| c.is_alphanumeric()))(input)?;
    Ok((input, OptionToken::Short(group)))
}

fn option_token(input: &str) -> IResult<&str, OptionToken<'_>> {
    all_consuming(alt((long_option, short_group)))(input)
}

fn is_option_candidate(lexeme: &Lexeme) -> bool {
    if lexeme.quoted || lexeme.text.len() < 2 {
        return false;
    }
    match lexeme.text.strip_prefix('-') {
        Some(tail) => !tail.starts_with(|c: char| c.is_ascii_digit() || c == '.'),
        None => false,
    }
}

/// `--` directly followed by `=`: a long option with no name.
fn is_nameless_long(text: &str) -> bool {
    text.strip_prefix("--").is_some_and(|tail| tail.starts_with('='))
}

fn find_long(allowed: &[OptionKind], name: &str) -> Option<OptionKind> {
    allowed.iter().find(|kind| kind.matches_long(name)).copied()
}

fn find_short(allowed: &[OptionKind], short: char) -> Option<OptionKind> {
    allowed
        .iter()
        .find(|kind| kind.shorthand() == Some(short))
        .copied()
}

/// Take the next lexeme as an option value unless it looks like another option.
fn next_value<I>(lexemes: &mut Peekable<I>) -> Option<String>
where
    I: Iterator<Item = Lexeme>,
{
    lexemes
        .next_if(|next| next.quoted || !next.text.starts_with('-'))
        .map(|next| next.text)
}

/// Split a command body into options and positional arguments.
///
/// `allowed` is the set of options the command declares; any other option
/// fails with [`ProcessingError::UnknownOption`].
///
/// # Example
///
/// ```
/// use chatcmd_syntax::{process, OptionKind};
///
/// let content = process("rename --name=bob -f target", &[OptionKind::FORCE, OptionKind::NAME]).unwrap();
/// assert_eq!(content.options.value(&OptionKind::NAME), Some("bob"));
/// assert!(content.options.has(&OptionKind::FORCE));
/// assert_eq!(content.arguments, ["rename", "target"]);
/// ```
pub fn process(body: &str, allowed: &[OptionKind]) -> Result<ProcessedContent, ProcessingError> {
    let mut lexemes = lex(body)?.into_iter().peekable();
    let mut content = ProcessedContent::default();
    let mut options_ended = false;

    while let Some(lexeme) = lexemes.next() {
        if options_ended || !is_option_candidate(&lexeme) {
            content.arguments.push(lexeme.text);
            continue;
        }
        if lexeme.text == "--" {
            options_ended = true;
            continue;
        }

        let token = match option_token(&lexeme.text) {
            Ok((_, token)) => token,
            Err(_) if is_nameless_long(&lexeme.text) => {
                return Err(SyntaxError::MalformedOption(lexeme.text.clone()).into());
            }
            Err(_) => {
                content.arguments.push(lexeme.text.clone());
                continue;
            }
        };

        match token {
            OptionToken::Long { name, value } => {
                let kind = find_long(allowed, name).ok_or_else(|| UnknownOptionError::new(name))?;
                let value = match value {
                    Some(inline) => Some(inline.to_string()),
                    None if kind.takes_value() => next_value(&mut lexemes),
                    None => None,
                };
                content.options.insert(kind, value);
            }
            OptionToken::Short(group) => {
                let last = group.chars().count() - 1;
                for (index, short) in group.chars().enumerate() {
                    let kind = find_short(allowed, short)
                        .ok_or_else(|| UnknownOptionError::new(short.to_string()))?;
                    let value = if kind.takes_value() {
                        if index != last {
                            return Err(SyntaxError::ValuedShorthandNotLast(short).into());
                        }
                        next_value(&mut lexemes)
                    } else {
                        None
                    };
                    content.options.insert(kind, value);
                }
            }
        }
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOWED: [OptionKind; 3] = [OptionKind::FORCE, OptionKind::NAME, OptionKind::RECURSIVE];

    #[test]
    fn test_option_token_grammar() {
        assert_eq!(
            option_token("--force"),
            Ok(("", OptionToken::Long { name: "force", value: None }))
        );
        assert_eq!(
            option_token("--name=a=b"),
            Ok(("", OptionToken::Long { name: "name", value: Some("a=b") }))
        );
        assert_eq!(option_token("-fr"), Ok(("", OptionToken::Short("fr"))));
        assert!(option_token("--=x").is_err());
        assert!(option_token("---x").is_err());
        assert!(option_token("-f!").is_err());
    }

    #[test]
    fn test_positional_only() {
        let content = process("add 'some thing' 5", &ALLOWED).unwrap();
        assert!(content.options.is_empty());
        assert_eq!(content.arguments, ["add", "some thing", "5"]);
    }

    #[test]
    fn test_boolean_long_option_does_not_consume() {
        let content = process("--force add x", &ALLOWED).unwrap();
        assert!(content.options.has(&OptionKind::FORCE));
        assert_eq!(content.options.value(&OptionKind::FORCE), None);
        assert_eq!(content.arguments, ["add", "x"]);
    }

    #[test]
    fn test_valued_option_forms() {
        let inline = process("--name=bob x", &ALLOWED).unwrap();
        assert_eq!(inline.options.value(&OptionKind::NAME), Some("bob"));
        assert_eq!(inline.arguments, ["x"]);

        let spaced = process("--name bob x", &ALLOWED).unwrap();
        assert_eq!(spaced.options.value(&OptionKind::NAME), Some("bob"));
        assert_eq!(spaced.arguments, ["x"]);

        let quoted = process("--name 'bob smith' x", &ALLOWED).unwrap();
        assert_eq!(quoted.options.value(&OptionKind::NAME), Some("bob smith"));
    }

    #[test]
    fn test_valued_option_followed_by_option() {
        let content = process("--name --force", &ALLOWED).unwrap();
        assert_eq!(content.options.get(&OptionKind::NAME), Some(None));
        assert!(content.options.has(&OptionKind::FORCE));
    }

    #[test]
    fn test_shorthand_expansion() {
        let content = process("-f -r x", &ALLOWED).unwrap();
        assert!(content.options.has(&OptionKind::FORCE));
        assert!(content.options.has(&OptionKind::RECURSIVE));
        assert_eq!(content.arguments, ["x"]);

        let grouped = process("-rfn bob", &ALLOWED).unwrap();
        assert_eq!(grouped.options.len(), 3);
        assert_eq!(grouped.options.value(&OptionKind::NAME), Some("bob"));
        assert!(grouped.arguments.is_empty());
    }

    #[test]
    fn test_valued_shorthand_must_be_last() {
        let err = process("-nf bob", &ALLOWED).unwrap_err();
        assert_eq!(err, SyntaxError::ValuedShorthandNotLast('n').into());
    }

    #[test]
    fn test_long_names_are_case_insensitive() {
        let content = process("--FORCE", &ALLOWED).unwrap();
        assert!(content.options.has(&OptionKind::FORCE));
    }

    #[test]
    fn test_unknown_options() {
        assert_eq!(
            process("--bogus x", &ALLOWED).unwrap_err(),
            UnknownOptionError::new("bogus").into()
        );
        assert_eq!(
            process("-x", &ALLOWED).unwrap_err(),
            UnknownOptionError::new("x").into()
        );
        assert_eq!(
            process("--verbose", &ALLOWED).unwrap_err(),
            UnknownOptionError::new("verbose").into()
        );
    }

    #[test]
    fn test_numbers_and_dashes_are_positional() {
        let content = process("-5 - -.5 x", &ALLOWED).unwrap();
        assert_eq!(content.arguments, ["-5", "-", "-.5", "x"]);
    }

    #[test]
    fn test_dash_leading_chatter_is_positional() {
        let content = process("hello -_- nice -) wait -? x --- --foo! -f", &ALLOWED).unwrap();
        assert_eq!(
            content.arguments,
            ["hello", "-_-", "nice", "-)", "wait", "-?", "x", "---", "--foo!"]
        );
        assert!(content.options.has(&OptionKind::FORCE));
    }

    #[test]
    fn test_quoted_dash_is_positional() {
        let content = process("'--force'", &ALLOWED).unwrap();
        assert!(content.options.is_empty());
        assert_eq!(content.arguments, ["--force"]);
    }

    #[test]
    fn test_double_dash_ends_options() {
        let content = process("-f -- --name -r --", &ALLOWED).unwrap();
        assert_eq!(content.options.len(), 1);
        assert_eq!(content.arguments, ["--name", "-r", "--"]);
    }

    #[test]
    fn test_malformed_option() {
        assert_eq!(
            process("--=x", &ALLOWED).unwrap_err(),
            SyntaxError::MalformedOption("--=x".into()).into()
        );
        assert_eq!(
            process("say --= -f", &ALLOWED).unwrap_err(),
            SyntaxError::MalformedOption("--=".into()).into()
        );
    }

    #[test]
    fn test_syntax_error_from_lexer() {
        let err = process("say \"oops", &ALLOWED).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::Syntax(SyntaxError::UnterminatedQuote { quote: '"', .. })
        ));
    }
}

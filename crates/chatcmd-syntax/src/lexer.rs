//! Quote-aware splitting of a command body into lexemes.
//!
//! Whitespace separates lexemes. A `'` or `"` at the start of a lexeme opens
//! a quoted span that runs to the matching quote; inside the span `\` escapes
//! the active quote character or another backslash. Quote characters in the
//! middle of a lexeme are ordinary text, so `don't` stays a single word.

use crate::error::SyntaxError;
use std::iter::Peekable;
use std::str::CharIndices;

/// One whitespace-delimited unit of a command body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// Text with surrounding quotes and escapes removed.
    pub text: String,
    /// Whether the lexeme started with a quoted span.
    ///
    /// Quoted lexemes are never interpreted as options.
    pub quoted: bool,
}

impl Lexeme {
    /// An unquoted lexeme.
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }
}

/// Split `body` into lexemes.
///
/// # Example
///
/// ```
/// use chatcmd_syntax::lex;
///
/// let lexemes = lex(r#"say "hello world" don't"#).unwrap();
/// let texts: Vec<_> = lexemes.iter().map(|l| l.text.as_str()).collect();
/// assert_eq!(texts, ["say", "hello world", "don't"]);
/// ```
pub fn lex(body: &str) -> Result<Vec<Lexeme>, SyntaxError> {
    let mut lexemes = Vec::new();
    let mut chars = body.char_indices().peekable();

    loop {
        while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}

        let Some(&(start, first)) = chars.peek() else {
            break;
        };

        let mut text = String::new();
        let quoted = first == '\'' || first == '"';
        if quoted {
            chars.next();
            read_quoted(&mut chars, first, start, &mut text)?;
        }

        // Anything glued to the end of a quoted span joins the same lexeme
        while let Some((_, c)) = chars.next_if(|&(_, c)| !c.is_whitespace()) {
            text.push(c);
        }

        lexemes.push(Lexeme { text, quoted });
    }

    Ok(lexemes)
}

fn read_quoted(
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
    start: usize,
    text: &mut String,
) -> Result<(), SyntaxError> {
    while let Some((_, c)) = chars.next() {
        if c == quote {
            return Ok(());
        }
        if c == '\\' {
            if let Some((_, escaped)) = chars.next_if(|&(_, n)| n == quote || n == '\\') {
                text.push(escaped);
                continue;
            }
        }
        text.push(c);
    }

    Err(SyntaxError::UnterminatedQuote {
        quote,
        position: start,
    })
}

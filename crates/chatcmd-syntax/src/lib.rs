//! # chatcmd-syntax
//!
//! The leaf layer of the chatcmd command engine: it knows how a chat message
//! body is split into tokens and how a single token becomes a typed value.
//! Nothing in here knows about commands, patterns or handlers.
//!
//! ## Features
//!
//! - Quote-aware lexing (`'...'` and `"..."` spans become one token)
//! - Option extraction: `--flag`, `--flag=value`, `--flag value`, `-f`, `-abc`
//! - Typed coercion for strings, words, integers, URLs and user/channel mentions
//! - Pluggable caller-defined argument types
//!
//! ## Quick Start
//!
//! ```rust
//! use chatcmd_syntax::{process, ArgumentType, OptionKind};
//!
//! let allowed = [OptionKind::FORCE, OptionKind::NAME];
//! let content = process("--force add 'two words' 42", &allowed).unwrap();
//!
//! assert!(content.options.has(&OptionKind::FORCE));
//! assert_eq!(content.arguments, vec!["add", "two words", "42"]);
//! assert_eq!(
//!     ArgumentType::Integer.coerce("42").unwrap().as_integer(),
//!     Some(42)
//! );
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod argument;
pub mod error;
pub mod lexer;
pub mod mention;
pub mod option;
pub mod tokenizer;

pub use argument::{Argument, ArgumentType, CustomArgument};
pub use error::{CoercionFailure, ProcessingError, SyntaxError, UnknownOptionError};
pub use lexer::{lex, Lexeme};
pub use mention::{ChannelRef, UserRef};
pub use option::{OptionKind, Options};
pub use tokenizer::{process, ProcessedContent};

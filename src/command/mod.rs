//! Command definitions.
//!
//! A [`Command`] owns its aliases, metadata, the options it accepts and an
//! ordered list of [`Pattern`]s. Commands are assembled with a
//! [`CommandBuilder`] and become immutable once the registry is built.

mod ambiguity;
mod pattern;
mod spec;

pub use pattern::{FnHandler, Invocation, Pattern, PatternDescriptor, PatternHandler, handler_fn};
pub use spec::ArgumentSpec;

use crate::caps::AccessLevel;
use crate::error::RegistrationError;
use chatcmd_syntax::{ArgumentType, OptionKind};
use std::fmt;

const DEFAULT_DESCRIPTION: &str = "No description.";

/// A named bot command.
pub struct Command {
    aliases: Vec<String>,
    access_level: AccessLevel,
    options: Vec<OptionKind>,
    description: String,
    short_description: String,
    patterns: Vec<Pattern>,
}

impl Command {
    /// Start declaring a command. `name` becomes its first alias.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    /// Canonical (first) alias, lowercase.
    pub fn name(&self) -> &str {
        &self.aliases[0]
    }

    /// All aliases including the name, lowercase.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// Options this command accepts.
    pub fn options(&self) -> &[OptionKind] {
        &self.options
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    /// Patterns in registration order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Whether `kind` is one of the options declared for this command.
    pub fn accepts_option(&self, kind: &OptionKind) -> bool {
        self.options.contains(kind)
    }

    /// Append `pattern`, rejecting it when an earlier pattern shadows it.
    pub fn register_pattern(&mut self, pattern: Pattern) -> Result<(), RegistrationError> {
        if let Some(index) = ambiguity::find_shadowing(&self.patterns, pattern.args()) {
            return Err(RegistrationError::AmbiguousPattern {
                command: self.name().to_string(),
                existing: self.patterns[index].to_string(),
                new: pattern.to_string(),
            });
        }
        tracing::trace!(command = %self.name(), pattern = %pattern, "pattern registered");
        self.patterns.push(pattern);
        Ok(())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("aliases", &self.aliases)
            .field("access_level", &self.access_level)
            .field("options", &self.options)
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

enum OptionDecl {
    Kind(OptionKind),
    Name(String),
}

/// Builder for [`Command`].
pub struct CommandBuilder {
    aliases: Vec<String>,
    access_level: AccessLevel,
    options: Vec<OptionDecl>,
    description: Option<String>,
    short_description: Option<String>,
    patterns: Vec<PatternDescriptor>,
}

impl CommandBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            aliases: vec![name.into()],
            access_level: AccessLevel::Everyone,
            options: Vec::new(),
            description: None,
            short_description: None,
            patterns: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Minimum capability level required to run the command.
    pub fn access_level(mut self, level: AccessLevel) -> Self {
        self.access_level = level;
        self
    }

    pub fn option(mut self, kind: OptionKind) -> Self {
        self.options.push(OptionDecl::Kind(kind));
        self
    }

    /// Declare built-in options by name (`"FORCE"`, `"name"`).
    pub fn option_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options
            .extend(names.into_iter().map(|n| OptionDecl::Name(n.into())));
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn short_description(mut self, text: impl Into<String>) -> Self {
        self.short_description = Some(text.into());
        self
    }

    /// Append a pattern; patterns are tried in the order they are added.
    pub fn pattern(mut self, pattern: PatternDescriptor) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Build with built-in argument types only.
    pub fn build(self) -> Result<Command, RegistrationError> {
        self.build_with_types(&[])
    }

    /// Build, resolving descriptor type names against `custom` as well.
    pub fn build_with_types(self, custom: &[ArgumentType]) -> Result<Command, RegistrationError> {
        let mut aliases: Vec<String> = Vec::with_capacity(self.aliases.len());
        for alias in &self.aliases {
            let alias = alias.trim().to_lowercase();
            if alias.is_empty() || alias.chars().any(char::is_whitespace) {
                return Err(RegistrationError::InvalidName(alias));
            }
            if aliases.contains(&alias) {
                return Err(RegistrationError::DuplicateAlias {
                    command: aliases[0].clone(),
                    alias,
                });
            }
            aliases.push(alias);
        }
        let name = aliases[0].clone();

        let mut options: Vec<OptionKind> = Vec::with_capacity(self.options.len());
        for decl in self.options {
            let kind = match decl {
                OptionDecl::Kind(kind) => kind,
                OptionDecl::Name(option) => OptionKind::from_name(&option).ok_or_else(|| {
                    RegistrationError::UnknownOption {
                        command: name.clone(),
                        option,
                    }
                })?,
            };
            if !options.contains(&kind) {
                options.push(kind);
            }
        }

        let description = self
            .description
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
        let short_description = self
            .short_description
            .unwrap_or_else(|| description.clone());

        let mut command = Command {
            aliases,
            access_level: self.access_level,
            options,
            description,
            short_description,
            patterns: Vec::with_capacity(self.patterns.len()),
        };

        for descriptor in self.patterns {
            let text = descriptor.describe();
            let pattern =
                descriptor
                    .resolve(custom)
                    .map_err(|reason| RegistrationError::InvalidPattern {
                        command: name.clone(),
                        pattern: text,
                        reason,
                    })?;
            command.register_pattern(pattern)?;
        }

        Ok(command)
    }
}

//! Command registry.
//!
//! Built once at startup and immutable afterwards, so lookups during dispatch
//! need no locking. Aliases are case-insensitive and globally unique.

use crate::command::{Command, CommandBuilder, Pattern};
use crate::error::RegistrationError;
use chatcmd_syntax::{ArgumentType, CustomArgument};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Immutable alias -> command map.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<Command>>,
    by_alias: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Find a command by any of its aliases, ignoring case.
    pub fn find(&self, alias: &str) -> Option<&Arc<Command>> {
        self.by_alias
            .get(&alias.to_lowercase())
            .map(|&index| &self.commands[index])
    }

    /// Patterns of the command named by `alias`, in registration order.
    pub fn patterns_for(&self, alias: &str) -> Option<&[Pattern]> {
        self.find(alias).map(|command| command.patterns())
    }

    /// Commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of distinct aliases across all commands.
    pub fn alias_count(&self) -> usize {
        self.by_alias.len()
    }
}

/// Collects custom argument types and commands, validating as it goes.
#[derive(Default)]
pub struct RegistryBuilder {
    types: Vec<ArgumentType>,
    commands: Vec<Command>,
    by_alias: HashMap<String, usize>,
}

impl RegistryBuilder {
    /// Register a custom argument type usable by commands registered later.
    pub fn register_type(
        &mut self,
        custom: Arc<dyn CustomArgument>,
    ) -> Result<&mut Self, RegistrationError> {
        let name = custom.name().to_string();
        let taken = ArgumentType::from_name(&name).is_some()
            || self
                .types
                .iter()
                .any(|ty| ty.name().eq_ignore_ascii_case(&name));
        if name.is_empty() || taken {
            return Err(RegistrationError::DuplicateType(name));
        }
        debug!(argument_type = %name, "argument type registered");
        self.types.push(ArgumentType::Custom(custom));
        Ok(self)
    }

    /// Build `command` against the registered types and add it.
    pub fn register(&mut self, command: CommandBuilder) -> Result<&mut Self, RegistrationError> {
        let command = command.build_with_types(&self.types)?;
        self.register_command(command)
    }

    /// Add an already-built command.
    pub fn register_command(&mut self, command: Command) -> Result<&mut Self, RegistrationError> {
        for alias in command.aliases() {
            if let Some(&owner) = self.by_alias.get(alias) {
                return Err(RegistrationError::DuplicateAlias {
                    alias: alias.clone(),
                    command: self.commands[owner].name().to_string(),
                });
            }
        }

        let index = self.commands.len();
        for alias in command.aliases() {
            self.by_alias.insert(alias.clone(), index);
        }
        debug!(
            command = %command.name(),
            aliases = command.aliases().len(),
            patterns = command.patterns().len(),
            access = %command.access_level(),
            "command registered"
        );
        self.commands.push(command);
        Ok(self)
    }

    pub fn build(self) -> CommandRegistry {
        info!(
            commands = self.commands.len(),
            aliases = self.by_alias.len(),
            custom_types = self.types.len(),
            "command registry built"
        );
        CommandRegistry {
            commands: self.commands.into_iter().map(Arc::new).collect(),
            by_alias: self.by_alias,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{PatternDescriptor, handler_fn};

    #[derive(Debug)]
    struct Emoji;

    impl CustomArgument for Emoji {
        fn name(&self) -> &str {
            "emoji"
        }

        fn coerce(&self, token: &str) -> Option<String> {
            (token.starts_with(':') && token.ends_with(':') && token.len() > 2)
                .then(|| token.to_string())
        }
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let mut builder = CommandRegistry::builder();
        builder
            .register(Command::builder("Ping").alias("p"))
            .unwrap();
        let registry = builder.build();

        assert_eq!(registry.find("PING").map(|c| c.name()), Some("ping"));
        assert_eq!(registry.find("P").map(|c| c.name()), Some("ping"));
        assert!(registry.find("pong").is_none());
        assert_eq!(registry.alias_count(), 2);
    }

    #[test]
    fn test_alias_collision_across_commands() {
        let mut builder = CommandRegistry::builder();
        builder.register(Command::builder("test").alias("t")).unwrap();
        let err = builder
            .register(Command::builder("tag").alias("T"))
            .map(|_| ())
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateAlias {
                alias: "t".into(),
                command: "test".into()
            }
        );
        // the rejected command left nothing behind
        let registry = builder.build();
        assert_eq!(registry.len(), 1);
        assert!(registry.find("tag").is_none());
    }

    #[test]
    fn test_custom_types_resolve_in_descriptors() {
        let mut builder = CommandRegistry::builder();
        builder.register_type(Arc::new(Emoji)).unwrap();
        builder
            .register(
                Command::builder("react").pattern(
                    PatternDescriptor::new(handler_fn(|_| async { Ok(()) }))
                        .with_event()
                        .arg("EMOJI"),
                ),
            )
            .unwrap();
        let registry = builder.build();
        assert_eq!(registry.patterns_for("react").map(<[Pattern]>::len), Some(1));
    }

    #[test]
    fn test_custom_type_names_are_unique() {
        let mut builder = CommandRegistry::builder();
        builder.register_type(Arc::new(Emoji)).unwrap();
        assert!(builder.register_type(Arc::new(Emoji)).is_err());
    }
}

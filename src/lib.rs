//! # chatcmd
//!
//! Pattern-matching command dispatch for prefix-style chat bots.
//!
//! Commands are declared once at startup as ordered lists of argument
//! patterns. Each incoming message is tokenized (see [`chatcmd_syntax`]),
//! matched against the patterns of the command it names, and routed to the
//! first pattern that accepts it. Every step is reported to the registered
//! [`CommandListener`]s and ends in a single [`DispatchOutcome`].
//!
//! ```ignore
//! let mut registry = CommandRegistry::builder();
//! registry.register(
//!     Command::builder("greet")
//!         .alias("hi")
//!         .pattern(PatternDescriptor::new(greet_user).with_event().arg("USER"))
//!         .pattern(PatternDescriptor::new(greet_all)),
//! )?;
//!
//! let engine = CommandEngine::new(registry.build())
//!     .with_listener(Arc::new(LoggingListener));
//! engine.handle_message(IncomingMessage::new(sender, channel, "!hi <@42>")).await;
//! ```

pub mod caps;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod resolver;
pub mod state;
pub mod telemetry;

pub use caps::{AccessAuthority, AccessLevel, StaticAuthority};
pub use command::{
    ArgumentSpec, Command, CommandBuilder, Invocation, Pattern, PatternDescriptor, PatternHandler,
    handler_fn,
};
pub use config::{Config, SettingsSource};
pub use dispatch::{
    ChannelId, CommandEngine, CommandEvent, CommandListener, DispatchOutcome, IncomingMessage,
    LoggingListener, MetricsListener, ScopeId, UserId,
};
pub use error::{ExecutionError, HandlerResult, PatternError, PrefixError, RegistrationError};
pub use registry::{CommandRegistry, RegistryBuilder};
pub use resolver::NoPatternMatch;
pub use state::PrefixStore;

pub use chatcmd_syntax::{
    Argument, ArgumentType, ChannelRef, CustomArgument, OptionKind, Options, SyntaxError,
    UnknownOptionError, UserRef,
};

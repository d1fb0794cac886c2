//! The dispatch pipeline.
//!
//! ```text
//! Received -> Found | NotFound
//! Found -> AccessDenied | Processing
//! Processing -> SyntaxError | UnknownOption | Resolved
//! Resolved -> NoPatternMatch | Invoking
//! Invoking -> ExecutionFailed | Success
//! ```
//!
//! Each message runs the pipeline once and ends in exactly one terminal
//! [`DispatchOutcome`]. Listeners are notified before each transition.

use super::event::{CommandEvent, IncomingMessage, split_command};
use super::listener::{CommandListener, ListenerChain, panic_message};
use crate::caps::{AccessAuthority, AccessLevel, StaticAuthority};
use crate::command::Invocation;
use crate::config::SettingsSource;
use crate::error::ExecutionError;
use crate::registry::CommandRegistry;
use crate::resolver::{self, NoPatternMatch};
use crate::state::PrefixStore;
use crate::telemetry::HandlerTimer;
use chatcmd_syntax::{ProcessingError, SyntaxError, UnknownOptionError, process};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{Instrument, debug, debug_span, warn};

/// Terminal state of one dispatched message.
#[derive(Debug)]
pub enum DispatchOutcome {
    NotFound {
        name: String,
    },
    AccessDenied {
        command: String,
    },
    SyntaxError {
        command: String,
        error: SyntaxError,
    },
    UnknownOption {
        command: String,
        error: UnknownOptionError,
    },
    NoPatternMatch(NoPatternMatch),
    ExecutionFailed {
        command: String,
        error: ExecutionError,
    },
    Success {
        command: String,
        /// Index of the selected pattern in registration order.
        pattern: usize,
    },
}

impl DispatchOutcome {
    /// Static label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::AccessDenied { .. } => "access_denied",
            Self::SyntaxError { .. } => "syntax_error",
            Self::UnknownOption { .. } => "unknown_option",
            Self::NoPatternMatch(_) => "no_pattern_match",
            Self::ExecutionFailed { .. } => "execution_failed",
            Self::Success { .. } => "success",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Routes messages to command handlers.
///
/// Cheap to share behind an `Arc`; every method except the setup methods
/// takes `&self` and may run concurrently.
pub struct CommandEngine {
    registry: Arc<CommandRegistry>,
    prefixes: PrefixStore,
    grants: Arc<StaticAuthority>,
    authority: Arc<dyn AccessAuthority>,
    listeners: ListenerChain,
}

impl CommandEngine {
    /// Engine with the default prefix, no listeners and a [`StaticAuthority`]
    /// without grants.
    pub fn new(registry: CommandRegistry) -> Self {
        let grants = Arc::new(StaticAuthority::default());
        Self {
            registry: Arc::new(registry),
            prefixes: PrefixStore::default(),
            authority: grants.clone(),
            grants,
            listeners: ListenerChain::default(),
        }
    }

    /// Append a listener; listeners are notified in the order they are added.
    pub fn with_listener(mut self, listener: Arc<dyn CommandListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Replace the built-in grant table with another authority.
    pub fn with_authority(mut self, authority: Arc<dyn AccessAuthority>) -> Self {
        self.authority = authority;
        self
    }

    /// Apply prefixes, grants and the creator id from `settings`.
    ///
    /// Without a source the engine keeps its defaults. Invalid prefixes are
    /// logged and skipped.
    pub fn configure(&mut self, settings: Option<&dyn SettingsSource>) {
        let Some(settings) = settings else {
            warn!("no settings source available, keeping built-in defaults");
            return;
        };

        if let Some(prefix) = settings.default_prefix() {
            if let Err(e) = self.prefixes.set_default_prefix(prefix.clone()) {
                warn!(prefix = %prefix, error = %e, "ignoring invalid default prefix");
            }
        }

        for (user, level) in settings.grants() {
            self.grants.grant(user, level);
        }
        if let Some(creator) = settings.creator_id() {
            self.grants.grant(creator, AccessLevel::Creator);
        }

        for (scope, prefix) in settings.scope_prefixes() {
            if let Err(e) = self.prefixes.set_scope_prefix(scope, prefix.clone()) {
                warn!(scope = %scope, prefix = %prefix, error = %e, "ignoring invalid scope prefix");
            }
        }

        debug!(
            prefix = %self.prefixes.default_prefix(),
            overrides = self.prefixes.overrides().len(),
            listeners = self.listeners.len(),
            "engine configured"
        );
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn prefixes(&self) -> &PrefixStore {
        &self.prefixes
    }

    /// The built-in grant table (consulted unless replaced by `with_authority`).
    pub fn grants(&self) -> &StaticAuthority {
        &self.grants
    }

    /// Dispatch `message` if it starts with the prefix of its scope.
    ///
    /// Returns `None` without notifying anyone when the prefix is absent.
    pub async fn handle_message(&self, message: IncomingMessage) -> Option<DispatchOutcome> {
        let prefix = self.prefixes.effective_prefix(message.scope);
        if !message.content.starts_with(prefix.as_str()) {
            return None;
        }
        Some(self.dispatch(message, &prefix).await)
    }

    /// Run the pipeline for `message`, whose text starts with `prefix`.
    pub async fn dispatch(&self, message: IncomingMessage, prefix: &str) -> DispatchOutcome {
        let span = debug_span!(
            "command",
            command = tracing::field::Empty,
            sender = %message.sender,
            channel = %message.channel,
            scope = ?message.scope.map(|s| s.0),
        );
        self.run(message, prefix).instrument(span).await
    }

    async fn run(&self, message: IncomingMessage, prefix: &str) -> DispatchOutcome {
        self.listeners.emit("received", |l| l.on_received(&message));

        let text = message
            .content
            .strip_prefix(prefix)
            .unwrap_or(&message.content);
        let (alias, body) = split_command(text);
        let (alias, body) = (alias.to_string(), body.to_string());

        let Some(command) = self.registry.find(&alias).cloned() else {
            self.listeners
                .emit("not_found", |l| l.on_not_found(&alias, &message));
            return DispatchOutcome::NotFound { name: alias };
        };
        let name = command.name().to_string();
        tracing::Span::current().record("command", name.as_str());

        let event = Arc::new(CommandEvent::new(
            message,
            command.clone(),
            prefix.to_string(),
            alias,
            body,
        ));
        self.listeners.emit("found", |l| l.on_found(&event));

        if !self.authority.permits(&event, command.access_level()) {
            self.listeners
                .emit("access_denied", |l| l.on_access_denied(&event));
            return DispatchOutcome::AccessDenied { command: name };
        }

        let content = match process(event.body(), command.options()) {
            Ok(content) => content,
            Err(ProcessingError::Syntax(error)) => {
                self.listeners
                    .emit("syntax_error", |l| l.on_syntax_error(&event, &error));
                return DispatchOutcome::SyntaxError {
                    command: name,
                    error,
                };
            }
            Err(ProcessingError::UnknownOption(error)) => {
                self.listeners
                    .emit("unknown_option", |l| l.on_unknown_option(&event, &error));
                return DispatchOutcome::UnknownOption {
                    command: name,
                    error,
                };
            }
        };
        self.listeners.emit("processed", |l| {
            l.on_processed(&event, &content.options, &content.arguments)
        });

        let resolution = match resolver::resolve(&command, &content) {
            Ok(resolution) => resolution,
            Err(no_match) => {
                self.listeners.emit("no_pattern_match", |l| {
                    l.on_no_pattern_match(&event, &no_match.options, &no_match.arguments)
                });
                return DispatchOutcome::NoPatternMatch(no_match);
            }
        };

        let pattern = resolution.pattern;
        let index = resolution.index;
        debug!(command = %name, pattern = index, "pattern selected");

        let invocation = Invocation {
            event: pattern.wants_event().then(|| event.clone()),
            options: pattern.wants_options().then(|| content.options.clone()),
            arguments: resolution.arguments,
        };

        let result = {
            let _timer = HandlerTimer::new(&name);
            AssertUnwindSafe(pattern.handler().handle(invocation))
                .catch_unwind()
                .await
        };

        let error = match result {
            Ok(Ok(())) => {
                self.listeners.emit("success", |l| l.on_success(&event));
                return DispatchOutcome::Success {
                    command: name,
                    pattern: index,
                };
            }
            Ok(Err(error)) => error,
            Err(payload) => ExecutionError::Panicked(panic_message(payload.as_ref())),
        };

        self.listeners.emit("execution_failed", |l| {
            l.on_execution_failed(&event, &content.options, &content.arguments, &error)
        });
        DispatchOutcome::ExecutionFailed {
            command: name,
            error,
        }
    }
}

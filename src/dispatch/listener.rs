//! Dispatch lifecycle observers.

use super::event::{CommandEvent, IncomingMessage};
use crate::error::ExecutionError;
use chatcmd_syntax::{Options, SyntaxError, UnknownOptionError};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Trait for observing the dispatch of a message.
///
/// Every method defaults to a no-op. For each message the pipeline calls
/// `on_received`, then at most one of `on_found`/`on_not_found`, then the
/// notifications of each later stage it reaches, ending with exactly one
/// terminal notification.
#[allow(unused_variables)]
pub trait CommandListener: Send + Sync {
    fn on_received(&self, message: &IncomingMessage) {}

    fn on_found(&self, event: &CommandEvent) {}

    /// Terminal: no command is registered under `name`.
    fn on_not_found(&self, name: &str, message: &IncomingMessage) {}

    /// Terminal: the sender's level is below the command's.
    fn on_access_denied(&self, event: &CommandEvent) {}

    /// The body was split into options and positional arguments.
    fn on_processed(&self, event: &CommandEvent, options: &Options, arguments: &[String]) {}

    /// Terminal: quoting or option syntax was malformed.
    fn on_syntax_error(&self, event: &CommandEvent, error: &SyntaxError) {}

    /// Terminal: an option not declared by the command was supplied.
    fn on_unknown_option(&self, event: &CommandEvent, error: &UnknownOptionError) {}

    /// Terminal: no pattern accepted the arguments.
    fn on_no_pattern_match(&self, event: &CommandEvent, options: &Options, arguments: &[String]) {}

    /// Terminal: the handler returned an error or panicked.
    fn on_execution_failed(
        &self,
        event: &CommandEvent,
        options: &Options,
        arguments: &[String],
        error: &ExecutionError,
    ) {
    }

    /// Terminal: the handler completed.
    fn on_success(&self, event: &CommandEvent) {}
}

/// Ordered set of listeners with per-listener panic isolation.
#[derive(Clone, Default)]
pub(crate) struct ListenerChain {
    listeners: Vec<Arc<dyn CommandListener>>,
}

impl ListenerChain {
    pub(crate) fn push(&mut self, listener: Arc<dyn CommandListener>) {
        self.listeners.push(listener);
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Call `notify` on every listener in registration order.
    ///
    /// A panicking listener is logged and skipped.
    pub(crate) fn emit<F>(&self, stage: &'static str, notify: F)
    where
        F: Fn(&dyn CommandListener),
    {
        for (index, listener) in self.listeners.iter().enumerate() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| notify(listener.as_ref()))) {
                warn!(
                    stage,
                    listener = index,
                    panic = %panic_message(payload.as_ref()),
                    "command listener panicked"
                );
            }
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Writes every lifecycle event to `tracing`.
///
/// Failures a user can fix (typos, bad syntax) log at debug; handler failures
/// log at warn.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

impl CommandListener for LoggingListener {
    fn on_found(&self, event: &CommandEvent) {
        debug!(command = %event.command().name(), alias = %event.alias(), "command found");
    }

    fn on_not_found(&self, name: &str, message: &IncomingMessage) {
        debug!(name = %name, sender = %message.sender, "unknown command");
    }

    fn on_access_denied(&self, event: &CommandEvent) {
        info!(
            command = %event.command().name(),
            sender = %event.sender(),
            required = %event.command().access_level(),
            "access denied"
        );
    }

    fn on_syntax_error(&self, event: &CommandEvent, error: &SyntaxError) {
        debug!(command = %event.command().name(), error = %error, code = error.error_code(), "syntax error");
    }

    fn on_unknown_option(&self, event: &CommandEvent, error: &UnknownOptionError) {
        debug!(command = %event.command().name(), option = %error.name, "unknown option");
    }

    fn on_no_pattern_match(&self, event: &CommandEvent, _options: &Options, arguments: &[String]) {
        debug!(command = %event.command().name(), arguments = ?arguments, "no pattern matched");
    }

    fn on_execution_failed(
        &self,
        event: &CommandEvent,
        _options: &Options,
        arguments: &[String],
        error: &ExecutionError,
    ) {
        warn!(
            command = %event.command().name(),
            arguments = ?arguments,
            error = %error,
            code = error.error_code(),
            "command failed"
        );
    }

    fn on_success(&self, event: &CommandEvent) {
        debug!(command = %event.command().name(), sender = %event.sender(), "command succeeded");
    }
}

/// Counts received messages and terminal outcomes in the metrics registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsListener;

impl CommandListener for MetricsListener {
    fn on_received(&self, _message: &IncomingMessage) {
        crate::metrics::record_received();
    }

    fn on_not_found(&self, _name: &str, _message: &IncomingMessage) {
        // unknown names are user input; keep label cardinality bounded
        crate::metrics::record_outcome("unknown", "not_found");
    }

    fn on_access_denied(&self, event: &CommandEvent) {
        crate::metrics::record_outcome(event.command().name(), "access_denied");
    }

    fn on_syntax_error(&self, event: &CommandEvent, _error: &SyntaxError) {
        crate::metrics::record_outcome(event.command().name(), "syntax_error");
    }

    fn on_unknown_option(&self, event: &CommandEvent, _error: &UnknownOptionError) {
        crate::metrics::record_outcome(event.command().name(), "unknown_option");
    }

    fn on_no_pattern_match(&self, event: &CommandEvent, _options: &Options, _arguments: &[String]) {
        crate::metrics::record_outcome(event.command().name(), "no_pattern_match");
    }

    fn on_execution_failed(
        &self,
        event: &CommandEvent,
        _options: &Options,
        _arguments: &[String],
        _error: &ExecutionError,
    ) {
        crate::metrics::record_outcome(event.command().name(), "execution_failed");
    }

    fn on_success(&self, event: &CommandEvent) {
        crate::metrics::record_outcome(event.command().name(), "success");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{ChannelId, UserId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Panicky;

    impl CommandListener for Panicky {
        fn on_received(&self, _message: &IncomingMessage) {
            panic!("listener bug");
        }
    }

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl CommandListener for Counting {
        fn on_received(&self, _message: &IncomingMessage) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_panicking_listener_does_not_stop_chain() {
        let counting = Arc::new(Counting::default());
        let mut chain = ListenerChain::default();
        chain.push(Arc::new(Panicky));
        chain.push(counting.clone());

        let message = IncomingMessage::new(UserId(1), ChannelId(1), "!x");
        chain.emit("received", |l| l.on_received(&message));
        assert_eq!(counting.0.load(Ordering::SeqCst), 1);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn std::any::Any + Send> = Box::new(3u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}

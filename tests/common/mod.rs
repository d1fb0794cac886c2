//! Shared helpers for integration tests.
//!
//! `Recorder` is a listener that writes every notification into a shared log
//! as a short string, and `Calls` captures what each handler received.

#![allow(dead_code)]

use chatcmd::{
    Argument, ChannelId, CommandEvent, CommandListener, ExecutionError, IncomingMessage,
    Invocation, OptionKind, Options, PatternDescriptor, PatternHandler, SyntaxError,
    UnknownOptionError, UserId, handler_fn,
};
use std::sync::{Arc, Mutex};

/// Shared, ordered notification log.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Listener that appends `"<tag>:<event> <detail>"` to a log.
pub struct Recorder {
    tag: &'static str,
    log: Log,
}

impl Recorder {
    pub fn new(tag: &'static str, log: Log) -> Arc<Self> {
        Arc::new(Self { tag, log })
    }

    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(format!("{}:{}", self.tag, entry));
    }
}

fn option_names(options: &Options) -> String {
    let mut names: Vec<String> = options
        .iter()
        .map(|(kind, value)| match value {
            Some(value) => format!("{}={}", kind.name(), value),
            None => kind.name().to_string(),
        })
        .collect();
    names.sort();
    names.join(",")
}

impl CommandListener for Recorder {
    fn on_received(&self, _message: &IncomingMessage) {
        self.push("received".into());
    }

    fn on_found(&self, event: &CommandEvent) {
        self.push(format!("found {}", event.command().name()));
    }

    fn on_not_found(&self, name: &str, _message: &IncomingMessage) {
        self.push(format!("not_found {}", name));
    }

    fn on_access_denied(&self, event: &CommandEvent) {
        self.push(format!("access_denied {}", event.command().name()));
    }

    fn on_processed(&self, _event: &CommandEvent, options: &Options, arguments: &[String]) {
        self.push(format!(
            "processed [{}] {:?}",
            option_names(options),
            arguments
        ));
    }

    fn on_syntax_error(&self, _event: &CommandEvent, error: &SyntaxError) {
        self.push(format!("syntax_error {}", error.error_code()));
    }

    fn on_unknown_option(&self, _event: &CommandEvent, error: &UnknownOptionError) {
        self.push(format!("unknown_option {}", error.name));
    }

    fn on_no_pattern_match(&self, _event: &CommandEvent, _options: &Options, arguments: &[String]) {
        self.push(format!("no_pattern_match {:?}", arguments));
    }

    fn on_execution_failed(
        &self,
        _event: &CommandEvent,
        _options: &Options,
        _arguments: &[String],
        error: &ExecutionError,
    ) {
        self.push(format!("execution_failed {}", error.error_code()));
    }

    fn on_success(&self, event: &CommandEvent) {
        self.push(format!("success {}", event.command().name()));
    }
}

/// Listener that panics on every notification.
pub struct Exploding;

impl CommandListener for Exploding {
    fn on_received(&self, _message: &IncomingMessage) {
        panic!("exploding listener");
    }

    fn on_success(&self, _event: &CommandEvent) {
        panic!("exploding listener");
    }
}

/// What one handler invocation received.
#[derive(Debug, Clone)]
pub struct Call {
    pub pattern: usize,
    pub has_event: bool,
    pub options: Option<Options>,
    pub arguments: Vec<Argument>,
}

impl Call {
    pub fn has_option(&self, kind: &OptionKind) -> bool {
        self.options.as_ref().is_some_and(|o| o.has(kind))
    }
}

pub type Calls = Arc<Mutex<Vec<Call>>>;

pub fn new_calls() -> Calls {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(calls: &Calls) -> Vec<Call> {
    calls.lock().unwrap().clone()
}

/// Handler that records its invocation under `pattern`.
pub fn recording(pattern: usize, calls: &Calls) -> Arc<dyn PatternHandler> {
    let calls = calls.clone();
    handler_fn(move |inv: Invocation| {
        let calls = calls.clone();
        async move {
            calls.lock().unwrap().push(Call {
                pattern,
                has_event: inv.event.is_some(),
                options: inv.options,
                arguments: inv.arguments,
            });
            Ok(())
        }
    })
}

/// Descriptor with a recording handler.
pub fn recorded(pattern: usize, calls: &Calls) -> PatternDescriptor {
    PatternDescriptor::new(recording(pattern, calls))
}

/// Message from user 1 in channel 1 without a scope.
pub fn msg(text: &str) -> IncomingMessage {
    IncomingMessage::new(UserId(1), ChannelId(1), text)
}

/// Message from `sender` in channel 1.
pub fn msg_from(sender: u64, text: &str) -> IncomingMessage {
    IncomingMessage::new(UserId(sender), ChannelId(1), text)
}

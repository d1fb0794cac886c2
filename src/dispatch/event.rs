//! Message and event types passed through the pipeline.

use crate::command::Command;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

id_type! {
    /// Platform id of a message author.
    UserId
}

id_type! {
    /// Platform id of the channel a message was posted in.
    ChannelId
}

id_type! {
    /// Platform id of a prefix scope (a guild or server).
    ScopeId
}

/// A chat message as delivered by the platform adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub sender: UserId,
    pub channel: ChannelId,
    /// `None` for direct messages.
    pub scope: Option<ScopeId>,
    pub content: String,
}

impl IncomingMessage {
    pub fn new(sender: UserId, channel: ChannelId, content: impl Into<String>) -> Self {
        Self {
            sender,
            channel,
            scope: None,
            content: content.into(),
        }
    }

    pub fn in_scope(mut self, scope: ScopeId) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// A message that named a registered command.
#[derive(Debug)]
pub struct CommandEvent {
    message: IncomingMessage,
    command: Arc<Command>,
    prefix: String,
    alias: String,
    body: String,
}

impl CommandEvent {
    pub(crate) fn new(
        message: IncomingMessage,
        command: Arc<Command>,
        prefix: String,
        alias: String,
        body: String,
    ) -> Self {
        Self {
            message,
            command,
            prefix,
            alias,
            body,
        }
    }

    pub fn message(&self) -> &IncomingMessage {
        &self.message
    }

    pub fn sender(&self) -> UserId {
        self.message.sender
    }

    pub fn channel(&self) -> ChannelId {
        self.message.channel
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.message.scope
    }

    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    /// Prefix that introduced the command.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Alias as typed by the sender.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Text after the command alias, as typed.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Split `text` into the command alias and the remaining body.
pub(crate) fn split_command(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim_start()),
        None => (text, ""),
    }
}
